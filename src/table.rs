use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single scalar in a table cell.
///
/// `Null` is the explicit missing-value marker; builders drop rows with a
/// `Null` in a required role before aggregating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Num(f64),
    Str(String),
    Null,
}

impl Cell {
    pub fn str(s: impl Into<String>) -> Self {
        Cell::Str(s.into())
    }

    pub fn num(v: impl Into<f64>) -> Self {
        Cell::Num(v.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Coerce to a number the way a dynamic frontend would: numbers pass
    /// through, numeric-looking strings parse, `Null` is `None`.
    ///
    /// Returns `InvalidData` for a string that does not parse.
    pub fn to_num(&self) -> Result<Option<f64>> {
        match self {
            Cell::Num(v) => Ok(Some(*v)),
            Cell::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ChartError::invalid_data(format!("cannot coerce {s:?} to a number"))),
            Cell::Null => Ok(None),
        }
    }

    /// Display form used for category labels and node names.
    pub fn display(&self) -> Option<String> {
        match self {
            Cell::Num(v) => Some(fmt_num(*v)),
            Cell::Str(s) => Some(s.clone()),
            Cell::Null => None,
        }
    }

    /// JSON form used when a cell passes straight through to an option
    /// object. Non-finite numbers become `null` (JSON has no NaN).
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Num(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Str(s) => Value::String(s.clone()),
            Cell::Null => Value::Null,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Str(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Num(v)
    }
}

/// Integers render without a trailing `.0` so numeric categories keep their
/// natural labels.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Ordered rows under stable column names.
///
/// The only contract with callers: stable column names, per-row scalar
/// values, `Cell::Null` as the explicit missing marker. Every row carries
/// exactly one cell per declared column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. The cell count must match the declared columns.
    pub fn push_row(&mut self, cells: impl IntoIterator<Item = Cell>) -> Result<()> {
        let row: Vec<Cell> = cells.into_iter().collect();
        if row.len() != self.columns.len() {
            return Err(ChartError::invalid_data(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Build a table from rows of `(column, cell)` pairs; the first row
    /// declares the column set.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = Vec<(&'a str, Cell)>>,
    ) -> Result<Self> {
        let mut iter = records.into_iter();
        let Some(first) = iter.next() else {
            return Ok(Table::new(Vec::<String>::new()));
        };
        let columns: Vec<String> = first.iter().map(|(c, _)| c.to_string()).collect();
        let mut table = Table::new(columns.clone());
        table.push_row(first.into_iter().map(|(_, cell)| cell))?;
        for record in iter {
            let mut row = vec![Cell::Null; columns.len()];
            for (name, cell) in record {
                let idx = columns
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| ChartError::MissingColumn(name.to_string()))?;
                row[idx] = cell;
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, or `MissingColumn`.
    pub fn col_idx(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ChartError::MissingColumn(name.to_string()))
    }

    /// Iterate the cells of one column in row order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Cell>> {
        let idx = self.col_idx(name)?;
        Ok(self.rows.iter().map(move |r| &r[idx]))
    }

    /// One `Option<f64>` per row: `None` for `Null`, `InvalidData` for a
    /// value that does not coerce.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.column(name)?.map(|c| c.to_num()).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_is_enforced() {
        let mut t = Table::new(["a", "b"]);
        assert!(t.push_row([Cell::num(1.0)]).is_err());
        assert!(t.push_row([Cell::num(1.0), Cell::str("x")]).is_ok());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(Cell::num(2.0).to_num().unwrap(), Some(2.0));
        assert_eq!(Cell::str(" 3.5 ").to_num().unwrap(), Some(3.5));
        assert_eq!(Cell::Null.to_num().unwrap(), None);
        assert!(Cell::str("twelve").to_num().is_err());
    }

    #[test]
    fn numeric_labels_stay_integral() {
        assert_eq!(Cell::num(2024.0).display().unwrap(), "2024");
        assert_eq!(Cell::num(2.5).display().unwrap(), "2.5");
    }

    #[test]
    fn missing_column_is_reported() {
        let t = Table::new(["a"]);
        match t.col_idx("b") {
            Err(ChartError::MissingColumn(name)) => assert_eq!(name, "b"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
