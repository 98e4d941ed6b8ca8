//! Bar chart options: plain, grouped, or stacked, vertical or horizontal.

use crate::charts::types::{BarMode, Orientation};
use crate::charts::util::{insert_title, merge_extra, num};
use crate::error::Result;
use crate::table::Table;
use ahash::AHashMap;
use serde_json::{Map, Value, json};

/// Styling knobs for [`bar`].
#[derive(Debug, Clone)]
pub struct BarOptions {
    /// Optional grouping column; one sub-series per distinct value.
    pub hue: Option<String>,
    pub mode: BarMode,
    pub title: Option<String>,
    pub orientation: Orientation,
    /// Series colors, applied in order.
    pub palette: Option<Vec<String>>,
    /// Vertical two-stop gradient fill instead of flat series colors.
    pub use_gradient: bool,
    pub gradient_colors: (String, String),
    /// Maximum bar width, px or percent string.
    pub bar_max_width: Option<String>,
    pub bar_border_radius: u32,
    pub show_labels: bool,
    pub label_formatter: String,
    pub label_font_size: u32,
    pub label_color: String,
    pub axis_label_rotate: i32,
    pub axis_label_font_size: u32,
    pub axis_label_color: String,
    pub show_grid: bool,
    pub extra: Map<String, Value>,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            hue: None,
            mode: BarMode::Grouped,
            title: None,
            orientation: Orientation::Vertical,
            palette: None,
            use_gradient: false,
            gradient_colors: ("#83bff6".into(), "#188df0".into()),
            bar_max_width: None,
            bar_border_radius: 4,
            show_labels: false,
            label_formatter: "{c}".into(),
            label_font_size: 12,
            label_color: "#333".into(),
            axis_label_rotate: 0,
            axis_label_font_size: 12,
            axis_label_color: "#666".into(),
            show_grid: true,
            extra: Map::new(),
        }
    }
}

/// Build a bar option from a category column `x` and a value column `y`.
///
/// With a `hue` column the rows are pivoted into one sub-series per
/// distinct group value, summing `y` by `(category, group)`; combinations
/// absent from the data are filled with zero so every series spans every
/// category. Category and group ordering is first appearance. Stacked mode
/// gives all sub-series one shared stack id.
///
/// Without `hue` the rows pass through unaggregated, one bar per row.
pub fn bar(table: &Table, x: &str, y: &str, opts: &BarOptions) -> Result<Value> {
    let x_idx = table.col_idx(x)?;
    let y_idx = table.col_idx(y)?;

    let mut series_list: Vec<Value> = Vec::new();
    let mut legend_items: Vec<String> = Vec::new();
    let categories: Vec<String>;

    let label_pos = match opts.orientation {
        Orientation::Vertical => "top",
        Orientation::Horizontal => "right",
    };
    let make_label = |pos: &str| {
        json!({
            "show": opts.show_labels,
            "position": pos,
            "formatter": opts.label_formatter,
            "fontSize": opts.label_font_size,
            "color": opts.label_color,
        })
    };

    if let Some(hue) = &opts.hue {
        let hue_idx = table.col_idx(hue)?;

        // Dense rectangular pivot: sum y by (category, group), default 0.
        let mut cats: Vec<String> = Vec::new();
        let mut groups: Vec<String> = Vec::new();
        let mut sums: AHashMap<(usize, usize), f64> = AHashMap::new();
        for row in table.rows() {
            let (Some(cat), Some(grp)) = (row[x_idx].display(), row[hue_idx].display()) else {
                continue;
            };
            let ci = match cats.iter().position(|c| *c == cat) {
                Some(i) => i,
                None => {
                    cats.push(cat);
                    cats.len() - 1
                }
            };
            let gi = match groups.iter().position(|g| *g == grp) {
                Some(i) => i,
                None => {
                    groups.push(grp);
                    groups.len() - 1
                }
            };
            let slot = sums.entry((ci, gi)).or_insert(0.0);
            if let Some(v) = row[y_idx].to_num()? {
                *slot += v;
            }
        }

        for (gi, group) in groups.iter().enumerate() {
            let data: Vec<Value> = (0..cats.len())
                .map(|ci| num(sums.get(&(ci, gi)).copied().unwrap_or(0.0)))
                .collect();
            let mut item = Map::new();
            item.insert("name".into(), json!(group));
            item.insert("type".into(), json!("bar"));
            item.insert("data".into(), Value::Array(data));
            item.insert("label".into(), make_label(label_pos));
            item.insert("barBorderRadius".into(), json!(opts.bar_border_radius));
            if opts.mode == BarMode::Stacked {
                item.insert("stack".into(), json!("total"));
            }
            if let Some(w) = &opts.bar_max_width {
                item.insert("barMaxWidth".into(), json!(w));
            }
            if opts.use_gradient {
                item.insert("itemStyle".into(), gradient_style(&opts.gradient_colors));
            }
            series_list.push(Value::Object(item));
            legend_items.push(group.clone());
        }
        categories = cats;
    } else {
        let mut cats: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        for row in table.rows() {
            let (Some(cat), Some(v)) = (row[x_idx].display(), row[y_idx].to_num()?) else {
                continue;
            };
            cats.push(cat);
            values.push(num(v));
        }
        let mut item = Map::new();
        item.insert("name".into(), json!(y));
        item.insert("type".into(), json!("bar"));
        item.insert("data".into(), Value::Array(values));
        item.insert("label".into(), make_label(label_pos));
        item.insert("barBorderRadius".into(), json!(opts.bar_border_radius));
        if let Some(w) = &opts.bar_max_width {
            item.insert("barMaxWidth".into(), json!(w));
        }
        if opts.use_gradient {
            item.insert("itemStyle".into(), gradient_style(&opts.gradient_colors));
        }
        series_list.push(Value::Object(item));
        categories = cats;
    }

    let cat_axis = json!({
        "type": "category",
        "data": categories,
        "axisLabel": {
            "interval": 0,
            "rotate": opts.axis_label_rotate,
            "fontSize": opts.axis_label_font_size,
            "color": opts.axis_label_color,
        },
        "axisTick": {"show": false},
        "axisLine": {"lineStyle": {"color": "#ccc"}},
    });
    let val_axis = json!({
        "type": "value",
        "axisLabel": {
            "fontSize": opts.axis_label_font_size,
            "color": opts.axis_label_color,
        },
        "splitLine": {"show": opts.show_grid, "lineStyle": {"color": "#eee"}},
    });
    let (x_axis, y_axis) = match opts.orientation {
        Orientation::Vertical => (cat_axis, val_axis),
        Orientation::Horizontal => (val_axis, cat_axis),
    };

    let mut option = Map::new();
    insert_title(&mut option, opts.title.as_deref());
    if opts.hue.is_some() {
        option.insert("legend".into(), json!({"data": legend_items}));
    }
    option.insert(
        "tooltip".into(),
        json!({"trigger": "axis", "axisPointer": {"type": "shadow"}}),
    );
    if let Some(palette) = &opts.palette {
        option.insert("color".into(), json!(palette));
    }
    option.insert(
        "grid".into(),
        json!({"left": "10%", "right": "10%", "bottom": "15%", "containLabel": true}),
    );
    option.insert("xAxis".into(), x_axis);
    option.insert("yAxis".into(), y_axis);
    option.insert("series".into(), Value::Array(series_list));
    merge_extra(&mut option, &opts.extra);
    Ok(Value::Object(option))
}

fn gradient_style(colors: &(String, String)) -> Value {
    json!({
        "color": {
            "type": "linear",
            "x": 0, "y": 0, "x2": 0, "y2": 1,
            "colorStops": [
                {"offset": 0, "color": colors.0},
                {"offset": 1, "color": colors.1},
            ],
        },
        "shadowBlur": 8,
        "shadowColor": "rgba(0, 0, 0, 0.2)",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn grouped_table() -> Table {
        let mut t = Table::new(["dept", "quarter", "amount"]);
        for (d, q, v) in [
            ("ops", "Q1", 5.0),
            ("eng", "Q1", 3.0),
            ("ops", "Q2", 2.0),
            ("ops", "Q1", 1.0),
        ] {
            t.push_row([Cell::str(d), Cell::str(q), Cell::num(v)])
                .unwrap();
        }
        t
    }

    #[test]
    fn pivot_is_dense_with_first_appearance_order() {
        let opts = BarOptions {
            hue: Some("quarter".into()),
            ..Default::default()
        };
        let opt = bar(&grouped_table(), "dept", "amount", &opts).unwrap();
        assert_eq!(opt["xAxis"]["data"], json!(["ops", "eng"]));
        let series = opt["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        // ops Q1 summed (5 + 1), eng Q2 absent -> 0.
        assert_eq!(series[0]["name"], "Q1");
        assert_eq!(series[0]["data"], json!([6.0, 3.0]));
        assert_eq!(series[1]["name"], "Q2");
        assert_eq!(series[1]["data"], json!([2.0, 0.0]));
    }

    #[test]
    fn stacked_mode_shares_a_stack_id() {
        let opts = BarOptions {
            hue: Some("quarter".into()),
            mode: BarMode::Stacked,
            ..Default::default()
        };
        let opt = bar(&grouped_table(), "dept", "amount", &opts).unwrap();
        for s in opt["series"].as_array().unwrap() {
            assert_eq!(s["stack"], "total");
        }
    }

    #[test]
    fn grouped_mode_has_no_stack_id() {
        let opts = BarOptions {
            hue: Some("quarter".into()),
            ..Default::default()
        };
        let opt = bar(&grouped_table(), "dept", "amount", &opts).unwrap();
        for s in opt["series"].as_array().unwrap() {
            assert!(s.get("stack").is_none());
        }
    }

    #[test]
    fn horizontal_swaps_axes() {
        let opts = BarOptions {
            orientation: Orientation::Horizontal,
            ..Default::default()
        };
        let opt = bar(&grouped_table(), "dept", "amount", &opts).unwrap();
        assert_eq!(opt["xAxis"]["type"], "value");
        assert_eq!(opt["yAxis"]["type"], "category");
    }

    #[test]
    fn ungrouped_rows_pass_through() {
        let mut t = Table::new(["name", "v"]);
        t.push_row([Cell::str("a"), Cell::num(1.0)]).unwrap();
        t.push_row([Cell::str("a"), Cell::num(2.0)]).unwrap();
        let opt = bar(&t, "name", "v", &BarOptions::default()).unwrap();
        assert_eq!(opt["series"][0]["data"], json!([1.0, 2.0]));
        assert!(opt.get("legend").is_none());
    }
}
