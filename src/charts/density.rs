//! Distribution charts: Gaussian KDE curves and histograms.

use crate::charts::util::{insert_title, merge_extra, num};
use crate::error::{ChartError, Result};
use crate::stats;
use crate::table::Table;
use serde_json::{Map, Value, json};

/// Styling knobs for [`kde`].
#[derive(Debug, Clone)]
pub struct KdeOptions {
    /// Optional grouping column; one smoothed curve per distinct value.
    pub hue: Option<String>,
    pub title: Option<String>,
    pub title_top: String,
    pub legend_top: String,
    /// Bandwidth factor; defaults to Scott's rule `n^(-1/5)`.
    pub bandwidth: Option<f64>,
    /// Number of x positions the estimate is evaluated at.
    pub grid_size: usize,
    /// Full-height dashed lines at each group's mean and median.
    pub show_metrics: bool,
    /// Short dashed pointers labeled with the metric values.
    pub annotate_metrics: bool,
    /// Horizontal data-unit offset for pointer lines; defaults to 1% of
    /// the x span.
    pub annotate_offset: Option<f64>,
    /// Vertical pixel offset for pointer labels, alternating up/down.
    pub annotate_label_offset: i32,
    pub extra: Map<String, Value>,
}

impl Default for KdeOptions {
    fn default() -> Self {
        Self {
            hue: None,
            title: None,
            title_top: "5%".into(),
            legend_top: "12%".into(),
            bandwidth: None,
            grid_size: 200,
            show_metrics: false,
            annotate_metrics: false,
            annotate_offset: None,
            annotate_label_offset: 10,
            extra: Map::new(),
        }
    }
}

/// Build a smoothed density option for a numeric column.
///
/// All groups share one x grid spanning the global `[min, max]` of the
/// column. A group keeps its curve only when at least two non-missing
/// values remain and the bandwidth is non-degenerate; anything else is
/// skipped silently rather than failing the whole chart. Each kept series
/// bakes its mean and median into the display name.
pub fn kde(table: &Table, column: &str, opts: &KdeOptions) -> Result<Value> {
    let col_idx = table.col_idx(column)?;
    let hue_idx = match &opts.hue {
        Some(h) => Some(table.col_idx(h)?),
        None => None,
    };

    let all_vals: Vec<f64> = table
        .numeric_column(column)?
        .into_iter()
        .flatten()
        .collect();

    let mut series_list: Vec<Value> = Vec::new();
    let mut legend_data: Vec<String> = Vec::new();

    if !all_vals.is_empty() {
        let xmin = all_vals.iter().copied().fold(f64::INFINITY, f64::min);
        let xmax = all_vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let xs = stats::linspace(xmin, xmax, opts.grid_size);

        // Group rows, first-appearance order; ungrouped is one group named
        // after the column.
        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
        match hue_idx {
            Some(hi) => {
                for row in table.rows() {
                    let Some(level) = row[hi].display() else {
                        continue;
                    };
                    let Some(v) = row[col_idx].to_num()? else {
                        continue;
                    };
                    match groups.iter_mut().find(|(name, _)| *name == level) {
                        Some((_, vals)) => vals.push(v),
                        None => groups.push((level, vec![v])),
                    }
                }
            }
            None => groups.push((column.to_string(), all_vals.clone())),
        }

        for (base_name, vals) in &groups {
            if vals.len() < 2 {
                continue;
            }
            let Some(std) = stats::sample_std(vals) else {
                continue;
            };
            let factor = opts
                .bandwidth
                .unwrap_or_else(|| (vals.len() as f64).powf(-0.2));
            let ys = stats::gaussian_kde(vals, factor * std, &xs);
            if ys.is_empty() {
                continue;
            }

            // Both metrics exist here: vals has at least two entries.
            let mean = stats::mean(vals).unwrap_or(0.0);
            let median = stats::median(vals).unwrap_or(0.0);
            let series_name = format!("{base_name} (Mean: {mean:.1}, Median: {median:.1})");

            let data: Vec<Value> = xs
                .iter()
                .zip(ys.iter())
                .map(|(x, y)| json!([num(*x), num(*y)]))
                .collect();

            let mut cfg = Map::new();
            cfg.insert("name".into(), json!(series_name));
            cfg.insert("type".into(), json!("line"));
            cfg.insert("smooth".into(), json!(true));
            cfg.insert("data".into(), Value::Array(data));
            cfg.insert("showSymbol".into(), json!(false));
            if opts.show_metrics || opts.annotate_metrics {
                cfg.insert(
                    "markLine".into(),
                    json!({
                        "symbol": ["none", "none"],
                        "lineStyle": {"type": "dashed", "opacity": 0.4},
                        "data": markline_entries(opts, &xs, &ys, mean, median, xmin, xmax),
                    }),
                );
            }
            series_list.push(Value::Object(cfg));
            if opts.hue.is_some() {
                legend_data.push(series_name);
            }
        }
    }

    let mut option = Map::new();
    if let Some(title) = &opts.title {
        option.insert(
            "title".into(),
            json!({"text": title, "left": "center", "top": opts.title_top}),
        );
    }
    if opts.hue.is_some() {
        option.insert(
            "legend".into(),
            json!({
                "data": legend_data,
                "orient": "horizontal",
                "left": "center",
                "top": opts.legend_top,
            }),
        );
    }
    option.insert(
        "tooltip".into(),
        json!({"show": false, "trigger": "axis", "axisPointer": {"type": "line"}}),
    );
    option.insert("xAxis".into(), json!({"type": "value", "name": column}));
    option.insert("yAxis".into(), json!({"type": "value", "name": "Density"}));
    option.insert("series".into(), Value::Array(series_list));
    merge_extra(&mut option, &opts.extra);
    Ok(Value::Object(option))
}

/// Mean/median marker entries: full vertical lines and/or horizontal
/// pointer pairs whose labels alternate above/below to reduce overlap.
fn markline_entries(
    opts: &KdeOptions,
    xs: &[f64],
    ys: &[f64],
    mean: f64,
    median: f64,
    xmin: f64,
    xmax: f64,
) -> Vec<Value> {
    let offs_x = opts.annotate_offset.unwrap_or((xmax - xmin) * 0.01);
    let mut entries = Vec::new();
    for (idx, (metric, x)) in [("Mean", mean), ("Median", median)].into_iter().enumerate() {
        let label = format!("{metric}: {x:.1}");
        if opts.show_metrics {
            entries.push(json!({"name": label, "xAxis": num(x)}));
        }
        if opts.annotate_metrics {
            let nearest = xs
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| (*a - x).abs().total_cmp(&(*b - x).abs()))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let y = ys.get(nearest).copied().unwrap_or(0.0);
            let y_off = opts.annotate_label_offset * if idx % 2 == 1 { 1 } else { -1 };
            entries.push(json!([
                {"coord": [num(x), num(y)]},
                {
                    "coord": [num(x + offs_x), num(y)],
                    "name": label,
                    "label": {
                        "show": true,
                        "formatter": "{b}",
                        "position": "end",
                        "offset": [0, y_off],
                        "fontWeight": "bold",
                    },
                },
            ]));
        }
    }
    entries
}

/// Styling knobs for [`histogram`].
#[derive(Debug, Clone)]
pub struct HistogramOptions {
    pub bins: usize,
    /// Normalized density instead of raw counts.
    pub density: bool,
    pub title: Option<String>,
    pub extra: Map<String, Value>,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            bins: 10,
            density: false,
            title: None,
            extra: Map::new(),
        }
    }
}

/// Build a histogram option (rendered as a bar chart) for a numeric
/// column. Bins are fixed-width over `[min, max]` of the non-missing
/// values; labels show the interval boundaries to one decimal.
pub fn histogram(table: &Table, column: &str, opts: &HistogramOptions) -> Result<Value> {
    if opts.bins == 0 {
        return Err(ChartError::invalid_data("bin count must be at least 1"));
    }
    let vals: Vec<f64> = table
        .numeric_column(column)?
        .into_iter()
        .flatten()
        .collect();

    let (counts, edges) = stats::histogram(&vals, opts.bins);
    let heights = if opts.density {
        stats::to_density(&counts, &edges, vals.len())
    } else {
        counts
    };
    let labels: Vec<String> = (0..heights.len())
        .map(|i| format!("{:.1}\u{2013}{:.1}", edges[i], edges[i + 1]))
        .collect();

    let mut option = Map::new();
    insert_title(&mut option, opts.title.as_deref());
    option.insert(
        "tooltip".into(),
        json!({"trigger": "axis", "formatter": "{b}: {c}"}),
    );
    option.insert(
        "xAxis".into(),
        json!({"type": "category", "data": labels, "name": column}),
    );
    option.insert(
        "yAxis".into(),
        json!({"type": "value", "name": if opts.density { "Density" } else { "Count" }}),
    );
    option.insert(
        "series".into(),
        json!([{
            "type": "bar",
            "data": heights.iter().map(|h| num(*h)).collect::<Vec<_>>(),
        }]),
    );
    merge_extra(&mut option, &opts.extra);
    Ok(Value::Object(option))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn stay_table() -> Table {
        let mut t = Table::new(["ward", "stay"]);
        for (w, v) in [
            ("A", Some(2.0)),
            ("A", Some(3.0)),
            ("A", Some(5.0)),
            ("B", Some(4.0)),
            ("B", None),
            ("C", Some(9.0)),
        ] {
            t.push_row([
                Cell::str(w),
                v.map(Cell::num).unwrap_or(Cell::Null),
            ])
            .unwrap();
        }
        t
    }

    #[test]
    fn sparse_groups_are_skipped() {
        let opts = KdeOptions {
            hue: Some("ward".into()),
            ..Default::default()
        };
        let opt = kde(&stay_table(), "stay", &opts).unwrap();
        // B has one usable value and C has one row; only A survives.
        let series = opt["series"].as_array().unwrap();
        assert_eq!(series.len(), 1);
        let name = series[0]["name"].as_str().unwrap();
        assert!(name.starts_with("A (Mean: 3.3, Median: 3.0"), "{name}");
    }

    #[test]
    fn grid_spans_global_range() {
        let opts = KdeOptions {
            hue: Some("ward".into()),
            grid_size: 50,
            ..Default::default()
        };
        let opt = kde(&stay_table(), "stay", &opts).unwrap();
        let data = opt["series"][0]["data"].as_array().unwrap();
        assert_eq!(data.len(), 50);
        // First and last x positions cover min..max across all groups.
        assert_eq!(data[0][0], 2.0);
        let last = data[49][0].as_f64().unwrap();
        assert!((last - 9.0).abs() < 1e-9, "{last}");
    }

    #[test]
    fn metrics_markers_alternate_offsets() {
        let opts = KdeOptions {
            annotate_metrics: true,
            ..Default::default()
        };
        let opt = kde(&stay_table(), "stay", &opts).unwrap();
        let marks = opt["series"][0]["markLine"]["data"].as_array().unwrap();
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0][1]["label"]["offset"], json!([0, -10]));
        assert_eq!(marks[1][1]["label"]["offset"], json!([0, 10]));
    }

    #[test]
    fn histogram_counts_and_labels() {
        let mut t = Table::new(["v"]);
        for v in [1.0, 2.0, 2.0, 3.0, 10.0] {
            t.push_row([Cell::num(v)]).unwrap();
        }
        let opts = HistogramOptions {
            bins: 2,
            ..Default::default()
        };
        let opt = histogram(&t, "v", &opts).unwrap();
        assert_eq!(opt["series"][0]["data"], json!([4.0, 1.0]));
        assert_eq!(opt["xAxis"]["data"][0], "1.0\u{2013}5.5");
        assert_eq!(opt["yAxis"]["name"], "Count");
    }

    #[test]
    fn histogram_density_mode() {
        let mut t = Table::new(["v"]);
        for v in [1.0, 2.0, 2.0, 3.0, 10.0] {
            t.push_row([Cell::num(v)]).unwrap();
        }
        let opts = HistogramOptions {
            bins: 2,
            density: true,
            ..Default::default()
        };
        let opt = histogram(&t, "v", &opts).unwrap();
        assert_eq!(opt["yAxis"]["name"], "Density");
        let first = opt["series"][0]["data"][0].as_f64().unwrap();
        assert!((first - 4.0 / (5.0 * 4.5)).abs() < 1e-12);
    }
}
