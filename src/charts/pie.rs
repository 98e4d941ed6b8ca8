//! Pie and donut options with flexible legend and label placement.

use crate::charts::types::{LegendOrient, PieLabelMode};
use crate::charts::util::{insert_title, merge_extra, num};
use crate::error::Result;
use crate::table::Table;
use serde_json::{Map, Value, json};

/// Styling knobs for [`pie`]. `extra` is merged over the assembled option
/// last and wins over every built-in section.
#[derive(Debug, Clone)]
pub struct PieOptions {
    pub title: Option<String>,
    /// Outer radius; combined with `inner_radius` for a donut.
    pub radius: String,
    pub inner_radius: Option<String>,
    /// Pixel rounding on slice corners.
    pub border_radius: u32,
    pub start_angle: i32,
    pub legend_orient: LegendOrient,
    pub legend_left: String,
    pub legend_top: Option<String>,
    pub legend_bottom: Option<String>,
    pub label: PieLabelMode,
    pub label_font_size: u32,
    /// Formatter for inside/outside labels, passed through verbatim.
    pub label_formatter: String,
    /// Formatter for the hover-center label of a donut.
    pub center_label_formatter: String,
    pub center_label_font_size: u32,
    pub center_label_font_weight: String,
    pub avoid_label_overlap: bool,
    pub extra: Map<String, Value>,
}

impl Default for PieOptions {
    fn default() -> Self {
        Self {
            title: None,
            radius: "50%".into(),
            inner_radius: None,
            border_radius: 0,
            start_angle: 45,
            legend_orient: LegendOrient::Vertical,
            legend_left: "left".into(),
            legend_top: None,
            legend_bottom: None,
            label: PieLabelMode::None,
            label_font_size: 10,
            label_formatter: "{b}: {c} ({d}%)".into(),
            center_label_formatter: "{b}\n{c}".into(),
            center_label_font_size: 18,
            center_label_font_weight: "bold".into(),
            avoid_label_overlap: true,
            extra: Map::new(),
        }
    }
}

/// Build a pie/donut option from one name column and one value column.
///
/// One `{name, value}` data point per row; rows with a missing name or
/// value are dropped, and a value that does not coerce to a number fails
/// with `InvalidData`. Zero surviving rows produce a valid option with an
/// empty data list.
pub fn pie(table: &Table, names: &str, values: &str, opts: &PieOptions) -> Result<Value> {
    let name_idx = table.col_idx(names)?;
    let value_idx = table.col_idx(values)?;

    let mut data = Vec::new();
    for row in table.rows() {
        let (Some(name), Some(value)) = (row[name_idx].display(), row[value_idx].to_num()?) else {
            continue;
        };
        data.push(json!({"name": name, "value": num(value)}));
    }

    let radius: Value = match &opts.inner_radius {
        Some(inner) => json!([inner, opts.radius]),
        None => json!(opts.radius),
    };

    let (label, label_line) = match opts.label {
        PieLabelMode::Inside => (
            json!({
                "show": true,
                "position": "inside",
                "formatter": opts.label_formatter,
                "fontSize": opts.label_font_size,
            }),
            json!({"show": false}),
        ),
        PieLabelMode::Outside => (
            json!({
                "show": true,
                "position": "outside",
                "formatter": opts.label_formatter,
                "fontSize": opts.label_font_size,
            }),
            json!({"show": true, "length": 15, "length2": 10}),
        ),
        PieLabelMode::None | PieLabelMode::CenterOnHover => {
            (json!({"show": false}), json!({"show": false}))
        }
    };

    let mut legend = Map::new();
    legend.insert("orient".into(), json!(opts.legend_orient.as_str()));
    legend.insert("left".into(), json!(opts.legend_left));
    if let Some(top) = &opts.legend_top {
        legend.insert("top".into(), json!(top));
    }
    if let Some(bottom) = &opts.legend_bottom {
        legend.insert("bottom".into(), json!(bottom));
    }

    let mut series = Map::new();
    series.insert("name".into(), json!(names));
    series.insert("startAngle".into(), json!(opts.start_angle));
    series.insert("type".into(), json!("pie"));
    series.insert("radius".into(), radius);
    series.insert("data".into(), Value::Array(data));
    series.insert("avoidLabelOverlap".into(), json!(opts.avoid_label_overlap));
    series.insert("label".into(), label);
    series.insert("labelLine".into(), label_line);
    series.insert(
        "emphasis".into(),
        json!({
            "label": {
                "show": opts.label == PieLabelMode::CenterOnHover,
                "position": "center",
                "formatter": opts.center_label_formatter,
                "fontSize": opts.center_label_font_size,
                "fontWeight": opts.center_label_font_weight,
            },
            "itemStyle": {
                "shadowBlur": 10,
                "shadowOffsetX": 0,
                "shadowColor": "rgba(0, 0, 0, 0.5)",
            },
        }),
    );
    if opts.border_radius > 0 {
        series.insert(
            "itemStyle".into(),
            json!({"borderRadius": opts.border_radius}),
        );
    }

    let mut option = Map::new();
    insert_title(&mut option, opts.title.as_deref());
    option.insert(
        "tooltip".into(),
        json!({"trigger": "item", "confine": true, "formatter": "{b}: {c} ({d}%)"}),
    );
    option.insert("legend".into(), Value::Object(legend));
    option.insert("series".into(), json!([Value::Object(series)]));
    merge_extra(&mut option, &opts.extra);
    Ok(Value::Object(option))
}
