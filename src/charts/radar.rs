//! Radar (spider) chart options for multi-axis comparisons.

use crate::charts::util::{insert_title, merge_extra, num};
use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One radar axis: display name plus its maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarIndicator {
    pub name: String,
    pub max: f64,
}

impl RadarIndicator {
    pub fn new(name: impl Into<String>, max: f64) -> Self {
        Self {
            name: name.into(),
            max,
        }
    }
}

/// Styling knobs for [`radar`].
#[derive(Debug, Clone, Default)]
pub struct RadarOptions {
    pub title: Option<String>,
    /// Display names per value vector; unnamed series become `Series N`.
    pub series_names: Option<Vec<String>>,
    pub extra: Map<String, Value>,
}

/// Build a radar option from indicator axes and one value vector per
/// series. Every vector must match the indicator count, otherwise the
/// call fails with `DimensionMismatch`.
pub fn radar(indicators: &[RadarIndicator], data: &[Vec<f64>], opts: &RadarOptions) -> Result<Value> {
    for vals in data {
        if vals.len() != indicators.len() {
            return Err(ChartError::DimensionMismatch {
                expected: indicators.len(),
                got: vals.len(),
            });
        }
    }

    let series_data: Vec<Value> = data
        .iter()
        .enumerate()
        .map(|(i, vals)| {
            let name = opts
                .series_names
                .as_ref()
                .and_then(|names| names.get(i).cloned())
                .unwrap_or_else(|| format!("Series {}", i + 1));
            json!({
                "value": vals.iter().map(|v| num(*v)).collect::<Vec<_>>(),
                "name": name,
            })
        })
        .collect();

    let indicator_json: Vec<Value> = indicators
        .iter()
        .map(|ind| json!({"name": ind.name, "max": num(ind.max)}))
        .collect();

    let mut option = Map::new();
    insert_title(&mut option, opts.title.as_deref());
    option.insert("tooltip".into(), json!({"confine": true}));
    option.insert("radar".into(), json!({"indicator": indicator_json}));
    option.insert(
        "series".into(),
        json!([{
            "type": "radar",
            "data": series_data,
            "itemStyle": {},
            "areaStyle": {"opacity": 0.2},
        }]),
    );
    merge_extra(&mut option, &opts.extra);
    Ok(Value::Object(option))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes() -> Vec<RadarIndicator> {
        vec![
            RadarIndicator::new("Safety", 100.0),
            RadarIndicator::new("Nightlife", 100.0),
            RadarIndicator::new("Transit", 100.0),
        ]
    }

    #[test]
    fn vector_length_is_checked() {
        let err = radar(&axes(), &[vec![1.0, 2.0]], &RadarOptions::default()).unwrap_err();
        match err {
            ChartError::DimensionMismatch { expected, got } => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unnamed_series_are_numbered() {
        let opt = radar(
            &axes(),
            &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            &RadarOptions::default(),
        )
        .unwrap();
        let data = opt["series"][0]["data"].as_array().unwrap();
        assert_eq!(data[0]["name"], "Series 1");
        assert_eq!(data[1]["name"], "Series 2");
    }

    #[test]
    fn named_series_keep_their_names() {
        let opts = RadarOptions {
            series_names: Some(vec!["Dublin".into()]),
            ..Default::default()
        };
        let opt = radar(&axes(), &[vec![1.0, 2.0, 3.0]], &opts).unwrap();
        assert_eq!(opt["series"][0]["data"][0]["name"], "Dublin");
        assert_eq!(opt["series"][0]["areaStyle"]["opacity"], 0.2);
    }
}
