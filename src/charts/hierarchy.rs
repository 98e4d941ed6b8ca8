//! Hierarchical and flow charts: sunburst trees and multi-stage Sankey
//! diagrams.

use crate::charts::types::{Orientation, SankeyLayout};
use crate::charts::util::{insert_title, merge_extra, num};
use crate::color::lighten_hex;
use crate::error::{ChartError, Result};
use crate::table::Table;
use ahash::{AHashMap, AHashSet};
use serde_json::{Map, Value, json};

/// Placeholder label for a missing cell inside the hierarchy path.
const NA_LABEL: &str = "<NA>";

/// Styling knobs for [`sunburst`].
#[derive(Debug, Clone)]
pub struct SunburstOptions {
    pub title: Option<String>,
    /// `[inner, outer]` radii.
    pub radius: (String, String),
    /// `[x, y]` center position.
    pub center: (String, String),
    /// Base slice color; deeper rings get progressively lighter.
    pub base_color: String,
    pub extra: Map<String, Value>,
}

impl Default for SunburstOptions {
    fn default() -> Self {
        Self {
            title: None,
            radius: ("20%".into(), "75%".into()),
            center: ("50%".into(), "50%".into()),
            base_color: "#5470c6".into(),
            extra: Map::new(),
        }
    }
}

struct TreeNode {
    name: String,
    value: f64,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn child_mut(children: &mut Vec<TreeNode>, name: &str) -> usize {
        match children.iter().position(|c| c.name == name) {
            Some(i) => i,
            None => {
                children.push(TreeNode {
                    name: name.to_string(),
                    value: 0.0,
                    children: Vec::new(),
                });
                children.len() - 1
            }
        }
    }

    /// Add `v` to every node along the remaining path, creating nodes as
    /// needed.
    fn add_path(children: &mut Vec<TreeNode>, keys: &[String], v: f64) {
        let Some((key, rest)) = keys.split_first() else {
            return;
        };
        let pos = Self::child_mut(children, key);
        children[pos].value += v;
        Self::add_path(&mut children[pos].children, rest, v);
    }
}

/// Build a monochrome sunburst option by grouping rows along `path`
/// (root to leaf) and summing `values` at every node on the way down.
///
/// Missing hierarchy cells are labeled `<NA>` rather than dropping the
/// row; a missing or non-coercible value drops or fails the row the same
/// way the other builders do. Ring colors start at `base_color` and
/// lighten toward white by `depth / path_len`.
pub fn sunburst(table: &Table, path: &[&str], values: &str, opts: &SunburstOptions) -> Result<Value> {
    if path.is_empty() {
        return Err(ChartError::invalid_data("sunburst path must name at least one column"));
    }
    let path_idx: Vec<usize> = path
        .iter()
        .map(|col| table.col_idx(col))
        .collect::<Result<_>>()?;
    let value_idx = table.col_idx(values)?;

    let mut roots: Vec<TreeNode> = Vec::new();
    for row in table.rows() {
        let Some(v) = row[value_idx].to_num()? else {
            continue;
        };
        let keys: Vec<String> = path_idx
            .iter()
            .map(|&idx| row[idx].display().unwrap_or_else(|| NA_LABEL.to_string()))
            .collect();
        TreeNode::add_path(&mut roots, &keys, v);
    }

    let data = build_nodes(&roots, 0, path.len(), &opts.base_color)?;

    let mut option = Map::new();
    insert_title(&mut option, opts.title.as_deref());
    option.insert(
        "series".into(),
        json!([{
            "type": "sunburst",
            "radius": [opts.radius.0, opts.radius.1],
            "center": [opts.center.0, opts.center.1],
            "data": data,
            "label": {"rotate": "radial"},
        }]),
    );
    merge_extra(&mut option, &opts.extra);
    Ok(Value::Object(option))
}

fn build_nodes(nodes: &[TreeNode], depth: usize, path_len: usize, base: &str) -> Result<Vec<Value>> {
    let color = lighten_hex(base, depth as f64 / path_len as f64)?;
    nodes
        .iter()
        .map(|node| {
            let mut item = Map::new();
            item.insert("name".into(), json!(node.name));
            item.insert("value".into(), num(node.value));
            item.insert("itemStyle".into(), json!({"color": color}));
            item.insert(
                "label".into(),
                json!({"formatter": "{b}: {c}", "rotate": "radial"}),
            );
            let children = build_nodes(&node.children, depth + 1, path_len, base)?;
            if !children.is_empty() {
                item.insert("children".into(), Value::Array(children));
            }
            Ok(Value::Object(item))
        })
        .collect()
}

/// Styling knobs for [`sankey_multi`].
#[derive(Debug, Clone)]
pub struct SankeyOptions {
    /// Node width in px.
    pub node_width: u32,
    /// Gap between adjacent nodes in px.
    pub node_gap: u32,
    pub layout: SankeyLayout,
    pub orient: Orientation,
    /// Emphasis settings, e.g. `{"focus": "adjacency"}`.
    pub emphasis: Option<Value>,
    pub extra: Map<String, Value>,
}

impl Default for SankeyOptions {
    fn default() -> Self {
        Self {
            node_width: 20,
            node_gap: 8,
            layout: SankeyLayout::None,
            orient: Orientation::Horizontal,
            emphasis: None,
            extra: Map::new(),
        }
    }
}

/// Build an N-stage Sankey option.
///
/// For each adjacent pair in `levels`, rows are grouped by the
/// `(source, target)` value pair and `value` is summed into one link; rows
/// missing either end of the pair are excluded from that pair only. Nodes
/// are the union of distinct stage values in row-major first-appearance
/// order. Self-loops survive untouched.
pub fn sankey_multi(
    table: &Table,
    levels: &[&str],
    value: &str,
    opts: &SankeyOptions,
) -> Result<Value> {
    if levels.len() < 2 {
        return Err(ChartError::invalid_data(
            "sankey needs at least two stage columns",
        ));
    }
    let level_idx: Vec<usize> = levels
        .iter()
        .map(|col| table.col_idx(col))
        .collect::<Result<_>>()?;
    let value_idx = table.col_idx(value)?;

    let mut links: Vec<Value> = Vec::new();
    for pair in level_idx.windows(2) {
        let (src_idx, tgt_idx) = (pair[0], pair[1]);
        let mut order: Vec<(String, String)> = Vec::new();
        let mut sums: AHashMap<(String, String), f64> = AHashMap::new();
        for row in table.rows() {
            let (Some(src), Some(tgt)) = (row[src_idx].display(), row[tgt_idx].display()) else {
                continue;
            };
            let key = (src, tgt);
            if !sums.contains_key(&key) {
                order.push(key.clone());
            }
            let slot = sums.entry(key).or_insert(0.0);
            if let Some(v) = row[value_idx].to_num()? {
                *slot += v;
            }
        }
        for key in order {
            let total = sums[&key];
            links.push(json!({
                "source": key.0,
                "target": key.1,
                "value": num(total),
            }));
        }
    }

    let mut seen: AHashSet<String> = AHashSet::new();
    let mut nodes: Vec<Value> = Vec::new();
    for row in table.rows() {
        for &idx in &level_idx {
            if let Some(name) = row[idx].display()
                && seen.insert(name.clone())
            {
                nodes.push(json!({"name": name}));
            }
        }
    }

    let mut series = Map::new();
    series.insert("type".into(), json!("sankey"));
    series.insert("layout".into(), json!(opts.layout.as_str()));
    series.insert("orient".into(), json!(opts.orient.as_str()));
    series.insert("data".into(), Value::Array(nodes));
    series.insert("links".into(), Value::Array(links));
    series.insert("nodeWidth".into(), json!(opts.node_width));
    series.insert("nodeGap".into(), json!(opts.node_gap));
    if let Some(emphasis) = &opts.emphasis {
        series.insert("emphasis".into(), emphasis.clone());
    }

    let mut option = Map::new();
    option.insert(
        "tooltip".into(),
        json!({"trigger": "item", "triggerOn": "mousemove"}),
    );
    option.insert("series".into(), json!([Value::Object(series)]));
    merge_extra(&mut option, &opts.extra);
    Ok(Value::Object(option))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn referral_table() -> Table {
        let mut t = Table::new(["origin", "clinic", "outcome", "n"]);
        for (a, b, c, v) in [
            ("North", "Acute", "Home", 10.0),
            ("North", "Acute", "Transfer", 5.0),
            ("South", "Acute", "Home", 7.0),
            ("South", "Day", "Home", 3.0),
            ("North", "Acute", "Home", 2.0),
        ] {
            t.push_row([Cell::str(a), Cell::str(b), Cell::str(c), Cell::num(v)])
                .unwrap();
        }
        t
    }

    #[test]
    fn links_group_and_sum_per_stage_pair() {
        let opt = sankey_multi(
            &referral_table(),
            &["origin", "clinic", "outcome"],
            "n",
            &SankeyOptions::default(),
        )
        .unwrap();
        let links = opt["series"][0]["links"].as_array().unwrap();
        // Stage 1: North->Acute (17), South->Acute (7), South->Day (3).
        // Stage 2: Acute->Home (19), Acute->Transfer (5), Day->Home (3).
        assert_eq!(links.len(), 6);
        assert_eq!(links[0]["source"], "North");
        assert_eq!(links[0]["value"], 17.0);
        let stage1: f64 = links[..3].iter().map(|l| l["value"].as_f64().unwrap()).sum();
        let stage2: f64 = links[3..].iter().map(|l| l["value"].as_f64().unwrap()).sum();
        assert_eq!(stage1, 27.0);
        assert_eq!(stage2, 27.0);
    }

    #[test]
    fn nodes_are_distinct_union() {
        let opt = sankey_multi(
            &referral_table(),
            &["origin", "clinic", "outcome"],
            "n",
            &SankeyOptions::default(),
        )
        .unwrap();
        let names: Vec<&str> = opt["series"][0]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["North", "Acute", "Home", "Transfer", "South", "Day"]
        );
    }

    #[test]
    fn self_loops_survive() {
        let mut t = Table::new(["a", "b", "n"]);
        t.push_row([Cell::str("X"), Cell::str("X"), Cell::num(4.0)])
            .unwrap();
        let opt = sankey_multi(&t, &["a", "b"], "n", &SankeyOptions::default()).unwrap();
        let links = opt["series"][0]["links"].as_array().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0]["source"], "X");
        assert_eq!(links[0]["target"], "X");
    }

    #[test]
    fn sunburst_sums_along_the_path() {
        let opt = sunburst(
            &referral_table(),
            &["origin", "clinic"],
            "n",
            &SunburstOptions::default(),
        )
        .unwrap();
        let data = opt["series"][0]["data"].as_array().unwrap();
        // North: 10 + 5 + 2; its single child Acute carries the same sum.
        assert_eq!(data[0]["name"], "North");
        assert_eq!(data[0]["value"], 17.0);
        assert_eq!(data[0]["children"][0]["value"], 17.0);
        assert_eq!(data[1]["name"], "South");
        assert_eq!(data[1]["value"], 10.0);
    }

    #[test]
    fn sunburst_missing_levels_become_na() {
        let mut t = Table::new(["a", "b", "n"]);
        t.push_row([Cell::str("X"), Cell::Null, Cell::num(1.0)])
            .unwrap();
        let opt = sunburst(&t, &["a", "b"], "n", &SunburstOptions::default()).unwrap();
        assert_eq!(opt["series"][0]["data"][0]["children"][0]["name"], "<NA>");
    }

    #[test]
    fn sunburst_rings_lighten_with_depth() {
        let opt = sunburst(
            &referral_table(),
            &["origin", "clinic"],
            "n",
            &SunburstOptions::default(),
        )
        .unwrap();
        let root_color = opt["series"][0]["data"][0]["itemStyle"]["color"]
            .as_str()
            .unwrap()
            .to_string();
        let child_color = opt["series"][0]["data"][0]["children"][0]["itemStyle"]["color"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(root_color, "#5470c6");
        assert_ne!(root_color, child_color);
    }
}
