//! Boundary layer resolution and map chart options (choropleth and
//! geo-scatter).
//!
//! A [`GeoResolver`] is built from one or more layer configurations; each
//! layer is loaded through the shared [`LayerCache`] exactly once per
//! process. Dataset region names and boundary feature names are both
//! normalized with [`clean_area`] so they can be matched, and names the
//! chosen layer cannot place are reported as warnings, never as failures.

pub mod cache;
pub mod loader;
pub mod names;

pub use cache::LayerCache;
pub use loader::{GeoSource, load_geojson};
pub use names::clean_area;

use crate::charts::util::{merge_extra, num};
use crate::color::{ColorSpec, resolve_ramp};
use crate::error::{ChartError, Result};
use crate::table::Table;
use geojson::FeatureCollection;
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Property keys tried, case-insensitively, when no name field is
/// configured for a layer.
const NAME_FIELD_CANDIDATES: [&str; 6] = ["name", "county", "pc", "postcode", "routingkey", "id"];

/// A loaded boundary layer: the feature collection (with a canonical
/// `name` property injected on every feature) plus the set of canonical
/// region names it can display.
#[derive(Debug, Clone)]
pub struct BoundaryLayer {
    pub map_name: String,
    pub name_field: String,
    pub names: BTreeSet<String>,
    geojson: FeatureCollection,
}

impl BoundaryLayer {
    /// Normalize a feature collection into a layer. The name field is
    /// either given or detected from the first feature's properties; a
    /// collection without features cannot be inspected and fails with
    /// `Load`.
    pub fn from_feature_collection(
        map_name: String,
        mut fc: FeatureCollection,
        name_field: Option<&str>,
    ) -> Result<Self> {
        let field = match name_field {
            Some(f) => f.to_string(),
            None => detect_name_field(&fc)?,
        };
        let mut names = BTreeSet::new();
        for feature in &mut fc.features {
            let props = feature.properties.get_or_insert_with(Default::default);
            let raw = props.get(&field).and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
            if let Some(raw) = raw {
                let clean = clean_area(&raw, false);
                if !clean.is_empty() {
                    names.insert(clean.clone());
                }
                props.insert("name".into(), Value::String(clean));
            }
        }
        Ok(Self {
            map_name,
            name_field: field,
            names,
            geojson: fc,
        })
    }

    /// The normalized geometry, for registering with the renderer under
    /// [`Self::map_name`].
    pub fn geojson(&self) -> &FeatureCollection {
        &self.geojson
    }
}

fn detect_name_field(fc: &FeatureCollection) -> Result<String> {
    let first = fc
        .features
        .first()
        .ok_or_else(|| ChartError::load("boundary data has no features to inspect"))?;
    let Some(props) = &first.properties else {
        return Err(ChartError::load("boundary features carry no properties"));
    };
    for key in props.keys() {
        if NAME_FIELD_CANDIDATES.contains(&key.to_ascii_lowercase().as_str()) {
            return Ok(key.clone());
        }
    }
    props
        .keys()
        .next()
        .cloned()
        .ok_or_else(|| ChartError::load("boundary features carry no properties"))
}

/// One configured boundary layer.
#[derive(Debug, Clone)]
pub struct LayerConfig {
    /// Cache key and the name the geometry is registered under.
    pub map_name: String,
    pub source: GeoSource,
    /// Property holding region names; detected when `None`.
    pub name_field: Option<String>,
}

impl LayerConfig {
    pub fn new(map_name: impl Into<String>, source: GeoSource) -> Self {
        Self {
            map_name: map_name.into(),
            source,
            name_field: None,
        }
    }

    pub fn with_name_field(mut self, field: impl Into<String>) -> Self {
        self.name_field = Some(field.into());
        self
    }
}

/// A finished map chart: the option object plus the name of the boundary
/// geometry it references, and any region names the geometry could not
/// place.
#[derive(Debug, Clone)]
pub struct GeoChart {
    pub map_name: String,
    pub options: Value,
    pub warnings: Vec<String>,
}

/// Styling knobs for [`GeoResolver::choropleth`].
#[derive(Debug, Clone)]
pub struct ChoroplethOptions {
    pub map_title: Option<String>,
    pub subtitle: Option<String>,
    /// Extra heading line inside the tooltip.
    pub tooltip_title: Option<String>,
    /// Continuous color legend mapped over the value range.
    pub visual_map: bool,
    pub cmap: Option<ColorSpec>,
    pub label_show: bool,
    pub label_size: u32,
    pub label_on_hover: bool,
    pub hover_label_size: Option<u32>,
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub hover_color: Option<String>,
    /// Fold Dublin postal districts into the county while normalizing.
    pub collapse_dublin: bool,
    /// Merged into the series object.
    pub extra_series_opts: Map<String, Value>,
    /// Merged into the option root.
    pub extra: Map<String, Value>,
}

impl Default for ChoroplethOptions {
    fn default() -> Self {
        Self {
            map_title: None,
            subtitle: None,
            tooltip_title: None,
            visual_map: true,
            cmap: None,
            label_show: false,
            label_size: 12,
            label_on_hover: false,
            hover_label_size: None,
            fill_color: None,
            fill_opacity: None,
            hover_color: None,
            collapse_dublin: false,
            extra_series_opts: Map::new(),
            extra: Map::new(),
        }
    }
}

/// Styling knobs for [`GeoResolver::scatter`].
#[derive(Debug, Clone)]
pub struct ScatterOptions {
    pub map_title: Option<String>,
    pub subtitle: Option<String>,
    pub tooltip_title: Option<String>,
    pub symbol_size: u32,
    pub label_show: bool,
    pub label_size: u32,
    pub label_on_hover: bool,
    pub hover_label_size: Option<u32>,
    /// Merged into the `geo` section.
    pub extra_geo_opts: Map<String, Value>,
    /// Merged into the series object.
    pub extra_series_opts: Map<String, Value>,
    /// Merged into the option root.
    pub extra: Map<String, Value>,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            map_title: None,
            subtitle: None,
            tooltip_title: None,
            symbol_size: 8,
            label_show: false,
            label_size: 12,
            label_on_hover: false,
            hover_label_size: None,
            extra_geo_opts: Map::new(),
            extra_series_opts: Map::new(),
            extra: Map::new(),
        }
    }
}

/// Resolves datasets against one or more configured boundary layers and
/// assembles map chart options.
pub struct GeoResolver {
    layers: Vec<Arc<BoundaryLayer>>,
}

impl GeoResolver {
    /// Load (or reuse) every configured layer through the cache.
    pub fn new(configs: &[LayerConfig], cache: &LayerCache) -> Result<Self> {
        if configs.is_empty() {
            return Err(ChartError::invalid_data(
                "provide at least one layer configuration",
            ));
        }
        let mut layers = Vec::with_capacity(configs.len());
        for cfg in configs {
            let map_name = cfg.map_name.clone();
            let source = cfg.source.clone();
            let name_field = cfg.name_field.clone();
            let layer = cache.get_or_load(&cfg.map_name, move || {
                let fc = load_geojson(&source)?;
                BoundaryLayer::from_feature_collection(map_name, fc, name_field.as_deref())
            })?;
            layers.push(layer);
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Arc<BoundaryLayer>] {
        &self.layers
    }

    /// Pick the layer whose canonical names intersect the dataset's the
    /// most; ties go to the earlier configured layer. Returns the layer
    /// and the sorted dataset names it cannot place.
    pub fn resolve_layer(&self, dataset_names: &BTreeSet<String>) -> (&Arc<BoundaryLayer>, Vec<String>) {
        let mut best = &self.layers[0];
        let mut best_overlap = 0usize;
        for layer in &self.layers {
            let overlap = dataset_names.intersection(&layer.names).count();
            if overlap > best_overlap {
                best = layer;
                best_overlap = overlap;
            }
        }
        let missing: Vec<String> = dataset_names.difference(&best.names).cloned().collect();
        (best, missing)
    }

    /// Build a choropleth option: one `{name, value}` data point per row
    /// with a non-missing region, the region normalized to canonical form.
    ///
    /// Both columns are required. Region names the resolved layer cannot
    /// place are logged and returned as warnings alongside the still-valid
    /// option. Zero surviving rows produce an empty data list, not an
    /// error.
    pub fn choropleth(
        &self,
        table: &Table,
        region_col: &str,
        value_col: &str,
        opts: &ChoroplethOptions,
    ) -> Result<GeoChart> {
        let region_idx = table.col_idx(region_col)?;
        let value_idx = table.col_idx(value_col)?;

        let mut areas = BTreeSet::new();
        for row in table.rows() {
            if let Some(raw) = row[region_idx].display() {
                areas.insert(clean_area(&raw, opts.collapse_dublin));
            }
        }
        let (layer, missing) = self.resolve_layer(&areas);
        if !missing.is_empty() {
            log::warn!(
                "areas not found in map {:?}: {}",
                layer.map_name,
                missing.join(", ")
            );
        }

        let mut data = Vec::new();
        let mut values = Vec::new();
        for row in table.rows() {
            let Some(raw) = row[region_idx].display() else {
                continue;
            };
            let value = row[value_idx].to_num()?;
            if let Some(v) = value {
                values.push(v);
            }
            data.push(json!({
                "name": clean_area(&raw, opts.collapse_dublin),
                "value": value.map(num).unwrap_or(Value::Null),
            }));
        }

        let label = json!({
            "show": opts.label_show && !opts.label_on_hover,
            "fontSize": opts.label_size,
            "formatter": "{b}",
            "position": "right",
            "offset": [18, 0],
        });
        let emphasis_label = if opts.label_on_hover {
            json!({
                "show": true,
                "fontSize": opts.hover_label_size.unwrap_or(opts.label_size),
            })
        } else {
            json!({})
        };
        let mut item_style = Map::new();
        if let Some(fill) = &opts.fill_color {
            item_style.insert("areaColor".into(), json!(fill));
        }
        if let Some(opacity) = opts.fill_opacity {
            item_style.insert("opacity".into(), num(opacity));
        }
        let mut emphasis_style = Map::new();
        if let Some(hover) = &opts.hover_color {
            emphasis_style.insert("areaColor".into(), json!(hover));
        }

        let mut series = Map::new();
        series.insert("name".into(), json!(value_col));
        series.insert("type".into(), json!("map"));
        series.insert("map".into(), json!(layer.map_name));
        series.insert("roam".into(), json!(true));
        series.insert("label".into(), label);
        series.insert("itemStyle".into(), Value::Object(item_style));
        series.insert(
            "emphasis".into(),
            json!({"label": emphasis_label, "itemStyle": Value::Object(emphasis_style)}),
        );
        series.insert("data".into(), Value::Array(data));
        merge_extra(&mut series, &opts.extra_series_opts);

        let mut option = Map::new();
        insert_map_title(&mut option, opts.map_title.as_deref(), opts.subtitle.as_deref());
        option.insert(
            "tooltip".into(),
            tooltip_opts(opts.tooltip_title.as_deref()),
        );
        option.insert("toolbox".into(), toolbox_opts(opts.map_title.as_deref()));
        option.insert("series".into(), json!([Value::Object(series)]));

        if opts.visual_map && !values.is_empty() {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mut vis = Map::new();
            vis.insert("min".into(), num(min));
            vis.insert("max".into(), num(max));
            vis.insert("left".into(), json!("right"));
            vis.insert("top".into(), json!("bottom"));
            vis.insert("text".into(), json!(["High", "Low"]));
            vis.insert("calculable".into(), json!(true));
            vis.insert("outOfRange".into(), json!({"color": ["rgba(0,0,0,0)"]}));
            if let Some(spec) = &opts.cmap {
                vis.insert("inRange".into(), json!({"color": resolve_ramp(spec)?}));
            }
            option.insert("visualMap".into(), Value::Object(vis));
        }
        merge_extra(&mut option, &opts.extra);

        Ok(GeoChart {
            map_name: layer.map_name.clone(),
            options: Value::Object(option),
            warnings: missing,
        })
    }

    /// Build a geo-scatter option: one `[lon, lat, value]` point per row.
    /// Rows missing either coordinate are dropped. Points render over the
    /// first configured layer.
    pub fn scatter(
        &self,
        table: &Table,
        lat_col: &str,
        lon_col: &str,
        value_col: Option<&str>,
        opts: &ScatterOptions,
    ) -> Result<GeoChart> {
        let lat_idx = table.col_idx(lat_col)?;
        let lon_idx = table.col_idx(lon_col)?;
        let value_idx = match value_col {
            Some(col) => Some(table.col_idx(col)?),
            None => None,
        };

        let mut data = Vec::new();
        for row in table.rows() {
            let (Some(lat), Some(lon)) = (row[lat_idx].to_num()?, row[lon_idx].to_num()?) else {
                continue;
            };
            let value = match value_idx {
                Some(idx) => row[idx].to_json(),
                None => Value::Null,
            };
            data.push(json!([num(lon), num(lat), value]));
        }

        let layer = &self.layers[0];

        let mut geo = Map::new();
        geo.insert("map".into(), json!(layer.map_name));
        geo.insert("roam".into(), json!(true));
        geo.insert(
            "label".into(),
            json!({"show": opts.label_show, "fontSize": opts.label_size}),
        );
        merge_extra(&mut geo, &opts.extra_geo_opts);

        let mut series = Map::new();
        series.insert("name".into(), json!(value_col.unwrap_or("")));
        series.insert("type".into(), json!("scatter"));
        series.insert("coordinateSystem".into(), json!("geo"));
        series.insert("symbolSize".into(), json!(opts.symbol_size));
        series.insert(
            "label".into(),
            json!({"show": opts.label_show, "fontSize": opts.label_size, "color": "red"}),
        );
        series.insert(
            "emphasis".into(),
            json!({"label": {
                "show": opts.label_on_hover,
                "fontSize": opts.hover_label_size.unwrap_or(opts.label_size),
            }}),
        );
        series.insert("data".into(), Value::Array(data));
        merge_extra(&mut series, &opts.extra_series_opts);

        let mut option = Map::new();
        insert_map_title(&mut option, opts.map_title.as_deref(), opts.subtitle.as_deref());
        option.insert(
            "tooltip".into(),
            tooltip_opts(opts.tooltip_title.as_deref()),
        );
        option.insert("geo".into(), Value::Object(geo));
        option.insert("series".into(), json!([Value::Object(series)]));
        merge_extra(&mut option, &opts.extra);

        Ok(GeoChart {
            map_name: layer.map_name.clone(),
            options: Value::Object(option),
            warnings: Vec::new(),
        })
    }
}

fn insert_map_title(option: &mut Map<String, Value>, title: Option<&str>, subtitle: Option<&str>) {
    if title.is_none() && subtitle.is_none() {
        return;
    }
    let mut block = Map::new();
    if let Some(text) = title {
        block.insert("text".into(), json!(text));
    }
    if let Some(subtext) = subtitle {
        block.insert("subtext".into(), json!(subtext));
    }
    block.insert("left".into(), json!("right"));
    option.insert("title".into(), Value::Object(block));
}

fn tooltip_opts(tooltip_title: Option<&str>) -> Value {
    let heading = match tooltip_title {
        Some(t) => format!(
            "<span style='color:darkgray; font-size:14px; font-weight:bold;'>{t}</span><br/>"
        ),
        None => String::new(),
    };
    json!({
        "trigger": "item",
        "formatter": format!("{heading}{{b}}: {{c}}"),
        "backgroundColor": "white",
    })
}

fn toolbox_opts(map_title: Option<&str>) -> Value {
    json!({
        "show": true,
        "left": "left",
        "top": "top",
        "feature": {
            "dataView": {"readOnly": true},
            "restore": {},
            "saveAsImage": {"name": map_title.unwrap_or("map"), "type": "png"},
        },
    })
}
