//! echarts-opts
//!
//! A lightweight Rust library that assembles Apache-ECharts-style option
//! objects from tabular data. Pairs with any renderer that accepts an
//! ECharts option object; this crate never draws pixels itself.
//!
//! ### Features
//! - Pie/donut, bar (grouped/stacked), radar, KDE density, histogram,
//!   sunburst, and multi-stage Sankey option builders
//! - Choropleth and geo-scatter options resolved against GeoJSON boundary
//!   layers (local file, URL, or in-memory), with canonical region-name
//!   matching and a process-wide single-flight layer cache
//! - Color ramps from explicit lists or named continuous scales
//! - CSV/JSON table ingestion helpers
//!
//! ### Example
//! ```
//! use echarts_opts::charts::{PieOptions, pie};
//! use echarts_opts::{Cell, Table};
//!
//! let mut table = Table::new(["ward", "admissions"]);
//! table.push_row([Cell::str("Coronary Care"), Cell::num(42.0)])?;
//! table.push_row([Cell::str("Day Surgery"), Cell::num(17.0)])?;
//!
//! let option = pie(&table, "ward", "admissions", &PieOptions::default())?;
//! assert_eq!(option["series"][0]["data"][0]["name"], "Coronary Care");
//! # Ok::<(), echarts_opts::ChartError>(())
//! ```

pub mod charts;
pub mod color;
pub mod error;
pub mod geo;
pub mod stats;
pub mod storage;
pub mod table;

pub use color::ColorSpec;
pub use error::{ChartError, Result};
pub use geo::{GeoResolver, GeoSource, LayerCache, LayerConfig};
pub use table::{Cell, Table};
