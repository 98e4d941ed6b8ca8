//! Option builders for the supported chart families.
//!
//! Every builder is a pure function from `(Table, role columns, typed
//! options)` to a `serde_json::Value` option object the rendering library
//! consumes as-is. Builders share no state; the only cross-cutting pieces
//! are the color utilities in [`crate::color`] and the numeric helpers in
//! [`crate::stats`].
//!
//! Options structs are `Default`-constructible; their `extra` map is merged
//! over the assembled option last, at the top level, so caller overrides
//! always win over built-in defaults.

pub mod bar;
pub mod density;
pub mod hierarchy;
pub mod pie;
pub mod radar;
pub mod types;

pub(crate) mod util;

pub use bar::{BarOptions, bar};
pub use density::{HistogramOptions, KdeOptions, histogram, kde};
pub use hierarchy::{SankeyOptions, SunburstOptions, sankey_multi, sunburst};
pub use pie::{PieOptions, pie};
pub use radar::{RadarIndicator, RadarOptions, radar};
pub use types::{BarMode, LegendOrient, Orientation, PieLabelMode, SankeyLayout};
