//! Public enums shared across the chart builders.

/// Legend flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendOrient {
    #[default]
    Vertical,
    Horizontal,
}

impl LegendOrient {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            LegendOrient::Vertical => "vertical",
            LegendOrient::Horizontal => "horizontal",
        }
    }
}

/// Bar/sankey axis arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Categories along the x axis (bars grow upward).
    #[default]
    Vertical,
    /// Categories along the y axis (bars grow rightward).
    Horizontal,
}

impl Orientation {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

/// How multi-series bars combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarMode {
    #[default]
    Grouped,
    Stacked,
}

/// Pie slice label placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieLabelMode {
    /// No slice labels.
    #[default]
    None,
    /// Labels drawn inside the slices.
    Inside,
    /// Labels outside with guide lines.
    Outside,
    /// No resting labels; the hovered slice's label appears in the donut
    /// center.
    CenterOnHover,
}

/// Sankey link routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SankeyLayout {
    /// Straight-line connections.
    #[default]
    None,
    /// Right-angled links.
    Orthogonal,
}

impl SankeyLayout {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SankeyLayout::None => "none",
            SankeyLayout::Orthogonal => "orthogonal",
        }
    }
}
