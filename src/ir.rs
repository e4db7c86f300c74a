use crate::axes::AxesConfig;
use crate::legend::{LegendHandle, LegendLoc};
use crate::palette::CategoryColors;
use crate::series::SeriesLine;

/// A fully resolved category plot, ready for a backend to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPlot {
    pub width: u32,
    pub height: u32,
    pub dpi: f64,
    pub colors: CategoryColors,
    pub lines: Vec<SeriesLine>,
    pub legend: Legend,
    pub axes: AxesConfig,
    /// Line width in points
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub handles: Vec<LegendHandle>,
    /// Never `Best` once the plot is built.
    pub loc: LegendLoc,
    pub fontsize: f64,
}
