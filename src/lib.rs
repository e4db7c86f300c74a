// Library exports for catplot

pub mod axes;
pub mod csv_reader;
pub mod data;
pub mod display;
pub mod graph;
pub mod ir;
pub mod legend;
pub mod palette;
pub mod plot;
pub mod series;

pub use data::Table;
pub use display::{Collect, SaveToFile, Show, WriteTo};
pub use graph::RenderedFigure;
pub use legend::{LabelFn, LegendLoc};
pub use plot::{build_plot, plot_cats};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

/// Everything `plot_cats` takes besides the table and the x/y columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Column whose values pick line colors and legend entries.
    pub cat_col: String,
    /// Column identifying the rows drawn as one line.
    pub grp_col: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Name of a discrete palette, see [`palette::PALETTE_NAMES`].
    pub palette: String,
    /// Figure size in inches.
    pub figsize: [f64; 2],
    pub dpi: f64,
    pub x_ticks: Option<Vec<f64>>,
    pub y_ticks: Option<Vec<f64>>,
    /// `None` behaves like [`LegendLoc::Best`].
    pub legend_loc: Option<LegendLoc>,
    pub legend_fontsize: f64,
    pub label_fontsize: f64,
    pub title_fontsize: f64,
    /// Line width in points.
    pub line_width: f64,
    #[serde(rename = "type")]
    pub format: OutputFormat,
    /// Maps category values to legend labels. Defaults to
    /// [`LabelFn::default_for`] the category column.
    #[serde(skip)]
    pub label_fn: Option<LabelFn>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            cat_col: legend::MODEL_TYPE_COLUMN.to_string(),
            grp_col: "model_group_id".to_string(),
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            palette: palette::DEFAULT_PALETTE.to_string(),
            figsize: [12.0, 6.0],
            dpi: 100.0,
            x_ticks: None,
            y_ticks: None,
            legend_loc: None,
            legend_fontsize: 12.0,
            label_fontsize: 12.0,
            title_fontsize: 16.0,
            line_width: 1.5,
            format: OutputFormat::Png,
            label_fn: None,
        }
    }
}

impl PlotOptions {
    /// Figure size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.figsize[0] * self.dpi).round() as u32,
            (self.figsize[1] * self.dpi).round() as u32,
        )
    }
}

/// Convert a size in typographic points to pixels at `dpi`.
pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
    points * dpi / 72.0
}
