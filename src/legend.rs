use anyhow::{anyhow, Result};
use plotters::style::RGBColor;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::data::sort_natural;
use crate::palette::CategoryColors;

/// Category column whose values get shortened to their last dotted component
/// when no label mapping is supplied.
pub const MODEL_TYPE_COLUMN: &str = "model_type";

/// Maps a category value to the text shown in the legend.
#[derive(Clone)]
pub struct LabelFn(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl LabelFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn identity() -> Self {
        Self::new(str::to_string)
    }

    /// Keep only the final component of a dotted path
    /// (`sklearn.ensemble.RandomForestClassifier` -> `RandomForestClassifier`).
    pub fn last_component() -> Self {
        Self::new(|s| s.rsplit('.').next().unwrap_or(s).to_string())
    }

    /// Label mapping used when the caller supplies none.
    pub fn default_for(cat_col: &str) -> Self {
        if cat_col == MODEL_TYPE_COLUMN {
            Self::last_component()
        } else {
            Self::identity()
        }
    }

    pub fn apply(&self, category: &str) -> String {
        (self.0)(category)
    }
}

impl fmt::Debug for LabelFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFn(..)")
    }
}

/// A legend-only entry: a color swatch and its label, with no data points.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendHandle {
    pub category: String,
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

/// One handle per category, ordered by category value so the legend does
/// not depend on row order.
pub fn build_legend_handles(colors: &CategoryColors, label_fn: &LabelFn) -> Vec<LegendHandle> {
    let mut categories: Vec<String> = colors.categories().map(str::to_string).collect();
    sort_natural(&mut categories);

    categories
        .into_iter()
        .filter_map(|category| {
            let color = colors.get(&category)?;
            Some(LegendHandle {
                label: label_fn.apply(&category),
                category,
                color,
                points: Vec::new(),
            })
        })
        .collect()
}

/// Legend placement inside the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LegendLoc {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl FromStr for LegendLoc {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        let loc = match normalized.as_str() {
            "best" | "0" => LegendLoc::Best,
            "upper right" | "1" => LegendLoc::UpperRight,
            "upper left" | "2" => LegendLoc::UpperLeft,
            "lower left" | "3" => LegendLoc::LowerLeft,
            "lower right" | "4" => LegendLoc::LowerRight,
            "right" | "5" => LegendLoc::Right,
            "center left" | "6" => LegendLoc::CenterLeft,
            "center right" | "7" => LegendLoc::CenterRight,
            "lower center" | "8" => LegendLoc::LowerCenter,
            "upper center" | "9" => LegendLoc::UpperCenter,
            "center" | "10" => LegendLoc::Center,
            _ => return Err(anyhow!("Unknown legend location '{}'", s)),
        };
        Ok(loc)
    }
}

impl TryFrom<String> for LegendLoc {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Corners tried for `Best`, in order of preference.
const BEST_CANDIDATES: [LegendLoc; 4] = [
    LegendLoc::UpperRight,
    LegendLoc::UpperLeft,
    LegendLoc::LowerLeft,
    LegendLoc::LowerRight,
];

impl LegendLoc {
    /// Resolve `Best` to the corner quadrant holding the fewest points.
    /// Other locations are returned unchanged.
    pub fn resolve<'a, I>(self, points: I, x_range: (f64, f64), y_range: (f64, f64)) -> LegendLoc
    where
        I: IntoIterator<Item = &'a (f64, f64)>,
    {
        if self != LegendLoc::Best {
            return self;
        }

        let x_mid = (x_range.0 + x_range.1) / 2.0;
        let y_mid = (y_range.0 + y_range.1) / 2.0;

        // upper right, upper left, lower left, lower right
        let mut counts = [0usize; 4];
        for &(x, y) in points {
            let slot = match (x >= x_mid, y >= y_mid) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            counts[slot] += 1;
        }

        let mut best = 0;
        for (slot, &count) in counts.iter().enumerate() {
            if count < counts[best] {
                best = slot;
            }
        }
        BEST_CANDIDATES[best]
    }
}
