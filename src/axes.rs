use crate::series::SeriesLine;

/// The y axis always spans this range; values are read as proportions.
pub const Y_LIMITS: (f64, f64) = (0.0, 1.1);

/// Resolved axis settings for one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesConfig {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_ticks: Option<Vec<f64>>,
    pub y_ticks: Option<Vec<f64>>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub title_fontsize: f64,
    pub label_fontsize: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            x_range: (0.0, 1.0),
            y_range: Y_LIMITS,
            x_ticks: None,
            y_ticks: None,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            title_fontsize: 16.0,
            label_fontsize: 12.0,
        }
    }
}

impl AxesConfig {
    /// Override tick positions. `None` keeps the automatic ticks.
    pub fn set_ticks(&mut self, x_ticks: Option<Vec<f64>>, y_ticks: Option<Vec<f64>>) {
        if let Some(ticks) = x_ticks {
            self.x_ticks = Some(ticks);
        }
        if let Some(ticks) = y_ticks {
            self.y_ticks = Some(ticks);
        }
    }

    pub fn set_ylim(&mut self) {
        self.y_range = Y_LIMITS;
    }

    pub fn set_title(&mut self, title: &str, fontsize: f64) {
        self.title = title.to_string();
        self.title_fontsize = fontsize;
    }

    pub fn set_labels(&mut self, x_label: &str, y_label: &str, fontsize: f64) {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self.label_fontsize = fontsize;
    }

    /// Fit the x range to the plotted points and any explicit x ticks,
    /// with 5% padding on each side.
    pub fn autoscale_x(&mut self, lines: &[SeriesLine]) {
        let tick_values = self.x_ticks.iter().flatten().copied();
        let values = lines
            .iter()
            .flat_map(|l| l.points.iter().map(|p| p.0))
            .chain(tick_values)
            .filter(|v| v.is_finite());

        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        self.x_range = if min > max { (0.0, 1.0) } else { pad_range(min, max) };
    }
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

const MAX_TICKS: usize = 1000;

/// Default tick positions: about `count` round numbers covering `range`.
pub fn auto_ticks(range: (f64, f64), count: usize) -> Vec<f64> {
    let (lo, hi) = range;
    let span = hi - lo;
    if !(span > 0.0) || count == 0 {
        return Vec::new();
    }

    let raw = span / count as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil();
    let last = (hi / step + 1e-9).floor();
    if !first.is_finite() || !last.is_finite() || last < first || last - first > MAX_TICKS as f64 {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (0..=(last - first) as usize)
        .map(|k| (first + k as f64) * step)
        .collect();
    // neighbours collapse when step is below the float spacing at lo
    ticks.dedup();
    ticks
}

/// Tick label text with trailing zeros trimmed.
pub fn format_tick(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
