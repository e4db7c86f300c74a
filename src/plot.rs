use anyhow::{bail, Context, Result};
use log::debug;

use crate::axes::AxesConfig;
use crate::data::Table;
use crate::display::Show;
use crate::graph::Canvas;
use crate::ir::{CategoryPlot, Legend};
use crate::legend::{build_legend_handles, LabelFn};
use crate::palette::{category_colors, ColorPalette};
use crate::series::{build_series, ResolvedColumns};
use crate::PlotOptions;

/// Plot `y_col` against `x_col`, one line per group, colored by category,
/// and hand the rendered figure to `display`.
pub fn plot_cats(
    table: &Table,
    x_col: &str,
    y_col: &str,
    options: &PlotOptions,
    display: &mut dyn Show,
) -> Result<()> {
    let plot = build_plot(table, x_col, y_col, options)?;

    let figure = Canvas::new(plot.width, plot.height)?
        .render(&plot, options.format)
        .context("Failed to render plot")?;

    display.show(&figure).context("Failed to display plot")
}

/// Resolve everything `plot_cats` draws without touching a backend.
pub fn build_plot(table: &Table, x_col: &str, y_col: &str, options: &PlotOptions) -> Result<CategoryPlot> {
    let (width, height) = options.pixel_size();
    if width == 0 || height == 0 {
        bail!(
            "Figure size {:?} at {} dpi is empty",
            options.figsize,
            options.dpi
        );
    }

    let label_fn = options
        .label_fn
        .clone()
        .unwrap_or_else(|| LabelFn::default_for(&options.cat_col));

    let columns = ResolvedColumns::resolve(table, x_col, y_col, &options.cat_col, &options.grp_col)?;

    let categories = table.distinct_values(&options.cat_col)?;
    let palette = ColorPalette::named(&options.palette)?;
    let colors = category_colors(&palette, &categories)?;
    debug!(
        "Assigned {} categories from palette '{}' ({} colors)",
        colors.len(),
        options.palette,
        palette.len()
    );

    let lines = build_series(table, &columns, &colors)?;

    let handles = build_legend_handles(&colors, &label_fn);

    let mut axes = AxesConfig::default();
    axes.set_ticks(options.x_ticks.clone(), options.y_ticks.clone());
    axes.set_ylim();
    axes.set_title(&options.title, options.title_fontsize);
    axes.set_labels(&options.x_label, &options.y_label, options.label_fontsize);
    axes.autoscale_x(&lines);

    let loc = options.legend_loc.unwrap_or_default().resolve(
        lines.iter().flat_map(|l| l.points.iter()),
        axes.x_range,
        axes.y_range,
    );
    debug!("Legend with {} entries placed at {:?}", handles.len(), loc);

    Ok(CategoryPlot {
        width,
        height,
        dpi: options.dpi,
        colors,
        lines,
        legend: Legend {
            handles,
            loc,
            fontsize: options.legend_fontsize,
        },
        axes,
        line_width: options.line_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Collect;
    use crate::legend::LegendLoc;
    use crate::OutputFormat;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn model_table() -> Table {
        make_table(
            vec!["model_group_id", "model_type", "k", "precision"],
            vec![
                vec!["1", "sklearn.ensemble.RandomForestClassifier", "0", "0.2"],
                vec!["1", "sklearn.ensemble.RandomForestClassifier", "1", "0.4"],
                vec!["2", "sklearn.linear_model.LogisticRegression", "0", "0.6"],
                vec!["2", "sklearn.linear_model.LogisticRegression", "1", "0.8"],
                vec!["3", "sklearn.ensemble.RandomForestClassifier", "0", "0.3"],
                vec!["3", "sklearn.ensemble.RandomForestClassifier", "1", "0.5"],
            ],
        )
    }

    #[test]
    fn test_build_plot_defaults() {
        let plot = build_plot(&model_table(), "k", "precision", &PlotOptions::default()).unwrap();

        assert_eq!((plot.width, plot.height), (1200, 600));
        assert_eq!(plot.lines.len(), 3);
        assert_eq!(plot.colors.len(), 2);
        assert_eq!(plot.legend.handles.len(), 2);

        let labels: Vec<&str> = plot.legend.handles.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["RandomForestClassifier", "LogisticRegression"]);
        assert_eq!(plot.axes.y_range, (0.0, 1.1));
        assert_ne!(plot.legend.loc, LegendLoc::Best);
    }

    #[test]
    fn test_build_plot_custom_label_fn() {
        let options = PlotOptions {
            label_fn: Some(LabelFn::new(|s| s.to_uppercase())),
            ..PlotOptions::default()
        };
        let plot = build_plot(&model_table(), "k", "precision", &options).unwrap();
        assert_eq!(
            plot.legend.handles[1].label,
            "SKLEARN.LINEAR_MODEL.LOGISTICREGRESSION"
        );
    }

    #[test]
    fn test_build_plot_identity_labels_for_other_column() {
        let table = make_table(
            vec!["run", "kind", "x", "y"],
            vec![vec!["1", "a.b", "0", "0.1"], vec!["2", "c.d", "0", "0.2"]],
        );
        let options = PlotOptions {
            cat_col: "kind".to_string(),
            grp_col: "run".to_string(),
            ..PlotOptions::default()
        };
        let plot = build_plot(&table, "x", "y", &options).unwrap();
        let labels: Vec<&str> = plot.legend.handles.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["a.b", "c.d"]);
    }

    #[test]
    fn test_legend_count_ignores_group_count() {
        let plot = build_plot(&model_table(), "k", "precision", &PlotOptions::default()).unwrap();
        assert_eq!(plot.lines.len(), 3);
        assert_eq!(plot.legend.handles.len(), plot.colors.len());
    }

    #[test]
    fn test_build_plot_explicit_options() {
        let options = PlotOptions {
            title: "Precision at k".to_string(),
            x_label: "k".to_string(),
            y_label: "precision".to_string(),
            x_ticks: Some(vec![0.0, 1.0]),
            legend_loc: Some(LegendLoc::LowerRight),
            palette: "Set1".to_string(),
            ..PlotOptions::default()
        };
        let plot = build_plot(&model_table(), "k", "precision", &options).unwrap();
        assert_eq!(plot.axes.title, "Precision at k");
        assert_eq!(plot.axes.x_ticks, Some(vec![0.0, 1.0]));
        assert_eq!(plot.axes.y_ticks, None);
        assert_eq!(plot.legend.loc, LegendLoc::LowerRight);

        let set1 = ColorPalette::named("Set1").unwrap();
        assert_eq!(plot.lines[0].color, set1.colors()[0]);
        assert_eq!(plot.lines[1].color, set1.colors()[1]);
    }

    #[test]
    fn test_build_plot_missing_column() {
        let err = build_plot(&model_table(), "k", "recall", &PlotOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Column 'recall' not found"));
    }

    #[test]
    fn test_build_plot_unknown_palette() {
        let options = PlotOptions {
            palette: "Rainbow".to_string(),
            ..PlotOptions::default()
        };
        assert!(build_plot(&model_table(), "k", "precision", &options).is_err());
    }

    #[test]
    fn test_build_plot_empty_figure() {
        let options = PlotOptions {
            figsize: [0.0, 6.0],
            ..PlotOptions::default()
        };
        assert!(build_plot(&model_table(), "k", "precision", &options).is_err());
    }

    #[test]
    fn test_build_plot_zero_rows() {
        let table = make_table(vec!["model_group_id", "model_type", "k", "precision"], vec![]);
        let plot = build_plot(&table, "k", "precision", &PlotOptions::default()).unwrap();
        assert!(plot.colors.is_empty());
        assert!(plot.lines.is_empty());
        assert!(plot.legend.handles.is_empty());
        assert_eq!(plot.axes.y_range, (0.0, 1.1));
    }

    #[test]
    fn test_plot_cats_renders_svg() {
        let options = PlotOptions {
            format: OutputFormat::Svg,
            figsize: [6.0, 4.0],
            ..PlotOptions::default()
        };
        let mut display = Collect::default();
        plot_cats(&model_table(), "k", "precision", &options, &mut display).unwrap();

        assert_eq!(display.figures.len(), 1);
        let figure = &display.figures[0];
        assert_eq!(figure.format, OutputFormat::Svg);
        assert_eq!((figure.width, figure.height), (600, 400));
        let svg = String::from_utf8(figure.bytes.clone()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("RandomForestClassifier"));
    }
}
