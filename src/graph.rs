use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::axes::{auto_ticks, format_tick};
use crate::ir::CategoryPlot;
use crate::legend::LegendLoc;
use crate::{points_to_pixels, OutputFormat};

const FONT: &str = "sans-serif";
const TICK_FONTSIZE: f64 = 10.0;
const TICK_LENGTH: i32 = 4;
const LEGEND_SWATCH: i32 = 20;

/// An encoded figure, as handed to a display sink.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFigure {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Pixel canvas that draws a [`CategoryPlot`] with plotters.
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Cannot create a {}x{} canvas", width, height);
        }
        Ok(Canvas { width, height })
    }

    pub fn render(&self, plot: &CategoryPlot, format: OutputFormat) -> Result<RenderedFigure> {
        let bytes = match format {
            OutputFormat::Png => self.render_png(plot)?,
            OutputFormat::Svg => self.render_svg(plot)?,
        };
        Ok(RenderedFigure {
            format,
            width: self.width,
            height: self.height,
            bytes,
        })
    }

    /// Draw into an RGB buffer and encode it as PNG
    pub fn render_png(&self, plot: &CategoryPlot) -> Result<Vec<u8>> {
        let len = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| anyhow::anyhow!("Canvas {}x{} is too large", self.width, self.height))?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            draw_plot(&root, plot)?;
            root.present().context("Failed to present drawing")?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    pub fn render_svg(&self, plot: &CategoryPlot) -> Result<Vec<u8>> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            draw_plot(&root, plot)?;
            root.present().context("Failed to present drawing")?;
        }
        Ok(svg.into_bytes())
    }
}

fn draw_plot<DB>(root: &DrawingArea<DB, Shift>, plot: &CategoryPlot) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let px = |pt: f64| points_to_pixels(pt, plot.dpi);
    let axes = &plot.axes;
    let (x0, x1) = axes.x_range;
    let (y0, y1) = axes.y_range;

    let title_px = px(axes.title_fontsize);
    let label_px = px(axes.label_fontsize);
    let tick_px = px(TICK_FONTSIZE);
    let legend_px = px(plot.legend.fontsize);
    let stroke = px(plot.line_width).round().max(1.0) as u32;

    root.fill(&WHITE).context("Failed to fill background")?;

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(10)
        .x_label_area_size((tick_px + label_px * 1.5) as u32 + 10)
        .y_label_area_size((tick_px * 3.0 + label_px * 1.5) as u32 + 10);
    if !axes.title.is_empty() {
        builder.caption(axes.title.as_str(), (FONT, title_px));
    }
    let mut chart = builder
        .build_cartesian_2d(x0..x1, y0..y1)
        .context("Failed to build chart")?;

    // Ticks are drawn by hand so explicit positions are honored exactly.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(0)
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .axis_desc_style((FONT, label_px).into_font())
        .draw()
        .context("Failed to draw mesh")?;

    let x_ticks: Vec<f64> = axes
        .x_ticks
        .clone()
        .unwrap_or_else(|| auto_ticks(axes.x_range, 10))
        .into_iter()
        .filter(|t| *t >= x0 && *t <= x1)
        .collect();
    let y_ticks: Vec<f64> = axes
        .y_ticks
        .clone()
        .unwrap_or_else(|| auto_ticks(axes.y_range, 6))
        .into_iter()
        .filter(|t| *t >= y0 && *t <= y1)
        .collect();

    let grid = BLACK.mix(0.1).stroke_width(1);
    chart
        .draw_series(
            x_ticks
                .iter()
                .map(|&t| PathElement::new(vec![(t, y0), (t, y1)], grid))
                .chain(
                    y_ticks
                        .iter()
                        .map(|&t| PathElement::new(vec![(x0, t), (x1, t)], grid)),
                ),
        )
        .context("Failed to draw grid")?;

    for line in &plot.lines {
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                line.color.stroke_width(stroke),
            ))
            .with_context(|| format!("Failed to draw line for group '{}'", line.group))?;
    }

    chart
        .plotting_area()
        .draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))
        .context("Failed to draw axes frame")?;

    let tick_font = (FONT, tick_px).into_font();
    let x_tick_style = TextStyle::from(tick_font.clone()).pos(Pos::new(HPos::Center, VPos::Top));
    let y_tick_style = TextStyle::from(tick_font).pos(Pos::new(HPos::Right, VPos::Center));
    let tick_mark = BLACK.stroke_width(1);

    for &t in &x_ticks {
        let (x, y) = chart.backend_coord(&(t, y0));
        root.draw(&PathElement::new(vec![(x, y), (x, y + TICK_LENGTH)], tick_mark))
            .context("Failed to draw x tick")?;
        root.draw(&Text::new(format_tick(t), (x, y + TICK_LENGTH + 2), x_tick_style.clone()))
            .context("Failed to draw x tick label")?;
    }
    for &t in &y_ticks {
        let (x, y) = chart.backend_coord(&(x0, t));
        root.draw(&PathElement::new(vec![(x - TICK_LENGTH, y), (x, y)], tick_mark))
            .context("Failed to draw y tick")?;
        root.draw(&Text::new(format_tick(t), (x - TICK_LENGTH - 2, y), y_tick_style.clone()))
            .context("Failed to draw y tick label")?;
    }

    if plot.legend.handles.is_empty() {
        return Ok(());
    }

    // Handles carry no points; they only register a legend swatch.
    for handle in &plot.legend.handles {
        let style = handle.color.stroke_width(stroke);
        chart
            .draw_series(LineSeries::new(handle.points.iter().copied(), style))
            .context("Failed to register legend entry")?
            .label(handle.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + LEGEND_SWATCH, y)], style));
    }

    chart
        .configure_series_labels()
        .position(series_label_position(plot.legend.loc))
        .label_font((FONT, legend_px).into_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .draw()
        .context("Failed to draw legend")?;

    Ok(())
}

fn series_label_position(loc: LegendLoc) -> SeriesLabelPosition {
    match loc {
        LegendLoc::Best | LegendLoc::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLoc::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLoc::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLoc::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLoc::Right | LegendLoc::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLoc::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLoc::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendLoc::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLoc::Center => SeriesLabelPosition::MiddleMiddle,
    }
}
