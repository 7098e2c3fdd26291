//! `plotters` backend: streamlines coloured by magnitude, with a colourbar.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use super::colormap::is_degenerate;
use super::{interpolate, RenderError, Renderer, StreamPlot, StreamlineTracer};
use crate::math::Scalar;

const MARGIN: u32 = 10;
const CAPTION_HEIGHT: u32 = 32;
const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 50;
const COLORBAR_WIDTH: u32 = 110;
const COLORBAR_STEPS: usize = 64;

/// Image encoding of a rendered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Scalable vector graphics.
    Svg,
    /// Portable network graphics.
    Png,
}

impl OutputFormat {
    /// Picks the format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Renders stream plots to an image file.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    path: PathBuf,
    format: OutputFormat,
}

impl PlottersRenderer {
    /// Renderer writing to `path`; the extension selects SVG or PNG.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let path = path.into();
        let format = OutputFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Destination file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoding used for the destination file.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Renderer for PlottersRenderer {
    fn stream_plot(&mut self, plot: &StreamPlot<'_>) -> Result<(), RenderError> {
        let size = (plot.style().width, plot.style().height);
        match self.format {
            OutputFormat::Svg => draw(SVGBackend::new(&self.path, size).into_drawing_area(), plot)?,
            OutputFormat::Png => draw(BitMapBackend::new(&self.path, size).into_drawing_area(), plot)?,
        }
        info!(path = %self.path.display(), format = ?self.format, "figure written");
        Ok(())
    }
}

/// Renders `plot` to an in-memory SVG document.
pub fn render_svg_string(plot: &StreamPlot<'_>) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let size = (plot.style().width, plot.style().height);
        draw(SVGBackend::with_string(&mut svg, size).into_drawing_area(), plot)?;
    }
    Ok(svg)
}

fn backend_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Backend(err.to_string())
}

// Widens one axis so a data unit spans the same number of pixels on both.
fn equal_aspect_ranges(area: (u32, u32), half_width: Scalar) -> (Scalar, Scalar) {
    let plot_w = area.0.saturating_sub(Y_LABEL_AREA + 2 * MARGIN).max(1) as Scalar;
    let plot_h = area.1.saturating_sub(X_LABEL_AREA + CAPTION_HEIGHT + 2 * MARGIN).max(1) as Scalar;
    if plot_w >= plot_h {
        (half_width * plot_w / plot_h, half_width)
    } else {
        (half_width, half_width * plot_h / plot_w)
    }
}

// Widens a degenerate colour range so the colourbar axis stays drawable.
fn colorbar_range(range: Option<(Scalar, Scalar)>) -> (Scalar, Scalar) {
    match range {
        Some((lo, hi)) if !is_degenerate(lo, hi) => (lo, hi),
        Some((lo, _)) if lo.abs() > 0.0 => (lo - 0.5 * lo.abs(), lo + 0.5 * lo.abs()),
        Some((lo, _)) => (lo, lo + 1.0),
        None => (0.0, 1.0),
    }
}

fn draw<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, plot: &StreamPlot<'_>) -> Result<(), RenderError> {
    let style = plot.style();
    let grid = plot.grid();
    root.fill(&WHITE).map_err(backend_err)?;

    let (width, _) = root.dim_in_pixel();
    let bar_width = COLORBAR_WIDTH.min(width / 4);
    let (main, bar) = root.split_horizontally(width - bar_width);

    let half = grid.gridsize();
    let (hx, hy) = if style.equal_axes { equal_aspect_ranges(main.dim_in_pixel(), half) } else { (half, half) };
    let mut chart = ChartBuilder::on(&main)
        .caption(&style.title, ("sans-serif", 22).into_font())
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(-hx..hx, -hy..hy)
        .map_err(backend_err)?;
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&style.x_label).y_desc(&style.y_label);
    if !style.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(backend_err)?;

    let (lo, hi) = colorbar_range(plot.color_range());
    let stroke = style.line_width.round().max(1.0) as u32;
    let lines = StreamlineTracer::new(style.density).trace(grid, plot.field());
    debug!(lines = lines.len(), density = style.density, "streamlines traced");
    for line in &lines {
        let colors: Vec<Scalar> = line
            .points
            .iter()
            .map(|&p| interpolate(grid, plot.color(), p).unwrap_or(lo))
            .collect();
        let segments = line.points.windows(2).zip(colors.windows(2)).map(|(p, c)| {
            let (r, g, b) = style.colormap.map(0.5 * (c[0] + c[1]), lo, hi);
            PathElement::new(vec![(p[0].x, p[0].y), (p[1].x, p[1].y)], RGBColor(r, g, b).stroke_width(stroke))
        });
        chart.draw_series(segments).map_err(backend_err)?;
    }

    let mut colorbar = ChartBuilder::on(&bar)
        .margin(MARGIN)
        .margin_top(CAPTION_HEIGHT + MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .right_y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(0.0..1.0, lo..hi)
        .map_err(backend_err)?;
    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(&style.colorbar_label)
        .draw()
        .map_err(backend_err)?;
    let band = (hi - lo) / COLORBAR_STEPS as Scalar;
    colorbar
        .draw_series((0..COLORBAR_STEPS).map(|k| {
            let y0 = lo + band * k as Scalar;
            let (r, g, b) = style.colormap.rgb((k as Scalar + 0.5) / COLORBAR_STEPS as Scalar);
            Rectangle::new([(0.0, y0), (1.0, y0 + band)], RGBColor(r, g, b).filled())
        }))
        .map_err(backend_err)?;

    root.present().map_err(backend_err)
}
