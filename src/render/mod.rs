//! Hand-off of grid and field data to a streamline renderer.

mod colormap;
mod streamline;

#[cfg(feature = "plot")]
mod chart;

pub use colormap::Colormap;
pub use streamline::{Streamline, StreamlineTracer, interpolate};

#[cfg(feature = "plot")]
pub use chart::{OutputFormat, PlottersRenderer, render_svg_string};

use thiserror::Error;

use crate::fields::FieldComponents;
use crate::grid::CoordinateGrid;
use crate::math::{Field2, Scalar};

/// Errors raised while handing data to, or drawing with, a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Coordinate, component and colour arrays must share one shape.
    #[error("{name} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Which array disagrees.
        name: &'static str,
        /// Shape of the coordinate grid.
        expected: (usize, usize),
        /// Shape of the offending array.
        found: (usize, usize),
    },
    /// The colour-scale name is not known.
    #[error("unknown colormap `{0}`")]
    UnknownColormap(String),
    /// The output path has no recognised image extension.
    #[error("unsupported output format `{0}` (expected svg or png)")]
    UnsupportedFormat(String),
    /// Failure reported by the drawing backend.
    #[error("drawing backend error: {0}")]
    Backend(String),
}

/// Appearance of the streamline figure.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    /// Figure caption.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Colourbar label.
    pub colorbar_label: String,
    /// Colour scale for the magnitude.
    pub colormap: Colormap,
    /// Stroke width of streamlines in pixels.
    pub line_width: Scalar,
    /// Streamline density.
    pub density: Scalar,
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Draw grid lines.
    pub show_grid: bool,
    /// Use the same scale on both axes.
    pub equal_axes: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            title: "Electric Field for Multiple Charges".to_owned(),
            x_label: "X".to_owned(),
            y_label: "Y".to_owned(),
            colorbar_label: "|E|".to_owned(),
            colormap: Colormap::Coolwarm,
            line_width: 1.0,
            density: 7.0,
            width: 800,
            height: 600,
            show_grid: true,
            equal_axes: true,
        }
    }
}

/// One streamline figure request: coordinates, components and colour values of equal shape.
#[derive(Debug, Clone, Copy)]
pub struct StreamPlot<'a> {
    grid: &'a CoordinateGrid,
    field: &'a FieldComponents,
    color: &'a Field2,
    style: &'a PlotStyle,
}

impl<'a> StreamPlot<'a> {
    /// Bundles a request, checking that every array matches the grid shape.
    pub fn new(
        grid: &'a CoordinateGrid,
        field: &'a FieldComponents,
        color: &'a Field2,
        style: &'a PlotStyle,
    ) -> Result<Self, RenderError> {
        let expected = grid.shape();
        for (name, found) in [("Ex", field.ex.shape()), ("Ey", field.ey.shape()), ("color", color.shape())] {
            if found != expected {
                return Err(RenderError::ShapeMismatch { name, expected, found });
            }
        }
        Ok(Self { grid, field, color, style })
    }

    /// Sample coordinates.
    #[must_use]
    pub const fn grid(&self) -> &'a CoordinateGrid {
        self.grid
    }

    /// Field components.
    #[must_use]
    pub const fn field(&self) -> &'a FieldComponents {
        self.field
    }

    /// Values mapped through the colour scale.
    #[must_use]
    pub const fn color(&self) -> &'a Field2 {
        self.color
    }

    /// Figure appearance.
    #[must_use]
    pub const fn style(&self) -> &'a PlotStyle {
        self.style
    }

    /// Smallest and largest finite colour value, `None` if there is none.
    #[must_use]
    pub fn color_range(&self) -> Option<(Scalar, Scalar)> {
        self.color.iter().copied().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Draws a streamline figure and blocks until it has been shown or written.
pub trait Renderer {
    /// Renders `plot`.
    fn stream_plot(&mut self, plot: &StreamPlot<'_>) -> Result<(), RenderError>;
}
