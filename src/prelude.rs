//! Convenience re-exports for building field-line experiments.

#[cfg(feature = "serde")]
pub use crate::config::{ConfigError, FieldLinesConfig};
pub use crate::constants::*;
pub use crate::errors::FieldLinesError;
pub use crate::fields::{
    ChargeParseError,
    FieldComponents,
    PointCharge,
    SingularityPolicy,
    electric_field_at,
    generate_field,
    generate_field_with,
};
pub use crate::grid::{generate_grid, CoordinateGrid, GridError};
pub use crate::io::{write_field_csv, write_field_vtk};
pub use crate::math::{linspace, meshgrid, Field2, Scalar, R2};
pub use crate::pipeline::{run, solve, FieldSolution, Scene};
#[cfg(feature = "plot")]
pub use crate::render::{OutputFormat, PlottersRenderer};
pub use crate::render::{Colormap, PlotStyle, RenderError, Renderer, StreamPlot, StreamlineTracer};
