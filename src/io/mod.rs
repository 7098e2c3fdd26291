//! I/O helpers for exporting sampled fields.

pub mod csv;
pub mod vtk;

pub use self::csv::*;
pub use self::vtk::*;
