#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants.
pub mod constants;
/// Shared numerical aliases and array helpers.
pub mod math;
/// Uniform sampling lattice.
pub mod grid;
/// Electrostatic field superposition.
pub mod fields;
/// Renderer contract, streamline tracing, and the plotters backend.
pub mod render;
/// CSV and VTK export.
pub mod io;
/// Scene description and the grid, field, render pipeline.
pub mod pipeline;
/// TOML scene files.
#[cfg(feature = "serde")]
pub mod config;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
