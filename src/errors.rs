//! Shared error types used across submodules.

use thiserror::Error;

#[cfg(feature = "serde")]
use crate::config::ConfigError;
use crate::fields::ChargeParseError;
use crate::grid::GridError;
use crate::render::RenderError;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum FieldLinesError {
    /// Wraps invalid sampling parameters.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Wraps malformed charge triples.
    #[error(transparent)]
    Charge(#[from] ChargeParseError),
    /// Wraps renderer hand-off and drawing failures.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Wraps scene file loading failures.
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Config(#[from] ConfigError),
}
