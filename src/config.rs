//! TOML scene files.
//!
//! Top-level keys describe the [`Scene`]; an optional `[plot]` table overrides the
//! [`PlotStyle`]. Missing keys keep their defaults:
//!
//! ```toml
//! gridsize = 5.0
//! subdivisions = 200
//! k = 1.0
//! charges = [[-1.0, 0.0, 1.0], [1.0, 0.0, -1.0]]
//!
//! [plot]
//! colormap = "coolwarm"
//! density = 7.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::pipeline::Scene;
use crate::render::PlotStyle;

/// Errors that can occur while loading a scene file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The contents are not a valid scene description.
    #[error("invalid scene file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Contents of a scene file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLinesConfig {
    /// Charges and sampling parameters.
    #[serde(flatten)]
    pub scene: Scene,
    /// Figure appearance.
    pub plot: PlotStyle,
}

impl FieldLinesConfig {
    /// Parses a scene description.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the scene file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), charges = config.scene.charges.len(), "scene file loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{PointCharge, SingularityPolicy};
    use crate::render::Colormap;

    #[test]
    fn parses_full_scene() {
        let config = FieldLinesConfig::from_toml_str(
            r#"
            gridsize = 2.5
            subdivisions = 64
            k = 1.0
            singularity = "skip"
            charges = [[0.0, 0.0, 1.0], [1.0, -1.0, -2.0]]

            [plot]
            colormap = "viridis"
            density = 3.0
            title = "Quadrupole"
            "#,
        )
        .expect("valid scene");
        assert_eq!(config.scene.gridsize, 2.5);
        assert_eq!(config.scene.subdivisions, 64);
        assert_eq!(config.scene.k, 1.0);
        assert_eq!(config.scene.singularity, SingularityPolicy::Skip);
        assert_eq!(config.scene.charges[1], PointCharge::new(1.0, -1.0, -2.0));
        assert_eq!(config.plot.colormap, Colormap::Viridis);
        assert_eq!(config.plot.density, 3.0);
        assert_eq!(config.plot.title, "Quadrupole");
        assert_eq!(config.plot.line_width, PlotStyle::default().line_width);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = FieldLinesConfig::from_toml_str("").expect("empty scene");
        assert_eq!(config, FieldLinesConfig::default());
    }

    #[test]
    fn rejects_malformed_charge_triple() {
        let err = FieldLinesConfig::from_toml_str("charges = [[1.0, 2.0]]").expect_err("bad arity");
        assert!(err.to_string().contains("expected 3 values"));
        assert!(FieldLinesConfig::from_toml_str("charges = [[1.0, \"a\", 2.0]]").is_err());
    }

    #[test]
    fn rejects_unknown_colormap() {
        assert!(FieldLinesConfig::from_toml_str("[plot]\ncolormap = \"jet\"").is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = FieldLinesConfig::default();
        let text = toml::to_string(&config).expect("serializable");
        assert_eq!(FieldLinesConfig::from_toml_str(&text).expect("parses back"), config);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = FieldLinesConfig::load(dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
