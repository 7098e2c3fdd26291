//! Uniform square sampling lattice.

use thiserror::Error;
use tracing::debug;

use crate::math::{linspace, meshgrid, Field2, Scalar, R2};

/// Errors raised when the sampling lattice parameters are unusable.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridError {
    /// The half-width must be a positive finite number.
    #[error("grid half-width must be positive and finite, got {0}")]
    NonPositiveSize(Scalar),
    /// At least two samples per axis are needed to span the region.
    #[error("grid needs at least 2 subdivisions per axis, got {0}")]
    TooFewSubdivisions(usize),
}

/// Coordinate matrices `(X, Y)` sampling the square `[-gridsize, gridsize]²`.
///
/// Entry `(i, j)` is the point `(axis[j], axis[i])`: columns walk X, rows walk Y.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    gridsize: Scalar,
    axis: Vec<Scalar>,
    x: Field2,
    y: Field2,
}

/// Builds the `subdivisions × subdivisions` lattice over `[-gridsize, gridsize]²`.
///
/// Both axes share the same inclusive linear spacing.
pub fn generate_grid(gridsize: Scalar, subdivisions: usize) -> Result<CoordinateGrid, GridError> {
    if !(gridsize.is_finite() && gridsize > 0.0) {
        return Err(GridError::NonPositiveSize(gridsize));
    }
    if subdivisions < 2 {
        return Err(GridError::TooFewSubdivisions(subdivisions));
    }
    let axis = linspace(-gridsize, gridsize, subdivisions);
    let (x, y) = meshgrid(&axis, &axis);
    debug!(gridsize, subdivisions, "coordinate grid generated");
    Ok(CoordinateGrid { gridsize, axis, x, y })
}

impl CoordinateGrid {
    /// X coordinate of every sample.
    #[must_use]
    pub const fn x(&self) -> &Field2 {
        &self.x
    }

    /// Y coordinate of every sample.
    #[must_use]
    pub const fn y(&self) -> &Field2 {
        &self.y
    }

    /// Sample positions along either axis, ascending.
    #[must_use]
    pub fn axis(&self) -> &[Scalar] {
        &self.axis
    }

    /// Half-width of the sampled square.
    #[must_use]
    pub const fn gridsize(&self) -> Scalar {
        self.gridsize
    }

    /// Samples per axis.
    #[must_use]
    pub fn subdivisions(&self) -> usize {
        self.axis.len()
    }

    /// `(rows, columns)` of both coordinate matrices.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    /// Distance between neighbouring samples.
    #[must_use]
    pub fn spacing(&self) -> Scalar {
        2.0 * self.gridsize / (self.subdivisions() as Scalar - 1.0)
    }

    /// Cartesian position of sample `(i, j)`.
    #[must_use]
    pub fn point(&self, i: usize, j: usize) -> R2 {
        R2::new(self.x[(i, j)], self.y[(i, j)])
    }

    /// Iterates `((i, j), position)` over every sample, row by row.
    pub fn points(&self) -> impl Iterator<Item = ((usize, usize), R2)> + '_ {
        let (rows, cols) = self.shape();
        (0..rows).flat_map(move |i| (0..cols).map(move |j| ((i, j), self.point(i, j))))
    }
}
