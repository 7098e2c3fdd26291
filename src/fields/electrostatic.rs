use std::num::ParseFloatError;
use std::str::FromStr;

use nalgebra::DMatrix;
use thiserror::Error;
use tracing::debug;

use crate::grid::CoordinateGrid;
use crate::math::{Field2, Scalar, R2};

/// Point charge in the plane, the triple `(x0, y0, q)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Scalar>", into = "[Scalar; 3]"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCharge {
    /// Position of the charge.
    pub position: R2,
    /// Signed charge magnitude.
    pub charge: Scalar,
}

impl PointCharge {
    /// Creates a charge `q` located at `(x0, y0)`.
    #[must_use]
    pub fn new(x0: Scalar, y0: Scalar, q: Scalar) -> Self {
        Self { position: R2::new(x0, y0), charge: q }
    }

    /// Copy of this charge with its magnitude multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: Scalar) -> Self {
        Self { charge: self.charge * factor, ..self }
    }
}

impl From<(Scalar, Scalar, Scalar)> for PointCharge {
    fn from((x0, y0, q): (Scalar, Scalar, Scalar)) -> Self {
        Self::new(x0, y0, q)
    }
}

impl From<PointCharge> for [Scalar; 3] {
    fn from(c: PointCharge) -> Self {
        [c.position.x, c.position.y, c.charge]
    }
}

/// Raised when a charge triple has the wrong arity or a non-numeric entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChargeParseError {
    /// A charge needs exactly `x0`, `y0` and `q`.
    #[error("a charge is (x0, y0, q): expected 3 values, found {0}")]
    Arity(usize),
    /// One of the entries is not a number.
    #[error("charge field `{field}` is not a number: {source}")]
    Number {
        /// Name of the offending entry.
        field: &'static str,
        /// Underlying float parse failure.
        source: ParseFloatError,
    },
}

const FIELD_NAMES: [&str; 3] = ["x0", "y0", "q"];

impl TryFrom<Vec<Scalar>> for PointCharge {
    type Error = ChargeParseError;

    fn try_from(values: Vec<Scalar>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            &[x0, y0, q] => Ok(Self::new(x0, y0, q)),
            other => Err(ChargeParseError::Arity(other.len())),
        }
    }
}

impl FromStr for PointCharge {
    type Err = ChargeParseError;

    /// Parses `"x0,y0,q"`; whitespace around entries is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ChargeParseError::Arity(parts.len()));
        }
        let mut values = [0.0; 3];
        for ((slot, part), field) in values.iter_mut().zip(&parts).zip(FIELD_NAMES) {
            *slot = part
                .parse::<Scalar>()
                .map_err(|source| ChargeParseError::Number { field, source })?;
        }
        let [x0, y0, q] = values;
        Ok(Self::new(x0, y0, q))
    }
}

/// How a charge contributes at a sample that coincides with its own position.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingularityPolicy {
    /// Evaluate `kq·d/r³` as is; a zero distance yields NaN/∞ at that sample only.
    #[default]
    Propagate,
    /// A charge adds nothing at a sample located exactly on it.
    Skip,
}

/// Net field vectors `(Ex, Ey)` sampled on a [`CoordinateGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldComponents {
    /// X component at every sample.
    pub ex: Field2,
    /// Y component at every sample.
    pub ey: Field2,
}

impl FieldComponents {
    /// All-zero field of the given shape.
    #[must_use]
    pub fn zeros((rows, cols): (usize, usize)) -> Self {
        Self { ex: DMatrix::zeros(rows, cols), ey: DMatrix::zeros(rows, cols) }
    }

    /// `(rows, columns)` of both component matrices.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.ex.shape()
    }

    /// Field vector at sample `(i, j)`.
    #[must_use]
    pub fn at(&self, i: usize, j: usize) -> R2 {
        R2::new(self.ex[(i, j)], self.ey[(i, j)])
    }

    /// Elementwise `sqrt(Ex² + Ey²)`.
    #[must_use]
    pub fn magnitude(&self) -> Field2 {
        self.ex.zip_map(&self.ey, |x, y| x.hypot(y))
    }

    /// Samples where either component is NaN or infinite, in row order.
    #[must_use]
    pub fn non_finite_points(&self) -> Vec<(usize, usize)> {
        let (rows, cols) = self.shape();
        (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .filter(|&(i, j)| !(self.ex[(i, j)].is_finite() && self.ey[(i, j)].is_finite()))
            .collect()
    }

    /// Smallest and largest finite magnitude, `None` when no sample is finite.
    #[must_use]
    pub fn finite_magnitude_range(&self) -> Option<(Scalar, Scalar)> {
        self.magnitude()
            .iter()
            .copied()
            .filter(|m| m.is_finite())
            .fold(None, |acc, m| match acc {
                None => Some((m, m)),
                Some((lo, hi)) => Some((lo.min(m), hi.max(m))),
            })
    }
}

#[inline]
fn contribution(d: R2, kq: Scalar, policy: SingularityPolicy) -> R2 {
    let r = d.x.hypot(d.y);
    if r == 0.0 && policy == SingularityPolicy::Skip {
        return R2::zeros();
    }
    let r3 = r * r * r;
    R2::new(kq * d.x / r3, kq * d.y / r3)
}

/// Net field at every sample of `grid` by superposing `k·q·(P − P₀)/r³` over `charges`.
///
/// Zero distance is not special-cased: the sample that sits on a charge comes out
/// non-finite and every other sample is unaffected. Use [`generate_field_with`] to
/// choose [`SingularityPolicy::Skip`] instead.
#[must_use]
pub fn generate_field(charges: &[PointCharge], grid: &CoordinateGrid, k: Scalar) -> FieldComponents {
    generate_field_with(charges, grid, k, SingularityPolicy::Propagate)
}

/// [`generate_field`] with an explicit treatment of samples that coincide with a charge.
#[must_use]
pub fn generate_field_with(
    charges: &[PointCharge],
    grid: &CoordinateGrid,
    k: Scalar,
    policy: SingularityPolicy,
) -> FieldComponents {
    let mut field = FieldComponents::zeros(grid.shape());
    for c in charges {
        let kq = k * c.charge;
        let samples = grid.x().iter().zip(grid.y().iter());
        for ((ex, ey), (&x, &y)) in field.ex.iter_mut().zip(field.ey.iter_mut()).zip(samples) {
            let e = contribution(R2::new(x, y) - c.position, kq, policy);
            *ex += e.x;
            *ey += e.y;
        }
    }
    debug!(charges = charges.len(), shape = ?grid.shape(), ?policy, "field superposed");
    field
}

/// Field at an arbitrary `point` due to `charges`, with the same zero-distance rule as
/// [`generate_field`].
#[must_use]
pub fn electric_field_at(point: R2, charges: &[PointCharge], k: Scalar) -> R2 {
    charges.iter().fold(R2::zeros(), |e, c| {
        e + contribution(point - c.position, k * c.charge, SingularityPolicy::Propagate)
    })
}
