//! The three-stage run: grid generation, field superposition, rendering.

use tracing::{debug, info_span, warn};

use crate::constants::COULOMB_CONSTANT;
use crate::errors::FieldLinesError;
use crate::fields::{generate_field_with, FieldComponents, PointCharge, SingularityPolicy};
use crate::grid::{generate_grid, CoordinateGrid};
use crate::math::{Field2, Scalar};
use crate::render::{PlotStyle, Renderer, StreamPlot};

/// Charges and sampling parameters of one experiment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Half-width of the sampled square.
    pub gridsize: Scalar,
    /// Samples per axis.
    pub subdivisions: usize,
    /// Proportionality constant of Coulomb's law.
    pub k: Scalar,
    /// Point charges, in any order.
    pub charges: Vec<PointCharge>,
    /// Treatment of samples lying on a charge.
    pub singularity: SingularityPolicy,
}

impl Default for Scene {
    /// A unit dipole on the X axis sampled at 200 × 200 points over `[-5, 5]²`.
    fn default() -> Self {
        Self {
            gridsize: 5.0,
            subdivisions: 200,
            k: COULOMB_CONSTANT,
            charges: vec![PointCharge::new(-1.0, 0.0, 1.0), PointCharge::new(1.0, 0.0, -1.0)],
            singularity: SingularityPolicy::Propagate,
        }
    }
}

impl Scene {
    /// Scene with the given charges and sampling, `k` and policy left at their defaults.
    #[must_use]
    pub fn new(gridsize: Scalar, subdivisions: usize, charges: Vec<PointCharge>) -> Self {
        Self { gridsize, subdivisions, charges, ..Self::default() }
    }

    /// Replaces the Coulomb constant.
    #[must_use]
    pub fn with_k(mut self, k: Scalar) -> Self {
        self.k = k;
        self
    }
}

/// Output of the first two stages: the lattice and the field sampled on it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSolution {
    /// Sampling lattice.
    pub grid: CoordinateGrid,
    /// Net field at every sample.
    pub field: FieldComponents,
}

impl FieldSolution {
    /// `sqrt(Ex² + Ey²)`, the colour array handed to the renderer.
    #[must_use]
    pub fn magnitude(&self) -> Field2 {
        self.field.magnitude()
    }

    /// Hands grid, field and magnitude to `renderer`.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R, style: &PlotStyle) -> Result<(), FieldLinesError> {
        let magnitude = self.magnitude();
        let plot = StreamPlot::new(&self.grid, &self.field, &magnitude, style)?;
        renderer.stream_plot(&plot)?;
        Ok(())
    }
}

/// Runs grid generation and field superposition for `scene`.
pub fn solve(scene: &Scene) -> Result<FieldSolution, FieldLinesError> {
    let _span = info_span!("solve", charges = scene.charges.len()).entered();
    let grid = generate_grid(scene.gridsize, scene.subdivisions)?;
    let field = generate_field_with(&scene.charges, &grid, scene.k, scene.singularity);
    let singular = field.non_finite_points();
    if !singular.is_empty() {
        warn!(
            count = singular.len(),
            first = ?singular[0],
            "field is non-finite where samples coincide with charges"
        );
    }
    debug!(range = ?field.finite_magnitude_range(), "field magnitude");
    Ok(FieldSolution { grid, field })
}

/// Runs all three stages, returning the solution once `renderer` has finished.
pub fn run<R: Renderer + ?Sized>(
    scene: &Scene,
    style: &PlotStyle,
    renderer: &mut R,
) -> Result<FieldSolution, FieldLinesError> {
    let solution = solve(scene)?;
    solution.render(renderer, style)?;
    Ok(solution)
}
