//! Streamline tracing over a sampled 2D vector field.
//!
//! Lines are seeded on an occupancy mask of `30 × density` cells per axis, starting at
//! the boundary and spiralling inward. Each seed is integrated backwards and forwards
//! along the unit direction field with fixed-step RK4 on a bilinear interpolant of the
//! samples. A line stops at the domain edge, where the field is non-finite or vanishes,
//! where its direction turns back (at a charge or a null), when it enters a cell claimed
//! by another line, or once it has taken the steps its maximum length allows.
//! Lines shorter than the minimum length give their cells back.

use crate::fields::FieldComponents;
use crate::grid::CoordinateGrid;
use crate::math::{Field2, Scalar, R2};

const MASK_CELLS_PER_DENSITY: Scalar = 30.0;

/// A traced field line, vertices ordered along the field direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    /// Polyline vertices.
    pub points: Vec<R2>,
}

impl Streamline {
    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> Scalar {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// Configurable streamline tracer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamlineTracer {
    /// Line density; the mask has `30 × density` cells per axis.
    pub density: Scalar,
    /// Shortest kept line, as a fraction of the domain width.
    pub min_length: Scalar,
    /// Longest line, as a fraction of the domain width.
    pub max_length: Scalar,
}

impl Default for StreamlineTracer {
    fn default() -> Self {
        Self { density: 1.0, min_length: 0.1, max_length: 4.0 }
    }
}

/// Cell `(i, j)` containing `p` and the fractional offsets `(fu, fv)` inside it.
fn locate(grid: &CoordinateGrid, p: R2) -> Option<((usize, usize), (Scalar, Scalar))> {
    let last = grid.subdivisions() - 1;
    let u = (p.x + grid.gridsize()) / grid.spacing();
    let v = (p.y + grid.gridsize()) / grid.spacing();
    let limit = last as Scalar;
    if !(0.0..=limit).contains(&u) || !(0.0..=limit).contains(&v) {
        return None;
    }
    let j = (u.floor() as usize).min(last - 1);
    let i = (v.floor() as usize).min(last - 1);
    Some(((i, j), (u - j as Scalar, v - i as Scalar)))
}

/// Bilinear interpolation of per-sample `values` at `p`; `None` outside the grid.
#[must_use]
pub fn interpolate(grid: &CoordinateGrid, values: &Field2, p: R2) -> Option<Scalar> {
    let ((i, j), (fu, fv)) = locate(grid, p)?;
    Some(
        values[(i, j)] * ((1.0 - fu) * (1.0 - fv))
            + values[(i, j + 1)] * (fu * (1.0 - fv))
            + values[(i + 1, j)] * ((1.0 - fu) * fv)
            + values[(i + 1, j + 1)] * (fu * fv),
    )
}

/// Bilinear interpolant of `(Ex, Ey)` over the uniform lattice.
struct FieldSampler<'a> {
    grid: &'a CoordinateGrid,
    field: &'a FieldComponents,
}

impl<'a> FieldSampler<'a> {
    const fn new(grid: &'a CoordinateGrid, field: &'a FieldComponents) -> Self {
        Self { grid, field }
    }

    fn sample(&self, p: R2) -> Option<R2> {
        let ((i, j), (fu, fv)) = locate(self.grid, p)?;
        let e = self.field.at(i, j) * ((1.0 - fu) * (1.0 - fv))
            + self.field.at(i, j + 1) * (fu * (1.0 - fv))
            + self.field.at(i + 1, j) * ((1.0 - fu) * fv)
            + self.field.at(i + 1, j + 1) * (fu * fv);
        (e.x.is_finite() && e.y.is_finite()).then_some(e)
    }

    fn direction(&self, p: R2) -> Option<R2> {
        let e = self.sample(p)?;
        let norm = e.norm();
        (norm > Scalar::MIN_POSITIVE && norm.is_finite()).then(|| e / norm)
    }

    /// One RK4 step; `None` once a stage turns against the first, as it does across a
    /// charge or a null of the field.
    fn rk4(&self, p: R2, h: Scalar) -> Option<R2> {
        let k1 = self.direction(p)?;
        let k2 = self.direction(p + k1 * (h / 2.0))?;
        let k3 = self.direction(p + k2 * (h / 2.0))?;
        let k4 = self.direction(p + k3 * h)?;
        if [k2, k3, k4].iter().any(|k| k1.dot(k) < 0.0) {
            return None;
        }
        Some(p + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0))
    }
}

struct OccupancyMask {
    cells: usize,
    origin: Scalar,
    cell_size: Scalar,
    occupied: Vec<bool>,
}

impl OccupancyMask {
    fn new(cells: usize, gridsize: Scalar) -> Self {
        Self {
            cells,
            origin: -gridsize,
            cell_size: 2.0 * gridsize / cells as Scalar,
            occupied: vec![false; cells * cells],
        }
    }

    fn cell_of(&self, p: R2) -> (usize, usize) {
        let index = |c: Scalar| (((c - self.origin) / self.cell_size).floor().max(0.0) as usize).min(self.cells - 1);
        (index(p.y), index(p.x))
    }

    fn center(&self, (row, col): (usize, usize)) -> R2 {
        R2::new(
            self.origin + (col as Scalar + 0.5) * self.cell_size,
            self.origin + (row as Scalar + 0.5) * self.cell_size,
        )
    }

    fn is_occupied(&self, (row, col): (usize, usize)) -> bool {
        self.occupied[row * self.cells + col]
    }

    fn set(&mut self, (row, col): (usize, usize), value: bool) {
        self.occupied[row * self.cells + col] = value;
    }
}

/// Steps of length `|h|` that fit in `budget`; the arc length of a line is measured in
/// steps, so the count bounds a line even where the stages cancel and it barely moves.
fn max_steps(budget: Scalar, h: Scalar) -> usize {
    let steps = (budget / h.abs()).ceil();
    if steps.is_finite() && steps > 0.0 { steps as usize } else { 0 }
}

/// Mask cells ordered from the outer ring inward, clockwise from the top-left corner.
fn spiral_order(n: usize) -> Vec<(usize, usize)> {
    let mut order = Vec::with_capacity(n * n);
    let (mut top, mut left) = (0usize, 0usize);
    let (mut bottom, mut right) = (n, n);
    while top < bottom && left < right {
        order.extend((left..right).map(|c| (top, c)));
        order.extend((top + 1..bottom).map(|r| (r, right - 1)));
        if bottom - top > 1 {
            order.extend((left..right - 1).rev().map(|c| (bottom - 1, c)));
        }
        if right - left > 1 {
            order.extend((top + 1..bottom - 1).rev().map(|r| (r, left)));
        }
        top += 1;
        left += 1;
        bottom -= 1;
        right -= 1;
    }
    order
}

impl StreamlineTracer {
    /// Tracer with the given density and default length limits.
    #[must_use]
    pub fn new(density: Scalar) -> Self {
        Self { density, ..Self::default() }
    }

    /// Occupancy mask cells per axis.
    #[must_use]
    pub fn mask_cells(&self) -> usize {
        (MASK_CELLS_PER_DENSITY * self.density).round().max(1.0) as usize
    }

    /// Traces streamlines of `field` across the square spanned by `grid`.
    #[must_use]
    pub fn trace(&self, grid: &CoordinateGrid, field: &FieldComponents) -> Vec<Streamline> {
        let sampler = FieldSampler::new(grid, field);
        let mut mask = OccupancyMask::new(self.mask_cells(), grid.gridsize());
        let width = 2.0 * grid.gridsize();
        let step = mask.cell_size / 2.0;
        let limits = (self.min_length * width, self.max_length * width);

        let mut lines = Vec::new();
        for cell in spiral_order(mask.cells) {
            if mask.is_occupied(cell) {
                continue;
            }
            if let Some(line) = self.trace_from(&sampler, &mut mask, cell, step, limits) {
                lines.push(line);
            }
        }
        lines
    }

    fn trace_from(
        &self,
        sampler: &FieldSampler<'_>,
        mask: &mut OccupancyMask,
        seed_cell: (usize, usize),
        step: Scalar,
        (min_length, max_length): (Scalar, Scalar),
    ) -> Option<Streamline> {
        let seed = mask.center(seed_cell);
        sampler.direction(seed)?;

        let mut claimed = vec![seed_cell];
        mask.set(seed_cell, true);
        let budget = max_length / 2.0;
        let backward = Self::integrate(sampler, mask, &mut claimed, seed, -step, budget);
        let forward = Self::integrate(sampler, mask, &mut claimed, seed, step, budget);

        let mut points = Vec::with_capacity(backward.len() + forward.len() + 1);
        points.extend(backward.into_iter().rev());
        points.push(seed);
        points.extend(forward);

        let line = Streamline { points };
        if line.points.len() < 2 || line.length() < min_length {
            for cell in claimed {
                mask.set(cell, false);
            }
            return None;
        }
        Some(line)
    }

    fn integrate(
        sampler: &FieldSampler<'_>,
        mask: &mut OccupancyMask,
        claimed: &mut Vec<(usize, usize)>,
        start: R2,
        h: Scalar,
        budget: Scalar,
    ) -> Vec<R2> {
        let mut out = Vec::new();
        let mut p = start;
        let mut cell = mask.cell_of(start);
        for _ in 0..max_steps(budget, h) {
            let Some(next) = sampler.rk4(p, h) else { break };
            if sampler.direction(next).is_none() {
                break;
            }
            let next_cell = mask.cell_of(next);
            if next_cell != cell {
                if mask.is_occupied(next_cell) {
                    break;
                }
                mask.set(next_cell, true);
                claimed.push(next_cell);
                cell = next_cell;
            }
            out.push(next);
            p = next;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::fields::{generate_field, PointCharge};
    use crate::grid::generate_grid;

    fn uniform_field(grid: &CoordinateGrid, e: R2) -> FieldComponents {
        let mut field = FieldComponents::zeros(grid.shape());
        field.ex.fill(e.x);
        field.ey.fill(e.y);
        field
    }

    #[test]
    fn spiral_visits_every_cell_once() {
        for n in [1, 2, 3, 6, 7] {
            let mut order = spiral_order(n);
            assert_eq!(order.len(), n * n);
            assert_eq!(order[0], (0, 0));
            order.sort_unstable();
            order.dedup();
            assert_eq!(order.len(), n * n);
        }
    }

    #[test]
    fn bilinear_sampler_reproduces_linear_field() {
        let grid = generate_grid(2.0, 5).expect("valid grid");
        let field = FieldComponents { ex: grid.x().clone(), ey: grid.y() * 2.0 };
        let sampler = FieldSampler::new(&grid, &field);
        let e = sampler.sample(R2::new(0.3, -1.7)).expect("inside domain");
        assert_relative_eq!(e.x, 0.3, epsilon = 1.0e-12);
        assert_relative_eq!(e.y, -3.4, epsilon = 1.0e-12);
        assert!(sampler.sample(R2::new(2.5, 0.0)).is_none());
        assert_relative_eq!(
            interpolate(&grid, &field.ey, R2::new(1.25, 0.5)).expect("inside domain"),
            1.0,
            epsilon = 1.0e-12
        );
        assert!(interpolate(&grid, &field.ey, R2::new(0.0, -2.01)).is_none());
    }

    #[test]
    fn uniform_field_gives_parallel_lines() {
        let grid = generate_grid(1.0, 8).expect("valid grid");
        let field = uniform_field(&grid, R2::new(1.0, 0.0));
        let lines = StreamlineTracer::new(0.5).trace(&grid, &field);
        assert!(!lines.is_empty());
        for line in &lines {
            let y0 = line.points[0].y;
            assert!(line.points.iter().all(|p| (p.y - y0).abs() < 1.0e-9));
            assert!(line.points.windows(2).all(|w| w[1].x > w[0].x));
        }
    }

    #[test]
    fn zero_field_traces_nothing() {
        let grid = generate_grid(1.0, 4).expect("valid grid");
        let lines = StreamlineTracer::new(1.0).trace(&grid, &FieldComponents::zeros(grid.shape()));
        assert!(lines.is_empty());
    }

    #[test]
    fn lines_leave_positive_charge_radially() {
        let grid = generate_grid(2.0, 40).expect("valid grid");
        let charge = PointCharge::new(0.05, 0.05, 1.0);
        let field = generate_field(&[charge], &grid, 1.0);
        let lines = StreamlineTracer::new(1.0).trace(&grid, &field);
        assert!(!lines.is_empty());
        for line in &lines {
            assert!(line.points.iter().all(|p| p.x.abs() <= 2.0 + 1.0e-9 && p.y.abs() <= 2.0 + 1.0e-9));
            assert!(line.length() >= 0.1 * 4.0);
            let first = (line.points[0] - charge.position).norm();
            let last = (line.points[line.points.len() - 1] - charge.position).norm();
            assert!(last > first);
        }
    }

    fn assert_bounded(lines: &[Streamline], tracer: &StreamlineTracer, grid: &CoordinateGrid) {
        let width = 2.0 * grid.gridsize();
        let step = width / tracer.mask_cells() as Scalar / 2.0;
        let cap = 2 * max_steps(tracer.max_length * width / 2.0, step) + 1;
        for line in lines {
            assert!(line.points.len() <= cap);
            assert!(line.length() <= tracer.max_length * width + 2.0 * step);
            let edge = grid.gridsize() + 1.0e-9;
            assert!(line.points.iter().all(|p| p.x.abs() <= edge && p.y.abs() <= edge));
        }
    }

    #[test]
    fn dipole_at_default_density_terminates() {
        let grid = generate_grid(5.0, 200).expect("valid grid");
        let dipole = [PointCharge::new(-1.0, 0.0, 1.0), PointCharge::new(1.0, 0.0, -1.0)];
        let field = generate_field(&dipole, &grid, 1.0);
        let tracer = StreamlineTracer::new(7.0);
        let lines = tracer.trace(&grid, &field);
        assert!(!lines.is_empty());
        assert_bounded(&lines, &tracer, &grid);
        // Lines run from + to -, so some end closer to the sink than they start.
        let sink = dipole[1].position;
        assert!(lines.iter().any(|l| {
            (l.points[l.points.len() - 1] - sink).norm() < (l.points[0] - sink).norm()
        }));
    }

    #[test]
    fn like_charges_with_null_between_terminate() {
        let grid = generate_grid(5.0, 200).expect("valid grid");
        let pair = [PointCharge::new(-1.0, 0.0, 1.0), PointCharge::new(1.0, 0.0, 1.0)];
        let field = generate_field(&pair, &grid, 1.0);
        let tracer = StreamlineTracer::new(7.0);
        let lines = tracer.trace(&grid, &field);
        assert!(!lines.is_empty());
        assert_bounded(&lines, &tracer, &grid);
    }

    #[test]
    fn step_cap_follows_budget() {
        assert_eq!(max_steps(1.0, 0.25), 4);
        assert_eq!(max_steps(1.0, -0.3), 4);
        assert_eq!(max_steps(1.0, 0.0), 0);
        assert_eq!(max_steps(0.0, 0.1), 0);
    }

    #[test]
    fn rk4_stops_across_a_sink() {
        let grid = generate_grid(1.0, 41).expect("valid grid");
        let field = generate_field(&[PointCharge::new(0.01, 0.01, -1.0)], &grid, 1.0);
        let sampler = FieldSampler::new(&grid, &field);
        assert!(sampler.rk4(R2::new(-0.5, 0.01), 0.1).is_some());
        assert!(sampler.rk4(R2::new(-0.02, 0.01), 0.1).is_none());
    }

    #[test]
    fn mask_limits_line_count() {
        let grid = generate_grid(1.0, 8).expect("valid grid");
        let field = uniform_field(&grid, R2::new(0.0, 1.0));
        let tracer = StreamlineTracer::new(1.0);
        let lines = tracer.trace(&grid, &field);
        assert!(lines.len() <= tracer.mask_cells());
    }
}
