//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::{DMatrix, Vector2};

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for two-dimensional real vectors.
pub type R2 = Vector2<Scalar>;
/// Dense row-major-indexed sample array: entry `(i, j)` is row `i`, column `j`.
pub type Field2 = DMatrix<Scalar>;

/// Generates `n` linearly spaced samples in [start, stop].
///
/// For `n >= 2` both endpoints are reproduced exactly; interior samples are
/// `start + i * step`.
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            let mut values: Vec<Scalar> = (0..n).map(|i| start + step * i as Scalar).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Expands two axes into coordinate matrices `(X, Y)` of shape `ys.len() × xs.len()`.
///
/// `X[(i, j)] = xs[j]` and `Y[(i, j)] = ys[i]`: columns walk X, rows walk Y.
#[must_use]
pub fn meshgrid(xs: &[Scalar], ys: &[Scalar]) -> (Field2, Field2) {
    let x = DMatrix::from_fn(ys.len(), xs.len(), |_, j| xs[j]);
    let y = DMatrix::from_fn(ys.len(), xs.len(), |i, _| ys[i]);
    (x, y)
}
