//! Baseline physical constants.
//!
//! ## Accuracy
//!
//! Constants marked "exact" have zero uncertainty by SI definition (2019 revision).
//! The vacuum permittivity ε₀ is a measured value given to 11 significant figures; the
//! Coulomb constant is derived from it. Field evaluation itself is unit-agnostic and takes
//! `k` as a plain scalar, so these values only matter when a caller wants SI output.
//!
//! ## References
//!
//! Physical constants are based on CODATA recommended values:
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>
//! - CODATA 2018 values published May 20, 2019 (following 2019 SI redefinition)

use std::f64::consts::PI;

use crate::math::Scalar;

/// Vacuum permittivity ε₀ in farads per meter (F/m).
/// Approximate value: 8.8541878128 × 10⁻¹² F/m (11 significant figures).
pub const VACUUM_PERMITTIVITY: Scalar = 8.854_187_812_8e-12;
/// Coulomb constant _k_ = 1 / (4π ε₀) in N·m²/C².
/// Approximate value: 8.9875517923 × 10⁹ N·m²/C².
pub const COULOMB_CONSTANT: Scalar = 8.987_551_792_3e9;
/// Elementary charge _e_ in coulombs (C).
/// Exact value by 2019 SI definition: 1.602176634 × 10⁻¹⁹ C.
pub const ELEMENTARY_CHARGE: Scalar = 1.602_176_634e-19;

/// Returns the Coulomb constant 1 / (4π ε) for a medium of permittivity `permittivity` (F/m).
#[inline]
#[must_use]
pub fn coulomb_constant_in(permittivity: Scalar) -> Scalar {
    1.0 / (4.0 * PI * permittivity)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn coulomb_constant_matches_vacuum_permittivity() {
        assert_relative_eq!(
            coulomb_constant_in(VACUUM_PERMITTIVITY),
            COULOMB_CONSTANT,
            max_relative = 1.0e-10
        );
    }
}
