use std::fmt;
use std::str::FromStr;

use crate::math::Scalar;

use super::RenderError;

/// Named colour scales for mapping field magnitude to line colour.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Diverging blue, grey, red scale.
    #[default]
    Coolwarm,
    /// Perceptually uniform purple, teal, yellow scale.
    Viridis,
}

// Anchors sampled from the reference scales at t = 0, 0.25, 0.5, 0.75, 1.
const COOLWARM: [(u8, u8, u8); 5] =
    [(59, 76, 192), (141, 176, 254), (221, 221, 221), (244, 154, 123), (180, 4, 38)];
const VIRIDIS: [(u8, u8, u8); 5] =
    [(68, 1, 84), (59, 82, 139), (33, 145, 140), (94, 201, 98), (253, 231, 37)];

impl Colormap {
    /// Name accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coolwarm => "coolwarm",
            Self::Viridis => "viridis",
        }
    }

    /// RGB colour at position `t` in `[0, 1]`; `t` is clamped, NaN maps to the low end.
    #[must_use]
    pub fn rgb(self, t: Scalar) -> (u8, u8, u8) {
        let anchors = match self {
            Self::Coolwarm => &COOLWARM,
            Self::Viridis => &VIRIDIS,
        };
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (anchors.len() - 1) as Scalar;
        let lo = (scaled.floor() as usize).min(anchors.len() - 2);
        let frac = scaled - lo as Scalar;
        let lerp = |a: u8, b: u8| (Scalar::from(a) + (Scalar::from(b) - Scalar::from(a)) * frac).round() as u8;
        let (a, b) = (anchors[lo], anchors[lo + 1]);
        (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Colour of `value` on a linear scale spanning `[lo, hi]`.
    #[must_use]
    pub fn map(self, value: Scalar, lo: Scalar, hi: Scalar) -> (u8, u8, u8) {
        let t = if is_degenerate(lo, hi) { 0.5 } else { (value - lo) / (hi - lo) };
        self.rgb(t)
    }
}

/// `[lo, hi]` is too narrow to resolve, relative to the size of its bounds.
pub fn is_degenerate(lo: Scalar, hi: Scalar) -> bool {
    let range = hi - lo;
    !range.is_finite() || range.abs() <= Scalar::EPSILON * lo.abs().max(hi.abs())
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coolwarm" => Ok(Self::Coolwarm),
            "viridis" => Ok(Self::Viridis),
            _ => Err(RenderError::UnknownColormap(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Colormap {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colormap> for String {
    fn from(map: Colormap) -> Self {
        map.name().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint_hit_anchors() {
        assert_eq!(Colormap::Coolwarm.rgb(0.0), COOLWARM[0]);
        assert_eq!(Colormap::Coolwarm.rgb(0.5), COOLWARM[2]);
        assert_eq!(Colormap::Coolwarm.rgb(1.0), COOLWARM[4]);
        assert_eq!(Colormap::Viridis.rgb(1.0), VIRIDIS[4]);
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(Colormap::Coolwarm.rgb(-3.0), COOLWARM[0]);
        assert_eq!(Colormap::Coolwarm.rgb(7.0), COOLWARM[4]);
        assert_eq!(Colormap::Coolwarm.rgb(Scalar::NAN), COOLWARM[0]);
        assert_eq!(Colormap::Viridis.map(5.0, 2.0, 2.0), Colormap::Viridis.rgb(0.5));
    }

    #[test]
    fn tiny_ranges_keep_their_full_scale() {
        assert_eq!(Colormap::Coolwarm.map(3.0e-20, 1.0e-20, 3.0e-20), COOLWARM[4]);
        assert_eq!(Colormap::Coolwarm.map(1.0e-20, 1.0e-20, 3.0e-20), COOLWARM[0]);
        assert_eq!(Colormap::Coolwarm.map(2.0e-20, 1.0e-20, 3.0e-20), COOLWARM[2]);
        assert!(is_degenerate(0.0, 0.0));
        assert!(is_degenerate(1.0e9, 1.0e9 + 1.0e-8));
        assert!(!is_degenerate(1.0e-20, 3.0e-20));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("CoolWarm".parse::<Colormap>().ok(), Some(Colormap::Coolwarm));
        assert_eq!(Colormap::Viridis.to_string().parse::<Colormap>().ok(), Some(Colormap::Viridis));
        assert!(matches!("jet".parse::<Colormap>(), Err(RenderError::UnknownColormap(name)) if name == "jet"));
    }
}
