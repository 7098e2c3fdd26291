//! Electrostatic field of point charges sampled on a coordinate grid.

mod electrostatic;

pub use electrostatic::{
    ChargeParseError,
    FieldComponents,
    PointCharge,
    SingularityPolicy,
    electric_field_at,
    generate_field,
    generate_field_with,
};
