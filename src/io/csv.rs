//! Plain CSV export, one row per grid sample.

use std::io::{self, Write};

use crate::fields::FieldComponents;
use crate::grid::CoordinateGrid;

/// Writes `x,y,ex,ey,magnitude` rows for every sample, row by row.
///
/// Non-finite components are written as Rust formats them (`NaN`, `inf`).
pub fn write_field_csv<W: Write>(mut w: W, grid: &CoordinateGrid, field: &FieldComponents) -> io::Result<()> {
    writeln!(w, "x,y,ex,ey,magnitude")?;
    for ((i, j), p) in grid.points() {
        let e = field.at(i, j);
        writeln!(w, "{:.16e},{:.16e},{:.16e},{:.16e},{:.16e}", p.x, p.y, e.x, e.y, e.norm())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{generate_field, PointCharge};
    use crate::grid::generate_grid;

    #[test]
    fn one_row_per_sample_plus_header() {
        let grid = generate_grid(5.0, 3).expect("valid grid");
        let field = generate_field(&[PointCharge::new(0.0, 0.0, 1.0)], &grid, 1.0);
        let mut out = Vec::new();
        write_field_csv(&mut out, &grid, &field).expect("in-memory write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "x,y,ex,ey,magnitude");
        let centre: Vec<&str> = lines[5].split(',').collect();
        assert_eq!(centre[2], "NaN");
        let right: Vec<f64> = lines[6].split(',').map(|v| v.parse().expect("number")).collect();
        assert_eq!(right[..2], [5.0, 0.0]);
        assert!(right[2] > 0.0);
    }
}
