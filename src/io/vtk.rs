//! Legacy VTK ASCII export.
//!
//! Fields are written as `STRUCTURED_POINTS` on the `n × n × 1` lattice so ParaView and
//! other VTK readers can display them directly. X varies fastest, matching VTK point order.

use std::io::{self, Write};

use crate::fields::FieldComponents;
use crate::grid::CoordinateGrid;

/// Writes a VTK ASCII file header.
pub fn write_vtk_header<W: Write>(mut writer: W, title: &str) -> io::Result<()> {
    writeln!(writer, "# vtk DataFile Version 3.0")?;
    // The title line is limited to one line by the format.
    writeln!(writer, "{}", title.lines().next().unwrap_or_default())?;
    writeln!(writer, "ASCII")?;
    Ok(())
}

/// Writes the grid with the field as vector `E` and its norm as scalar `magnitude`.
pub fn write_field_vtk<W: Write>(
    mut writer: W,
    title: &str,
    grid: &CoordinateGrid,
    field: &FieldComponents,
) -> io::Result<()> {
    let n = grid.subdivisions();
    let origin = -grid.gridsize();
    let spacing = grid.spacing();
    write_vtk_header(&mut writer, title)?;
    writeln!(writer, "DATASET STRUCTURED_POINTS")?;
    writeln!(writer, "DIMENSIONS {n} {n} 1")?;
    writeln!(writer, "ORIGIN {origin:.16e} {origin:.16e} 0")?;
    writeln!(writer, "SPACING {spacing:.16e} {spacing:.16e} 1")?;
    writeln!(writer, "POINT_DATA {}", n * n)?;
    writeln!(writer, "VECTORS E double")?;
    for ((i, j), _) in grid.points() {
        let e = field.at(i, j);
        writeln!(writer, "{:.16e} {:.16e} 0", e.x, e.y)?;
    }
    writeln!(writer, "SCALARS magnitude double 1")?;
    writeln!(writer, "LOOKUP_TABLE default")?;
    for ((i, j), _) in grid.points() {
        writeln!(writer, "{:.16e}", field.at(i, j).norm())?;
    }
    Ok(())
}
