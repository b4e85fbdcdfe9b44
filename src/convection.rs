use crate::{Flux, Grid, Pentadiagonal, StrError, CENTER, EAST, NORTH, SOUTH, WEST};

/// Assembles the convection matrix using the first-order upwind scheme
///
/// Each face flux is split into its negative and positive parts and, for cell `c = i nx + j`:
///
/// ```text
/// A[c,c-nx] = -max(vy[i,j], 0)        (inflow from the south neighbor)
/// A[c,c-1]  = -max(vx[i,j], 0)        (inflow from the west neighbor)
/// A[c,c]    =  max(vx[i,j+1], 0) - min(vx[i,j], 0) + max(vy[i+1,j], 0) - min(vy[i,j], 0)
/// A[c,c+1]  =  min(vx[i,j+1], 0)      (inflow from the east neighbor)
/// A[c,c+nx] =  min(vy[i+1,j], 0)      (inflow from the north neighbor)
/// ```
///
/// Hence, `(A f)[c]` is the net upwinded outflow of the transported quantity `f` from cell `c`.
///
/// **Note:** The matrix is not divided by the cell volume.
pub fn convecti(grid: &Grid, v: &Flux) -> Result<Pentadiagonal, StrError> {
    v.check_dims(grid)?;
    let mut mat = Pentadiagonal::new(grid.ncell(), grid.nx())?;
    for i in 0..grid.ny() {
        for j in 0..grid.nx() {
            let c = grid.index(i, j);
            let (west, east) = (v.x.get(i, j), v.x.get(i, j + 1));
            let (south, north) = (v.y.get(i, j), v.y.get(i + 1, j));
            let x1 = f64::min(west, 0.0);
            let x2 = f64::max(east, 0.0);
            let y1 = f64::min(south, 0.0);
            let y2 = f64::max(north, 0.0);
            mat.set(c, SOUTH, -f64::max(south, 0.0));
            mat.set(c, WEST, -f64::max(west, 0.0));
            mat.set(c, CENTER, x2 - x1 + y2 - y1);
            mat.set(c, EAST, f64::min(east, 0.0));
            mat.set(c, NORTH, f64::min(north, 0.0));
        }
    }
    Ok(mat)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
