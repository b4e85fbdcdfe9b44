use crate::{Grid, Pentadiagonal, StrError, CENTER, EAST, NORTH, SOUTH, WEST};
use russell_lab::Matrix;

/// Assembles the two-point flux approximation (TPFA) pressure matrix
///
/// The face transmissibilities are computed with the harmonic mean of the
/// permeabilities of the two cells sharing the face:
///
/// ```text
/// tx[i,j] = (2 dy / dx) / (1 / k[i,j-1] + 1 / k[i,j])    for j in 1..nx
/// ty[i,j] = (2 dx / dy) / (1 / k[i-1,j] + 1 / k[i,j])    for i in 1..ny
/// ```
///
/// The faces on the boundary of the domain have zero transmissibility (no-flow).
///
/// With `x1 = tx[i,j]`, `x2 = tx[i,j+1]`, `y1 = ty[i,j]`, and `y2 = ty[i+1,j]`, the
/// row of cell `c = i nx + j` reads:
///
/// ```text
/// A[c,c-nx] = -y1   A[c,c-1] = -x1   A[c,c] = x1+x2+y1+y2   A[c,c+1] = -x2   A[c,c+nx] = -y2
/// ```
///
/// Thus, each row sums to zero.
///
/// # Input
///
/// * `grid` -- the grid
/// * `k` -- (ny, nx) permeability field; all values must be positive (not checked here)
///
/// # Output
///
/// Returns `(mat, tx, ty)` where:
///
/// * `mat` -- the (ncell, ncell) system matrix
/// * `tx` -- (ny, nx+1) transmissibilities of the faces normal to x
/// * `ty` -- (ny+1, nx) transmissibilities of the faces normal to y
pub fn transmi(grid: &Grid, k: &Matrix) -> Result<(Pentadiagonal, Matrix, Matrix), StrError> {
    let (nx, ny) = (grid.nx(), grid.ny());
    if k.dims() != (ny, nx) {
        return Err("permeability matrix must be (ny, nx)");
    }

    // face transmissibilities
    let ax = 2.0 * grid.dy() / grid.dx();
    let ay = 2.0 * grid.dx() / grid.dy();
    let mut tx = Matrix::new(ny, nx + 1);
    let mut ty = Matrix::new(ny + 1, nx);
    for i in 0..ny {
        for j in 1..nx {
            tx.set(i, j, ax / (1.0 / k.get(i, j - 1) + 1.0 / k.get(i, j)));
        }
    }
    for i in 1..ny {
        for j in 0..nx {
            ty.set(i, j, ay / (1.0 / k.get(i - 1, j) + 1.0 / k.get(i, j)));
        }
    }

    // system matrix
    let mut mat = Pentadiagonal::new(grid.ncell(), nx)?;
    for i in 0..ny {
        for j in 0..nx {
            let c = grid.index(i, j);
            let x1 = tx.get(i, j);
            let x2 = tx.get(i, j + 1);
            let y1 = ty.get(i, j);
            let y2 = ty.get(i + 1, j);
            mat.set(c, SOUTH, -y1);
            mat.set(c, WEST, -x1);
            mat.set(c, CENTER, x1 + x2 + y1 + y2);
            mat.set(c, EAST, -x2);
            mat.set(c, NORTH, -y2);
        }
    }
    Ok((mat, tx, ty))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
