use crate::{Grid, StrError};
use russell_lab::{Matrix, Vector};

/// Holds the face-normal fluxes of a structured grid
///
/// The faces on the boundary of the domain carry zero flux (no-flow).
#[derive(Clone, Debug)]
pub struct Flux {
    /// (ny, nx+1) fluxes across the faces normal to x (positive towards +x)
    pub x: Matrix,

    /// (ny+1, nx) fluxes across the faces normal to y (positive towards +y)
    pub y: Matrix,
}

impl Flux {
    /// Allocates a new instance with zero fluxes
    pub fn new(grid: &Grid) -> Self {
        let (nx, ny) = (grid.nx(), grid.ny());
        Flux {
            x: Matrix::new(ny, nx + 1),
            y: Matrix::new(ny + 1, nx),
        }
    }

    /// Calculates the fluxes from the pressure field and the face transmissibilities
    ///
    /// ```text
    /// vx[i,j] = (p[i,j-1] - p[i,j]) tx[i,j]    for j in 1..nx
    /// vy[i,j] = (p[i-1,j] - p[i,j]) ty[i,j]    for i in 1..ny
    /// ```
    ///
    /// # Input
    ///
    /// * `p` -- (ny, nx) pressure
    /// * `tx` -- (ny, nx+1) transmissibilities of the faces normal to x
    /// * `ty` -- (ny+1, nx) transmissibilities of the faces normal to y
    pub fn from_pressure(grid: &Grid, p: &Matrix, tx: &Matrix, ty: &Matrix) -> Result<Self, StrError> {
        let (nx, ny) = (grid.nx(), grid.ny());
        if p.dims() != (ny, nx) {
            return Err("pressure matrix must be (ny, nx)");
        }
        if tx.dims() != (ny, nx + 1) || ty.dims() != (ny + 1, nx) {
            return Err("transmissibility matrices are incompatible with the grid");
        }
        let mut v = Flux::new(grid);
        for i in 0..ny {
            for j in 1..nx {
                v.x.set(i, j, (p.get(i, j - 1) - p.get(i, j)) * tx.get(i, j));
            }
        }
        for i in 1..ny {
            for j in 0..nx {
                v.y.set(i, j, (p.get(i - 1, j) - p.get(i, j)) * ty.get(i, j));
            }
        }
        Ok(v)
    }

    /// Checks whether the dimensions of the flux matrices are compatible with the grid
    pub fn check_dims(&self, grid: &Grid) -> Result<(), StrError> {
        let (nx, ny) = (grid.nx(), grid.ny());
        if self.x.dims() != (ny, nx + 1) {
            return Err("flux matrix along x must be (ny, nx+1)");
        }
        if self.y.dims() != (ny + 1, nx) {
            return Err("flux matrix along y must be (ny+1, nx)");
        }
        Ok(())
    }

    /// Returns the net outflow (outflow minus inflow) of each cell
    pub fn net_outflow(&self, grid: &Grid) -> Result<Vector, StrError> {
        self.check_dims(grid)?;
        let mut out = Vector::new(grid.ncell());
        for i in 0..grid.ny() {
            for j in 0..grid.nx() {
                out[grid.index(i, j)] =
                    self.x.get(i, j + 1) - self.x.get(i, j) + self.y.get(i + 1, j) - self.y.get(i, j);
            }
        }
        Ok(out)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
