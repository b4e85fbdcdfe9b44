use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_sparse::{CooMatrix, Sym};

/// Band index of the south neighbor (offset -nx)
pub const SOUTH: usize = 0;

/// Band index of the west neighbor (offset -1)
pub const WEST: usize = 1;

/// Band index of the diagonal (offset 0)
pub const CENTER: usize = 2;

/// Band index of the east neighbor (offset +1)
pub const EAST: usize = 3;

/// Band index of the north neighbor (offset +nx)
pub const NORTH: usize = 4;

/// Number of bands of the five-point stencil
pub const N_BAND: usize = 5;

/// Holds a square sparse matrix with the five-point stencil structure of a structured 2D grid
///
/// The entries of each row are stored by band; i.e., `bands[r][b]` is the coefficient
/// `A[r, r + offset(b)]` with offsets `(-nx, -1, 0, +1, +nx)` for the bands
/// `(SOUTH, WEST, CENTER, EAST, NORTH)`.
///
/// Band entries pointing outside the matrix are never emitted. Entries equal to zero
/// are not structural; thus, they are dropped when converting to [CooMatrix].
#[derive(Clone, Debug)]
pub struct Pentadiagonal {
    /// Dimension of the (square) matrix
    n: usize,

    /// Distance between the diagonal and the outer bands
    nx: usize,

    /// Coefficients stored row-by-row and band-by-band
    bands: Vec<[f64; N_BAND]>,
}

impl Pentadiagonal {
    /// Allocates a new (zero) instance
    ///
    /// # Input
    ///
    /// * `n` -- dimension of the square matrix (number of cells)
    /// * `nx` -- offset of the outer bands (number of cells along x)
    pub fn new(n: usize, nx: usize) -> Result<Self, StrError> {
        if n < 1 {
            return Err("matrix dimension must be ≥ 1");
        }
        if nx < 1 {
            return Err("offset of outer bands must be ≥ 1");
        }
        Ok(Pentadiagonal {
            n,
            nx,
            bands: vec![[0.0; N_BAND]; n],
        })
    }

    /// Returns the dimension of the (square) matrix
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Returns the offset of the outer bands
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Returns the column index of band `b` at row `r` or None if outside the matrix
    pub fn column(&self, r: usize, b: usize) -> Option<usize> {
        match b {
            SOUTH => r.checked_sub(self.nx),
            WEST => r.checked_sub(1),
            CENTER => Some(r),
            EAST => Some(r + 1).filter(|c| *c < self.n),
            NORTH => Some(r + self.nx).filter(|c| *c < self.n),
            _ => None,
        }
    }

    /// Sets the coefficient of band `b` at row `r`
    ///
    /// **Note:** Coefficients pointing outside the matrix are kept but never emitted.
    #[inline]
    pub fn set(&mut self, r: usize, b: usize, value: f64) {
        self.bands[r][b] = value;
    }

    /// Returns the coefficient of band `b` at row `r`
    #[inline]
    pub fn band(&self, r: usize, b: usize) -> f64 {
        self.bands[r][b]
    }

    /// Returns the entry `A[i, j]`
    ///
    /// Coincident bands (e.g., WEST and SOUTH when nx = 1) are summed up.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let mut aij = 0.0;
        for b in 0..N_BAND {
            if self.column(i, b) == Some(j) {
                aij += self.bands[i][b];
            }
        }
        aij
    }

    /// Zeroes all coefficients in row `r`, keeping the other rows unchanged
    pub fn zero_row(&mut self, r: usize) {
        self.bands[r] = [0.0; N_BAND];
    }

    /// Returns the sum of the entries of row `r`
    pub fn row_sum(&self, r: usize) -> f64 {
        (0..N_BAND)
            .filter(|b| self.column(r, *b).is_some())
            .fold(0.0, |acc, b| acc + self.bands[r][b])
    }

    /// Returns the number of (non-zero) entries
    pub fn nnz(&self) -> usize {
        let mut count = 0;
        for r in 0..self.n {
            for b in 0..N_BAND {
                if self.bands[r][b] != 0.0 && self.column(r, b).is_some() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Performs the matrix-vector multiplication `v := α · A · u`
    pub fn mat_vec_mul(&self, v: &mut Vector, alpha: f64, u: &Vector) -> Result<(), StrError> {
        if u.dim() != self.n {
            return Err("u vector is incompatible");
        }
        if v.dim() != self.n {
            return Err("v vector is incompatible");
        }
        for r in 0..self.n {
            let mut sum = 0.0;
            for b in 0..N_BAND {
                if let Some(c) = self.column(r, b) {
                    sum += self.bands[r][b] * u[c];
                }
            }
            v[r] = alpha * sum;
        }
        Ok(())
    }

    /// Converts this matrix into a COO sparse matrix, skipping zero entries
    pub fn to_sparse(&self) -> Result<CooMatrix, StrError> {
        let max_nnz = usize::max(self.nnz(), 1);
        let mut mat = CooMatrix::new(self.n, self.n, max_nnz, Sym::No)?;
        for r in 0..self.n {
            for b in 0..N_BAND {
                let value = self.bands[r][b];
                if value == 0.0 {
                    continue;
                }
                if let Some(c) = self.column(r, b) {
                    mat.put(r, c, value)?;
                }
            }
        }
        Ok(mat)
    }

    /// Returns a dense copy of this matrix
    pub fn as_dense(&self) -> Matrix {
        let mut a = Matrix::new(self.n, self.n);
        for r in 0..self.n {
            for b in 0..N_BAND {
                if let Some(c) = self.column(r, b) {
                    a.set(r, c, a.get(r, c) + self.bands[r][b]);
                }
            }
        }
        a
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
