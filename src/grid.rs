use crate::StrError;
use serde::Serialize;

/// Holds the geometry of a rectangular grid of `nx × ny` cells
///
/// Cells are numbered row-major, i.e., `index = i * nx + j` where `i` is the row
/// (along y) and `j` is the column (along x).
///
/// ```text
///  y
///  ↑  ┌─────┬─────┬─────┐
///  │  │  3  │  4  │  5  │  ly
///  │  ├─────┼─────┼─────┤
///  │  │  0  │  1  │  2  │
///  │  └─────┴─────┴─────┘
///  └────────── lx ──────→ x
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    /// Number of cells along x
    nx: usize,

    /// Number of cells along y
    ny: usize,

    /// Physical length along x
    lx: f64,

    /// Physical length along y
    ly: f64,

    /// Cell length along x
    dx: f64,

    /// Cell length along y
    dy: f64,

    /// Cell volume (area in 2D)
    vol: f64,

    /// Total number of cells
    ncell: usize,
}

impl Grid {
    /// Allocates a new instance
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Result<Self, StrError> {
        if nx < 1 || ny < 1 {
            return Err("grid resolution must be ≥ 1 along x and y");
        }
        if lx <= 0.0 || ly <= 0.0 {
            return Err("grid dimensions must be > 0.0");
        }
        let dx = lx / (nx as f64);
        let dy = ly / (ny as f64);
        Ok(Grid {
            nx,
            ny,
            lx,
            ly,
            dx,
            dy,
            vol: dx * dy,
            ncell: nx * ny,
        })
    }

    /// Allocates a new instance covering the unit square
    pub fn unit(nx: usize, ny: usize) -> Result<Self, StrError> {
        Grid::new(nx, ny, 1.0, 1.0)
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn lx(&self) -> f64 {
        self.lx
    }

    #[inline]
    pub fn ly(&self) -> f64 {
        self.ly
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    #[inline]
    pub fn vol(&self) -> f64 {
        self.vol
    }

    #[inline]
    pub fn ncell(&self) -> usize {
        self.ncell
    }

    /// Returns the cell index corresponding to row `i` and column `j`
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.nx + j
    }

    /// Returns the (row, column) pair of a cell index
    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.nx, index % self.nx)
    }

    /// Returns the index of the cell at the "center" of the grid (ncell / 2)
    #[inline]
    pub fn center_cell(&self) -> usize {
        self.ncell / 2
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
