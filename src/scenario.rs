use crate::{DirichletBc, Grid, Mobility, ModelConstant, ModelQuadratic, PressureSolver, StrError};
use russell_lab::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Defines how the permeability field is given
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Permeability {
    /// Same value in all cells
    Uniform(f64),

    /// Values given row-by-row; i.e., ny rows with nx values each
    Field(Vec<Vec<f64>>),

    /// Natural logarithm of the values given row-by-row
    LogField(Vec<Vec<f64>>),
}

/// Defines the mobility model of a two-phase flow
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum MobilityModel {
    Quadratic(ModelQuadratic),
    Constant(ModelConstant),
}

/// Holds the input data of a pressure simulation
///
/// Unknown fields are rejected when reading JSON files.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Number of cells along x
    pub nx: usize,

    /// Number of cells along y
    pub ny: usize,

    /// Physical length along x
    #[serde(default = "unit_length")]
    pub lx: f64,

    /// Physical length along y
    #[serde(default = "unit_length")]
    pub ly: f64,

    /// Permeability field
    pub permeability: Permeability,

    /// Integrated sources (cell index, value); repeated cells are summed up
    #[serde(default)]
    pub sources: Vec<(usize, f64)>,

    /// Dirichlet boundary conditions (cell index, pressure); None means zero pressure at the center cell
    #[serde(default)]
    pub dirichlet: Option<DirichletBc>,

    /// Mobility model (two-phase flow)
    #[serde(default)]
    pub mobility: Option<MobilityModel>,

    /// Uniform water saturation (two-phase flow)
    #[serde(default)]
    pub saturation: Option<f64>,
}

fn unit_length() -> f64 {
    1.0
}

impl MobilityModel {
    /// Returns the validated mobility function
    pub fn boxed(&self) -> Result<Box<dyn Mobility>, StrError> {
        match self {
            MobilityModel::Quadratic(model) => {
                model.validate()?;
                Ok(Box::new(*model))
            }
            MobilityModel::Constant(model) => {
                model.validate()?;
                Ok(Box::new(*model))
            }
        }
    }
}

impl Scenario {
    /// Reads a JSON file containing the scenario
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let file = File::open(Path::new(full_path)).map_err(|_| "cannot open scenario file")?;
        serde_json::from_reader(BufReader::new(file)).map_err(|_| "cannot parse scenario file")
    }

    /// Allocates the grid
    pub fn grid(&self) -> Result<Grid, StrError> {
        Grid::new(self.nx, self.ny, self.lx, self.ly)
    }

    /// Returns the (ny, nx) permeability matrix
    pub fn permeability_matrix(&self, grid: &Grid) -> Result<Matrix, StrError> {
        let (nx, ny) = (grid.nx(), grid.ny());
        let (rows, log) = match &self.permeability {
            Permeability::Uniform(value) => return Ok(Matrix::filled(ny, nx, *value)),
            Permeability::Field(rows) => (rows, false),
            Permeability::LogField(rows) => (rows, true),
        };
        if rows.len() != ny || rows.iter().any(|row| row.len() != nx) {
            return Err("permeability field must have ny rows with nx values each");
        }
        let mut k = Matrix::new(ny, nx);
        for i in 0..ny {
            for j in 0..nx {
                let value = rows[i][j];
                k.set(i, j, if log { f64::exp(value) } else { value });
            }
        }
        Ok(k)
    }

    /// Returns the (ncell) source vector
    pub fn source_vector(&self, grid: &Grid) -> Result<Vector, StrError> {
        let mut q = Vector::new(grid.ncell());
        for (cell, value) in &self.sources {
            if *cell >= grid.ncell() {
                return Err("cell index of source is out-of-bounds");
            }
            q[*cell] += *value;
        }
        Ok(q)
    }

    /// Allocates the pressure solver
    pub fn solver<'a>(&self, grid: &'a Grid) -> Result<PressureSolver<'a>, StrError> {
        let k = self.permeability_matrix(grid)?;
        let q = self.source_vector(grid)?;
        let mobility = match &self.mobility {
            Some(model) => Some(model.boxed()?),
            None => None,
        };
        let s = self.saturation.map(|value| Vector::filled(grid.ncell(), value));
        PressureSolver::new(grid, k, q, self.dirichlet.clone(), mobility, s)
    }
}

/// Holds the results of a pressure simulation
#[derive(Serialize)]
pub struct PressureResults {
    /// Grid
    pub grid: Grid,

    /// Pressure given row-by-row (ny rows with nx values each)
    pub pressure: Vec<Vec<f64>>,

    /// Fluxes across the faces normal to x (ny rows with nx+1 values each)
    pub flux_x: Vec<Vec<f64>>,

    /// Fluxes across the faces normal to y (ny+1 rows with nx values each)
    pub flux_y: Vec<Vec<f64>>,
}

impl PressureResults {
    /// Collects the results of the last step of the solver
    pub fn new(solver: &PressureSolver) -> Result<Self, StrError> {
        let p = solver.pressure().ok_or("the pressure solver has not been run yet")?;
        let v = solver.flux().ok_or("the pressure solver has not been run yet")?;
        Ok(PressureResults {
            grid: solver.grid().clone(),
            pressure: to_rows(p),
            flux_x: to_rows(&v.x),
            flux_y: to_rows(&v.y),
        })
    }

    /// Writes a JSON file with the results
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|_| "cannot create directory of results file")?;
        }
        let file = File::create(path).map_err(|_| "cannot create results file")?;
        serde_json::to_writer_pretty(file, self).map_err(|_| "cannot write results file")
    }
}

fn to_rows(a: &Matrix) -> Vec<Vec<f64>> {
    let (m, n) = a.dims();
    (0..m).map(|i| (0..n).map(|j| a.get(i, j)).collect()).collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
