use crate::{default_dirichlet, impose_dirichlet, transmi, DirichletBc, Flux, Grid, Mobility, StrError};
use russell_lab::{Matrix, Vector};
use russell_sparse::{Genie, LinSolver};
use tracing::{debug, warn};

/// Defines the parameters of the pressure solver that can be modified with [PressureSolver::update]
pub enum Param {
    /// (ny, nx) intrinsic permeability; all values must be positive
    K(Matrix),

    /// (ncell) integrated source term
    Q(Vector),

    /// Dirichlet boundary conditions (cell index, pressure)
    Dirichlet(DirichletBc),

    /// Mobility function of the two-phase flow (None means single-phase flow)
    Mobility(Option<Box<dyn Mobility>>),

    /// (ncell) water saturation (None means single-phase flow)
    Saturation(Option<Vector>),

    /// Sparse linear solver
    Genie(Genie),
}

/// Solves the pressure equation using the two-point flux approximation
///
/// The pressure equation `-∇·(λ k ∇p) = q` is discretized with the finite volume method
/// on a structured grid. The total mobility `λ = mw + mo` is computed from the saturation
/// if both the mobility function and the saturation are given; otherwise, `λ = 1`
/// (single-phase flow).
///
/// Each call to [PressureSolver::step] assembles and solves a new linear system and
/// stores the pressure and the face fluxes.
pub struct PressureSolver<'a> {
    /// Holds the grid
    grid: &'a Grid,

    /// Holds the (ny, nx) intrinsic permeability
    k: Matrix,

    /// Holds the (ncell) integrated source term
    q: Vector,

    /// Holds the Dirichlet boundary conditions
    dirichlet: DirichletBc,

    /// Holds the optional mobility function
    mobility: Option<Box<dyn Mobility>>,

    /// Holds the optional (ncell) water saturation
    s: Option<Vector>,

    /// Holds the sparse linear solver kind
    genie: Genie,

    /// Holds the (ny, nx) pressure computed by the last step
    p: Option<Matrix>,

    /// Holds the face fluxes computed by the last step
    v: Option<Flux>,
}

impl<'a> PressureSolver<'a> {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `grid` -- the grid
    /// * `k` -- (ny, nx) intrinsic permeability; all values must be positive
    /// * `q` -- (ncell) integrated source term
    /// * `dirichlet` -- Dirichlet boundary conditions; None means zero pressure at the center cell
    /// * `mobility` -- mobility function (two-phase flow)
    /// * `s` -- (ncell) water saturation (two-phase flow)
    pub fn new(
        grid: &'a Grid,
        k: Matrix,
        q: Vector,
        dirichlet: Option<DirichletBc>,
        mobility: Option<Box<dyn Mobility>>,
        s: Option<Vector>,
    ) -> Result<Self, StrError> {
        let dirichlet = dirichlet.unwrap_or_else(|| default_dirichlet(grid.ncell()));
        check_permeability(grid, &k)?;
        check_sources(grid, &q)?;
        check_dirichlet(grid, &dirichlet)?;
        if let Some(s) = &s {
            check_saturation(grid, s)?;
        }
        Ok(PressureSolver {
            grid,
            k,
            q,
            dirichlet,
            mobility,
            s,
            genie: Genie::Umfpack,
            p: None,
            v: None,
        })
    }

    /// Updates some parameters of the solver
    ///
    /// All parameters are checked first; thus, nothing is modified if any of them is invalid.
    ///
    /// Use this function to update the saturation during a transient two-phase flow simulation, e.g.,
    /// `solver.update(vec![Param::Saturation(Some(s_new))])`.
    pub fn update(&mut self, params: Vec<Param>) -> Result<(), StrError> {
        for param in &params {
            match param {
                Param::K(k) => check_permeability(self.grid, k)?,
                Param::Q(q) => check_sources(self.grid, q)?,
                Param::Dirichlet(dirichlet) => check_dirichlet(self.grid, dirichlet)?,
                Param::Saturation(Some(s)) => check_saturation(self.grid, s)?,
                Param::Saturation(None) | Param::Mobility(..) | Param::Genie(..) => (),
            }
        }
        for param in params {
            match param {
                Param::K(k) => self.k = k,
                Param::Q(q) => self.q = q,
                Param::Dirichlet(dirichlet) => self.dirichlet = dirichlet,
                Param::Mobility(mobility) => self.mobility = mobility,
                Param::Saturation(s) => self.s = s,
                Param::Genie(genie) => self.genie = genie,
            }
        }
        Ok(())
    }

    /// Solves the pressure equation and calculates the face fluxes
    ///
    /// The results are available via [PressureSolver::pressure] and [PressureSolver::flux].
    pub fn step(&mut self) -> Result<(), StrError> {
        let grid = self.grid;
        let (nx, ny) = (grid.nx(), grid.ny());

        // permeability weighted by the total mobility
        let weighted = match (&self.mobility, &self.s) {
            (Some(mobility), Some(s)) => {
                let (mw, mo) = mobility.calc(s)?;
                if mw.dim() != grid.ncell() || mo.dim() != grid.ncell() {
                    return Err("mobility function must return vectors with the same length as the saturation");
                }
                let mut k = self.k.clone();
                for i in 0..ny {
                    for j in 0..nx {
                        let c = grid.index(i, j);
                        let total = mw[c] + mo[c];
                        if total <= 0.0 {
                            return Err("total mobility must be positive");
                        }
                        k.set(i, j, k.get(i, j) * total);
                    }
                }
                Some(k)
            }
            _ => {
                warn!("undefined mobility; solving as single-phase flow");
                None
            }
        };
        let k = weighted.as_ref().unwrap_or(&self.k);

        // linear system
        let (mut mat, tx, ty) = transmi(grid, k)?;
        let mut q = self.q.clone();
        impose_dirichlet(&mut mat, &mut q, &self.dirichlet)?;
        let kk = mat.to_sparse()?;
        debug!(
            "solving pressure system with {} equations and {} non-zeros",
            grid.ncell(),
            mat.nnz()
        );

        // solve
        let mut x = Vector::new(grid.ncell());
        let mut solver = LinSolver::new(self.genie)?;
        solver.actual.factorize(&kk, None)?;
        solver.actual.solve(&mut x, &q, false)?;

        // pressure
        let mut p = Matrix::new(ny, nx);
        for i in 0..ny {
            for j in 0..nx {
                p.set(i, j, x[grid.index(i, j)]);
            }
        }

        // flux
        let v = Flux::from_pressure(grid, &p, &tx, &ty)?;
        self.p = Some(p);
        self.v = Some(v);
        Ok(())
    }

    /// Returns the grid
    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// Returns the (ny, nx) intrinsic permeability
    pub fn permeability(&self) -> &Matrix {
        &self.k
    }

    /// Returns the (ncell) integrated source term
    pub fn sources(&self) -> &Vector {
        &self.q
    }

    /// Returns the Dirichlet boundary conditions
    pub fn dirichlet(&self) -> &DirichletBc {
        &self.dirichlet
    }

    /// Returns the (ncell) water saturation, if any
    pub fn saturation(&self) -> Option<&Vector> {
        self.s.as_ref()
    }

    /// Returns the (ny, nx) pressure computed by the last step, if any
    pub fn pressure(&self) -> Option<&Matrix> {
        self.p.as_ref()
    }

    /// Returns the face fluxes computed by the last step, if any
    pub fn flux(&self) -> Option<&Flux> {
        self.v.as_ref()
    }
}

/// Checks the dimensions and the positiveness of the permeability
fn check_permeability(grid: &Grid, k: &Matrix) -> Result<(), StrError> {
    if k.dims() != (grid.ny(), grid.nx()) {
        return Err("permeability matrix must be (ny, nx)");
    }
    if k.as_data().iter().any(|value| *value <= 0.0 || value.is_nan()) {
        return Err("permeability must be positive (perhaps forgot to exponentiate log-permeability?)");
    }
    Ok(())
}

fn check_sources(grid: &Grid, q: &Vector) -> Result<(), StrError> {
    if q.dim() != grid.ncell() {
        return Err("source vector must have length equal to ncell");
    }
    Ok(())
}

fn check_dirichlet(grid: &Grid, dirichlet: &DirichletBc) -> Result<(), StrError> {
    if dirichlet.iter().any(|(i, _)| *i >= grid.ncell()) {
        return Err("cell index of Dirichlet boundary condition is out-of-bounds");
    }
    Ok(())
}

fn check_saturation(grid: &Grid, s: &Vector) -> Result<(), StrError> {
    if s.dim() != grid.ncell() {
        return Err("saturation vector must have length equal to ncell");
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Param, PressureSolver};
    use crate::{impose_dirichlet, transmi, Grid, ModelConstant, StrError};
    use russell_lab::{approx_eq, Matrix, Vector};
    use russell_sparse::Genie;

    #[test]
    fn new_captures_errors() {
        let grid = Grid::unit(3, 2).unwrap();
        let q = Vector::new(6);
        assert_eq!(
            PressureSolver::new(&grid, Matrix::filled(3, 2, 1.0), q.clone(), None, None, None).err(),
            Some("permeability matrix must be (ny, nx)")
        );
        let mut k = Matrix::filled(2, 3, 1.0);
        k.set(1, 2, -3.0);
        assert_eq!(
            PressureSolver::new(&grid, k, q.clone(), None, None, None).err(),
            Some("permeability must be positive (perhaps forgot to exponentiate log-permeability?)")
        );
        let mut k = Matrix::filled(2, 3, 1.0);
        k.set(0, 0, 0.0);
        assert_eq!(
            PressureSolver::new(&grid, k, q.clone(), None, None, None).err(),
            Some("permeability must be positive (perhaps forgot to exponentiate log-permeability?)")
        );
        let k = Matrix::filled(2, 3, 1.0);
        assert_eq!(
            PressureSolver::new(&grid, k.clone(), Vector::new(5), None, None, None).err(),
            Some("source vector must have length equal to ncell")
        );
        assert_eq!(
            PressureSolver::new(&grid, k.clone(), q.clone(), Some(vec![(6, 0.0)]), None, None).err(),
            Some("cell index of Dirichlet boundary condition is out-of-bounds")
        );
        assert_eq!(
            PressureSolver::new(&grid, k, q, None, None, Some(Vector::new(2))).err(),
            Some("saturation vector must have length equal to ncell")
        );
    }

    #[test]
    fn new_sets_default_dirichlet() {
        let grid = Grid::unit(3, 3).unwrap();
        let solver = PressureSolver::new(&grid, Matrix::filled(3, 3, 1.0), Vector::new(9), None, None, None).unwrap();
        assert_eq!(solver.dirichlet(), &vec![(4, 0.0)]);
        assert!(solver.pressure().is_none());
        assert!(solver.flux().is_none());
        assert!(solver.saturation().is_none());
    }

    #[test]
    fn new_keeps_given_dirichlet() {
        // a non-default list is authoritative (it replaces the center pin)
        let grid = Grid::unit(3, 3).unwrap();
        let bcs = vec![(0, 1.0), (8, -1.0)];
        let solver = PressureSolver::new(
            &grid,
            Matrix::filled(3, 3, 1.0),
            Vector::new(9),
            Some(bcs.clone()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(solver.dirichlet(), &bcs);
    }

    #[test]
    fn update_captures_errors_and_keeps_state() {
        let grid = Grid::unit(2, 2).unwrap();
        let k = Matrix::filled(2, 2, 1.0);
        let mut solver = PressureSolver::new(&grid, k, Vector::new(4), None, None, None).unwrap();
        let res = solver.update(vec![
            Param::Q(Vector::filled(4, 1.0)),
            Param::K(Matrix::filled(2, 2, -1.0)),
        ]);
        assert_eq!(
            res.err(),
            Some("permeability must be positive (perhaps forgot to exponentiate log-permeability?)")
        );
        assert_eq!(solver.sources()[0], 0.0);
        assert_eq!(solver.permeability().get(0, 0), 1.0);
        assert_eq!(
            solver.update(vec![Param::Dirichlet(vec![(4, 0.0)])]).err(),
            Some("cell index of Dirichlet boundary condition is out-of-bounds")
        );
        assert_eq!(
            solver.update(vec![Param::Saturation(Some(Vector::new(3)))]).err(),
            Some("saturation vector must have length equal to ncell")
        );
        assert_eq!(
            solver.update(vec![Param::Q(Vector::new(3))]).err(),
            Some("source vector must have length equal to ncell")
        );
    }

    #[test]
    fn update_works() {
        let grid = Grid::unit(2, 2).unwrap();
        let k = Matrix::filled(2, 2, 1.0);
        let mut solver = PressureSolver::new(&grid, k, Vector::new(4), None, None, None).unwrap();
        let mobility = ModelConstant::new(1.0, 1.0).unwrap();
        solver
            .update(vec![
                Param::K(Matrix::filled(2, 2, 3.0)),
                Param::Q(Vector::filled(4, 2.0)),
                Param::Dirichlet(vec![(0, 5.0)]),
                Param::Mobility(Some(Box::new(mobility))),
                Param::Saturation(Some(Vector::filled(4, 0.5))),
            ])
            .unwrap();
        assert_eq!(solver.permeability().get(1, 1), 3.0);
        assert_eq!(solver.sources()[3], 2.0);
        assert_eq!(solver.dirichlet(), &vec![(0, 5.0)]);
        assert_eq!(solver.saturation().map(|s| s[2]), Some(0.5));
    }

    #[test]
    fn step_uniform_pressure() -> Result<(), StrError> {
        let grid = Grid::new(4, 3, 2.0, 1.5)?;
        let k = Matrix::filled(3, 4, 0.8);
        let mut solver = PressureSolver::new(&grid, k, Vector::new(12), Some(vec![(5, 7.0)]), None, None)?;
        solver.step()?;
        let p = solver.pressure().unwrap();
        assert_eq!(p.dims(), (3, 4));
        for i in 0..3 {
            for j in 0..4 {
                approx_eq(p.get(i, j), 7.0, 1e-12);
            }
        }
        let v = solver.flux().unwrap();
        assert_eq!(v.x.dims(), (3, 5));
        assert_eq!(v.y.dims(), (4, 4));
        for value in v.x.as_data().iter().chain(v.y.as_data().iter()) {
            approx_eq(*value, 0.0, 1e-12);
        }
        Ok(())
    }

    #[test]
    fn step_does_not_modify_inputs() -> Result<(), StrError> {
        let grid = Grid::unit(3, 3)?;
        let mut q = Vector::new(9);
        q[0] = 1.0;
        q[8] = -1.0;
        let mobility = ModelConstant::new(0.5, 0.25)?;
        let mut solver = PressureSolver::new(
            &grid,
            Matrix::filled(3, 3, 2.0),
            q,
            None,
            Some(Box::new(mobility)),
            Some(Vector::new(9)),
        )?;
        solver.step()?;
        // the pinned center cell is not overwritten in the stored source term
        assert_eq!(solver.sources()[4], 0.0);
        assert_eq!(solver.sources()[0], 1.0);
        assert_eq!(solver.permeability().get(1, 1), 2.0);
        approx_eq(solver.pressure().unwrap().get(1, 1), 0.0, 1e-15);
        Ok(())
    }

    #[test]
    fn step_balances_sources() -> Result<(), StrError> {
        // injector at cell 0 and producer pinned at the opposite corner
        let grid = Grid::unit(4, 4)?;
        let mut q = Vector::new(16);
        q[0] = 1.0;
        let mut solver = PressureSolver::new(&grid, Matrix::filled(4, 4, 1.0), q, Some(vec![(15, 0.0)]), None, None)?;
        solver.step()?;
        let out = solver.flux().unwrap().net_outflow(&grid)?;
        approx_eq(out[0], 1.0, 1e-12);
        for c in 1..15 {
            approx_eq(out[c], 0.0, 1e-12);
        }
        approx_eq(out[15], -1.0, 1e-12);
        Ok(())
    }

    #[test]
    fn step_solves_the_assembled_system() -> Result<(), StrError> {
        // heterogeneous permeability and two pins; the pinned rows make the matrix non-symmetric
        let grid = Grid::new(3, 2, 3.0, 1.0)?;
        let k = Matrix::from(&[[1.0, 0.5, 2.0], [4.0, 1.0, 0.25]]);
        let mut q = Vector::new(6);
        q[1] = 1.5;
        q[4] = -0.5;
        let bcs = vec![(0, 1.0), (5, -2.0)];
        let mut solver = PressureSolver::new(&grid, k.clone(), q.clone(), Some(bcs.clone()), None, None)?;
        solver.step()?;
        let p = solver.pressure().unwrap();
        let mut x = Vector::new(6);
        for i in 0..2 {
            for j in 0..3 {
                x[grid.index(i, j)] = p.get(i, j);
            }
        }
        let (mut mat, _, _) = transmi(&grid, &k)?;
        impose_dirichlet(&mut mat, &mut q, &bcs)?;
        let kk = mat.to_sparse()?;
        assert_eq!(kk.get_info().2, mat.nnz());
        let mut ax = Vector::new(6);
        mat.mat_vec_mul(&mut ax, 1.0, &x)?;
        for c in 0..6 {
            approx_eq(ax[c], q[c], 1e-12);
        }
        approx_eq(x[0], 1.0, 1e-15);
        approx_eq(x[5], -2.0, 1e-15);
        Ok(())
    }

    #[test]
    fn mobility_weighting_matches_scaled_permeability() -> Result<(), StrError> {
        let grid = Grid::unit(3, 2)?;
        let k = Matrix::from(&[[1.0, 2.0, 3.0], [0.5, 4.0, 1.5]]);
        let k2 = Matrix::from(&[[2.0, 4.0, 6.0], [1.0, 8.0, 3.0]]);
        let mut q = Vector::new(6);
        q[0] = 1.0;
        q[5] = -0.5;
        let bcs = Some(vec![(2, 0.0)]);
        let mobility = ModelConstant::new(1.0, 1.0)?;
        let s = Vector::filled(6, 0.3);
        let mut two_phase = PressureSolver::new(&grid, k, q.clone(), bcs.clone(), Some(Box::new(mobility)), Some(s))?;
        let mut single = PressureSolver::new(&grid, k2, q, bcs, None, None)?;
        two_phase.step()?;
        single.step()?;
        let (pa, pb) = (two_phase.pressure().unwrap(), single.pressure().unwrap());
        let (va, vb) = (two_phase.flux().unwrap(), single.flux().unwrap());
        for (a, b) in pa.as_data().iter().zip(pb.as_data().iter()) {
            approx_eq(*a, *b, 1e-12);
        }
        for (a, b) in va.x.as_data().iter().zip(vb.x.as_data().iter()) {
            approx_eq(*a, *b, 1e-12);
        }
        for (a, b) in va.y.as_data().iter().zip(vb.y.as_data().iter()) {
            approx_eq(*a, *b, 1e-12);
        }
        Ok(())
    }

    #[test]
    fn klu_gives_same_results() -> Result<(), StrError> {
        let grid = Grid::unit(4, 3)?;
        let k = Matrix::from(&[[1.0, 2.0, 0.5, 1.0], [3.0, 0.2, 1.0, 2.0], [1.0, 1.0, 4.0, 0.7]]);
        let mut q = Vector::new(12);
        q[0] = 2.0;
        q[7] = -1.0;
        let mut solver = PressureSolver::new(&grid, k, q, Some(vec![(11, 0.0)]), None, None)?;
        solver.step()?;
        let umfpack = solver.pressure().unwrap().clone();
        solver.update(vec![Param::Genie(Genie::Klu)])?;
        solver.step()?;
        let klu = solver.pressure().unwrap();
        for (a, b) in umfpack.as_data().iter().zip(klu.as_data().iter()) {
            approx_eq(*a, *b, 1e-12);
        }
        Ok(())
    }

    #[test]
    fn step_captures_zero_total_mobility() -> Result<(), StrError> {
        let grid = Grid::unit(2, 1)?;
        let mobility = ModelConstant::new(0.0, 1.0)?;
        let mut solver = PressureSolver::new(
            &grid,
            Matrix::filled(1, 2, 1.0),
            Vector::new(2),
            None,
            Some(Box::new(mobility)),
            Some(Vector::new(2)),
        )?;
        solver.step()?;
        // a zero total mobility cannot be set with ModelConstant; check with a custom model
        struct Stuck;
        impl crate::Mobility for Stuck {
            fn calc(&self, s: &Vector) -> Result<(Vector, Vector), StrError> {
                Ok((Vector::new(s.dim()), Vector::new(s.dim())))
            }
        }
        solver.update(vec![Param::Mobility(Some(Box::new(Stuck)))])?;
        assert_eq!(solver.step().err(), Some("total mobility must be positive"));
        Ok(())
    }
}
