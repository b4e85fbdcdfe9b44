use crate::{Pentadiagonal, StrError, CENTER};
use russell_lab::Vector;

/// Defines a list of Dirichlet boundary conditions as (cell index, prescribed value) pairs
pub type DirichletBc = Vec<(usize, f64)>;

/// Returns the default Dirichlet boundary condition (zero value at the center cell)
pub fn default_dirichlet(ncell: usize) -> DirichletBc {
    vec![(ncell / 2, 0.0)]
}

/// Imposes Dirichlet boundary conditions on the linear system `A · p = q`
///
/// For each pair `(i, value)`, the whole row `i` of `A` is replaced by the
/// corresponding row of the identity matrix and `q[i]` is set to `value`;
/// thus, the solution satisfies `p[i] = value`. The other rows are not modified.
///
/// For example, to impose the value 99 at the first cell:
///
/// ```text
/// mat = ┌                 ┐      q = ┌    ┐
///       │  1   0   ···  0 │          │ 99 │
///       │ a21 a22  ··· a2n│          │ q2 │
///       │  ⋮   ⋮        ⋮ │          │ ⋮  │
///       │ an1 an2  ··· ann│          │ qn │
///       └                 ┘          └    ┘
/// ```
///
/// The pairs are applied in order; hence, if a cell is repeated, the last value wins.
/// The zeroed entries are not structural and are dropped by [Pentadiagonal::to_sparse].
///
/// **Note:** This is an in-place operation on `mat` and `q`.
pub fn impose_dirichlet(mat: &mut Pentadiagonal, q: &mut Vector, bcs: &[(usize, f64)]) -> Result<(), StrError> {
    let n = mat.dim();
    if q.dim() != n {
        return Err("the right-hand side vector is incompatible with the matrix");
    }
    if bcs.iter().any(|(i, _)| *i >= n) {
        return Err("cell index of Dirichlet boundary condition is out-of-bounds");
    }
    for (i, value) in bcs {
        mat.zero_row(*i);
        mat.set(*i, CENTER, 1.0);
        q[*i] = *value;
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
