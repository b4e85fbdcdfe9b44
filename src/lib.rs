//! Two-point flux approximation (TPFA) pressure solver for porous media flow
//!
//! The pressure equation of single- or two-phase (water/oil) flow is discretized with
//! the finite volume method on a structured rectangular grid. The main structure is
//! [PressureSolver]; the building blocks [transmi], [impose_dirichlet], and [convecti]
//! are also available for saturation transport drivers.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

mod convection;
mod dirichlet;
mod flux;
mod grid;
mod mobility;
mod pentadiagonal;
mod pressure_solver;
mod scenario;
mod transmissibility;
pub use crate::convection::*;
pub use crate::dirichlet::*;
pub use crate::flux::*;
pub use crate::grid::*;
pub use crate::mobility::*;
pub use crate::pentadiagonal::*;
pub use crate::pressure_solver::*;
pub use crate::scenario::*;
pub use crate::transmissibility::*;
