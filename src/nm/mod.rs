//! Nelder-Mead simplex local search (NM).
//!
//! A derivative-free refinement operator: it walks a simplex of
//! `n + 1` vertices through the continuous part of the best
//! individual's decision vector by reflecting, expanding, contracting,
//! and shrinking it, until the simplex collapses below a size
//! tolerance or the iteration budget runs out. No gradients are
//! needed, only objective values, which makes it a good polishing
//! stage after a global method has found a promising basin.
//!
//! The operator searches without bound constraints and clamps the
//! final point into the problem's box, so it is best suited to
//! problems whose optimum is not glued to the boundary.
//!
//! # References
//!
//! - Nelder & Mead (1965), "A Simplex Method for Function
//!   Minimization"
//! - Lagarias et al. (1998), "Convergence Properties of the
//!   Nelder-Mead Simplex Method in Low Dimensions"

mod bounds;
mod config;
mod objective;
mod runner;
mod simplex;

pub use config::NmConfig;
pub use runner::NelderMead;
