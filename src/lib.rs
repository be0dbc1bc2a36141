//! Local-search refinement for population-based optimization.
//!
//! The crate provides a pluggable refinement operator together with
//! the contracts it consumes:
//!
//! - **[`problem::Problem`]**: a box-bounded optimization problem with
//!   an optional trailing integer part in its decision vectors.
//! - **[`population::Population`]**: a set of evaluated candidate
//!   solutions that re-evaluates whatever it mutates.
//! - **[`nm::NelderMead`]**: derivative-free Nelder-Mead simplex
//!   refinement of the best individual over the continuous part of its
//!   decision vector, with the result clamped into the problem's box.
//!
//! A surrounding framework (an evolutionary loop, an island model, a
//! portfolio of operators) drives refinement through the
//! [`algorithm::Algorithm`] trait, which is object safe and cloneable
//! so operators can be stored, swapped, and dispatched dynamically.
//!
//! # Architecture
//!
//! The crate is deliberately domain-agnostic: nothing in it knows what
//! a decision vector means. Consumers define that by implementing
//! [`problem::Problem`]. Operators never grow the population, never
//! touch more than the individual they refine, and keep all transient
//! search state local to one call, so separate populations can be
//! refined from separate threads with one shared operator.
//!
//! # Examples
//!
//! ```
//! use u_refine::nm::{NelderMead, NmConfig};
//! use u_refine::population::Population;
//! use u_refine::problem::Problem;
//!
//! /// Minimize (x - 3)^2 + (y + 1)^2 over [-10, 10]^2.
//! struct Paraboloid;
//!
//! impl Problem for Paraboloid {
//!     fn dimension(&self) -> usize {
//!         2
//!     }
//!     fn lower_bounds(&self) -> &[f64] {
//!         &[-10.0, -10.0]
//!     }
//!     fn upper_bounds(&self) -> &[f64] {
//!         &[10.0, 10.0]
//!     }
//!     fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
//!         fitness[0] = (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2);
//!     }
//! }
//!
//! let mut population = Population::random(Paraboloid, 20, Some(7));
//! let operator = NelderMead::new(NmConfig::default().with_max_iter(500))?;
//! operator.refine(&mut population)?;
//!
//! let best = &population.individuals()[population.best_index().unwrap()];
//! assert!(best.fitness()[0] < 1e-3);
//! # Ok::<(), u_refine::error::Error>(())
//! ```
//!
//! # Feature flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`nm::NmConfig`] and
//!   [`population::Individual`].

pub mod algorithm;
pub mod error;
pub mod nm;
pub mod population;
pub mod problem;
