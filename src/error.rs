//! Error taxonomy shared by the crate.

use thiserror::Error;

/// Errors surfaced by populations and refinement operators.
///
/// Configuration problems are rejected at construction time and never
/// later; applicability problems are rejected at the start of a
/// refinement, before any allocation or mutation, so a failed call
/// always leaves the population exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Operator parameters rejected at construction time.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Which parameter was rejected and why.
        reason: &'static str,
    },

    /// The population's problem cannot be handled by this operator.
    #[error("unsupported problem: {reason}")]
    UnsupportedProblem {
        /// Which applicability check failed.
        reason: &'static str,
    },

    /// Transient search-state allocation failed.
    ///
    /// Buffers acquired before the failure have already been released
    /// when this error is returned.
    #[error("out of memory while allocating search state")]
    OutOfMemory,

    /// An individual index outside the population was addressed.
    #[error("invalid individual index {index} for population of size {size}")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// Population size at the time of the call.
        size: usize,
    },
}
