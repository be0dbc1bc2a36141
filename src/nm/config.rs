//! Nelder-Mead configuration.

use crate::error::Error;

/// Configuration for the Nelder-Mead simplex operator.
///
/// # Examples
///
/// ```
/// use u_refine::nm::NmConfig;
///
/// let config = NmConfig::default()
///     .with_max_iter(500)
///     .with_tol(1e-8)
///     .with_step_size(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NmConfig {
    /// Maximum number of simplex transformations per refinement
    /// (default: 100). Zero evaluates nothing beyond the initial
    /// simplex and returns its best vertex.
    pub max_iter: usize,

    /// Convergence tolerance on the simplex size (default: 1e-6).
    /// Must be a positive number.
    pub tol: f64,

    /// Step along each continuous dimension when building the initial
    /// simplex (default: 1.0). Must be a positive number.
    pub step_size: f64,
}

impl Default for NmConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-6,
            step_size: 1.0,
        }
    }
}

impl NmConfig {
    /// Sets the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the initial simplex step size.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `tol` or `step_size`
    /// is zero, negative, or NaN.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tol.is_nan() || self.tol <= 0.0 {
            return Err(Error::InvalidConfiguration {
                reason: "tolerance must be a positive number",
            });
        }
        if self.step_size.is_nan() || self.step_size <= 0.0 {
            return Err(Error::InvalidConfiguration {
                reason: "initial step size must be a positive number",
            });
        }
        Ok(())
    }
}
