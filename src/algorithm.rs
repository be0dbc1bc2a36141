//! The contract between refinement operators and the frameworks that
//! drive them.

use crate::error::Error;
use crate::population::Population;
use crate::problem::Problem;

/// A refinement operator a surrounding framework can dispatch over.
///
/// Operators are stateless between calls: configuration is fixed at
/// construction, and all transient search state lives inside a single
/// [`refine`](Algorithm::refine) invocation. The exclusive borrow of
/// the population is the concurrency contract: one population can only
/// be refined by one operator at a time, while distinct populations may
/// be refined concurrently from separate threads.
///
/// # Examples
///
/// ```ignore
/// let operators: Vec<Box<dyn Algorithm<MyProblem>>> = vec![
///     Box::new(NelderMead::default()),
/// ];
/// for operator in &operators {
///     operator.refine(&mut population)?;
/// }
/// ```
pub trait Algorithm<P: Problem>: Send + Sync {
    /// Refines `population` in place.
    fn refine(&self, population: &mut Population<P>) -> Result<(), Error>;

    /// Short operator name.
    fn name(&self) -> &str;

    /// One-line description of the operator and its parameters.
    fn describe(&self) -> String;

    /// An independent copy with identical configuration.
    fn clone_boxed(&self) -> Box<dyn Algorithm<P>>;
}

impl<P: Problem> Clone for Box<dyn Algorithm<P>> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}
