//! Adapter from a continuous search vector to a scalar objective.

use crate::problem::Problem;

/// Splices a continuous search vector into a full decision vector and
/// evaluates the problem on it.
///
/// The working decision vector is seeded once from the individual
/// being refined; every [`value`](SplicedObjective::value) call
/// overwrites only the continuous prefix, so the trailing integer part
/// stays fixed for the whole search and no allocation happens per
/// call.
pub(crate) struct SplicedObjective<'a, P: Problem> {
    problem: &'a P,
    x: Vec<f64>,
    fitness: Vec<f64>,
    cont_size: usize,
}

impl<'a, P: Problem> SplicedObjective<'a, P> {
    /// Builds the adapter around the decision vector of the individual
    /// being refined; `cont_size` is the length of its continuous
    /// prefix.
    pub(crate) fn new(problem: &'a P, decision_vector: &[f64], cont_size: usize) -> Self {
        debug_assert!(cont_size <= decision_vector.len());
        Self {
            problem,
            x: decision_vector.to_vec(),
            fitness: vec![0.0; problem.fitness_dimension()],
            cont_size,
        }
    }

    /// Evaluates the objective at the continuous point `v`.
    pub(crate) fn value(&mut self, v: &[f64]) -> f64 {
        self.x[..self.cont_size].copy_from_slice(v);
        self.problem.evaluate(&self.x, &mut self.fitness);
        self.fitness[0]
    }
}
