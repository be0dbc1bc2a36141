//! The problem contract consumed by populations and operators.

use std::cmp::Ordering;

/// Defines a box-bounded optimization problem.
///
/// A decision vector of length [`dimension`](Problem::dimension) is
/// logically partitioned into a continuous prefix and a trailing
/// integer part of length [`integer_dimension`](Problem::integer_dimension);
/// the integer part stores integral values as `f64`. Operators that
/// only search the continuous part hold the integer part fixed.
///
/// Lower fitness is better. For maximization, negate the objective.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` and [`evaluate`](Problem::evaluate)
/// must be safe to call concurrently, so that independent refinements
/// can run on separate populations in parallel.
///
/// # Examples
///
/// ```ignore
/// struct Sphere {
///     lb: Vec<f64>,
///     ub: Vec<f64>,
/// }
///
/// impl Problem for Sphere {
///     fn dimension(&self) -> usize {
///         self.lb.len()
///     }
///     fn lower_bounds(&self) -> &[f64] {
///         &self.lb
///     }
///     fn upper_bounds(&self) -> &[f64] {
///         &self.ub
///     }
///     fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
///         fitness[0] = x.iter().map(|v| v * v).sum();
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Total length of a decision vector.
    fn dimension(&self) -> usize;

    /// Length of the trailing integer part of a decision vector.
    ///
    /// Defaults to `0` (purely continuous problem). Must not exceed
    /// [`dimension`](Problem::dimension).
    fn integer_dimension(&self) -> usize {
        0
    }

    /// Number of objective components in a fitness vector.
    ///
    /// Defaults to `1` (single-objective).
    fn fitness_dimension(&self) -> usize {
        1
    }

    /// Number of constraint components.
    ///
    /// Defaults to `0` (unconstrained).
    fn constraint_dimension(&self) -> usize {
        0
    }

    /// Per-dimension lower bounds, of length [`dimension`](Problem::dimension).
    fn lower_bounds(&self) -> &[f64];

    /// Per-dimension upper bounds, of length [`dimension`](Problem::dimension).
    fn upper_bounds(&self) -> &[f64];

    /// Evaluates the decision vector `x`, writing the objective values
    /// into `fitness` (length [`fitness_dimension`](Problem::fitness_dimension)).
    ///
    /// Must behave as a pure function of `x`: callers may invoke it
    /// any number of times, in any order, from any thread.
    fn evaluate(&self, x: &[f64], fitness: &mut [f64]);

    /// Problem-defined fitness ordering; `Less` means `a` is better.
    ///
    /// The default compares the first objective component and ranks
    /// NaN worse than any number.
    fn compare_fitness(&self, a: &[f64], b: &[f64]) -> Ordering {
        match (a[0].is_nan(), b[0].is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a[0].partial_cmp(&b[0]).unwrap_or(Ordering::Equal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat;

    impl Problem for Flat {
        fn dimension(&self) -> usize {
            1
        }
        fn lower_bounds(&self) -> &[f64] {
            &[0.0]
        }
        fn upper_bounds(&self) -> &[f64] {
            &[1.0]
        }
        fn evaluate(&self, _x: &[f64], fitness: &mut [f64]) {
            fitness[0] = 0.0;
        }
    }

    #[test]
    fn test_default_dimensions() {
        let p = Flat;
        assert_eq!(p.integer_dimension(), 0);
        assert_eq!(p.fitness_dimension(), 1);
        assert_eq!(p.constraint_dimension(), 0);
    }

    #[test]
    fn test_compare_fitness_lower_is_better() {
        let p = Flat;
        assert_eq!(p.compare_fitness(&[1.0], &[2.0]), Ordering::Less);
        assert_eq!(p.compare_fitness(&[2.0], &[1.0]), Ordering::Greater);
        assert_eq!(p.compare_fitness(&[1.5], &[1.5]), Ordering::Equal);
    }

    #[test]
    fn test_compare_fitness_nan_ranks_worst() {
        let p = Flat;
        assert_eq!(p.compare_fitness(&[f64::NAN], &[1e300]), Ordering::Greater);
        assert_eq!(p.compare_fitness(&[-1e300], &[f64::NAN]), Ordering::Less);
        assert_eq!(p.compare_fitness(&[f64::NAN], &[f64::NAN]), Ordering::Equal);
    }
}
