//! The Nelder-Mead refinement operator.

use crate::algorithm::Algorithm;
use crate::error::Error;
use crate::nm::bounds::clamp_to_bounds;
use crate::nm::config::NmConfig;
use crate::nm::objective::SplicedObjective;
use crate::nm::simplex::SimplexSearch;
use crate::population::Population;
use crate::problem::Problem;

/// Nelder-Mead simplex refinement of a population's best individual.
///
/// [`refine`](NelderMead::refine) takes the best individual, runs a
/// derivative-free simplex search over the continuous part of its
/// decision vector (the trailing integer part is held fixed), clamps
/// the result into the problem's box, and writes it back. Exactly one
/// individual changes; the population size never does.
///
/// # Examples
///
/// ```
/// use u_refine::nm::{NelderMead, NmConfig};
/// use u_refine::population::Population;
/// use u_refine::problem::Problem;
///
/// struct Paraboloid;
///
/// impl Problem for Paraboloid {
///     fn dimension(&self) -> usize {
///         2
///     }
///     fn lower_bounds(&self) -> &[f64] {
///         &[-10.0, -10.0]
///     }
///     fn upper_bounds(&self) -> &[f64] {
///         &[10.0, 10.0]
///     }
///     fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
///         fitness[0] = (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2);
///     }
/// }
///
/// let operator = NelderMead::new(NmConfig::default().with_max_iter(500))?;
/// let mut population = Population::random(Paraboloid, 20, Some(42));
/// operator.refine(&mut population)?;
///
/// let best = &population.individuals()[population.best_index().unwrap()];
/// assert!(best.fitness()[0] < 1e-3);
/// # Ok::<(), u_refine::error::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMead {
    config: NmConfig,
}

impl NelderMead {
    /// Creates the operator with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config.tol` or
    /// `config.step_size` is not a positive number. A constructed
    /// operator never fails validation later.
    pub fn new(config: NmConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this operator was built with.
    pub fn config(&self) -> &NmConfig {
        &self.config
    }

    /// Short operator name.
    pub fn name(&self) -> &'static str {
        "Nelder-Mead simplex"
    }

    /// One-line description of the operator and its parameters.
    pub fn describe(&self) -> String {
        format!(
            "Nelder-Mead simplex (max_iter: {}, tol: {}, step_size: {})",
            self.config.max_iter, self.config.tol, self.config.step_size
        )
    }

    /// Refines the best individual of `population` in place.
    ///
    /// An empty population is left untouched. Otherwise the search
    /// starts from the best individual's decision vector, evaluates
    /// the problem wherever the simplex moves (including outside the
    /// box), and clamps only the final point into the bounds before
    /// writing it back. A search that stalls on non-finite objective
    /// values still writes back the best point reached.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedProblem`] for multi-objective or
    ///   constrained problems, or when the decision vector has no
    ///   continuous part.
    /// - [`Error::OutOfMemory`] if the transient search state cannot
    ///   be allocated.
    ///
    /// On every error path the population is exactly as it was.
    pub fn refine<P: Problem>(&self, population: &mut Population<P>) -> Result<(), Error> {
        let Some(best_index) = population.best_index() else {
            return Ok(());
        };

        let problem = population.problem();
        if problem.fitness_dimension() != 1 {
            return Err(Error::UnsupportedProblem {
                reason: "multi-objective problems are not supported",
            });
        }
        if problem.constraint_dimension() != 0 {
            return Err(Error::UnsupportedProblem {
                reason: "constrained problems are not supported",
            });
        }
        let cont_size = problem.dimension() - problem.integer_dimension();
        if cont_size == 0 {
            return Err(Error::UnsupportedProblem {
                reason: "the problem has no continuous part",
            });
        }

        let mut x = population.individuals()[best_index]
            .decision_vector()
            .to_vec();
        let mut objective = SplicedObjective::new(problem, &x, cont_size);
        let mut value = |v: &[f64]| objective.value(v);
        let search = SimplexSearch::try_new(&mut value, &x[..cont_size], self.config.step_size)?;
        let refined = search.run(&mut value, self.config.max_iter, self.config.tol);

        x[..cont_size].copy_from_slice(&refined);
        clamp_to_bounds(
            &mut x[..cont_size],
            &problem.lower_bounds()[..cont_size],
            &problem.upper_bounds()[..cont_size],
        );
        population.replace_decision_vector(best_index, x)
    }
}

impl Default for NelderMead {
    /// The operator with [`NmConfig::default`], which always
    /// validates.
    fn default() -> Self {
        Self {
            config: NmConfig::default(),
        }
    }
}

impl<P: Problem> Algorithm<P> for NelderMead {
    fn refine(&self, population: &mut Population<P>) -> Result<(), Error> {
        NelderMead::refine(self, population)
    }

    fn name(&self) -> &str {
        NelderMead::name(self)
    }

    fn describe(&self) -> String {
        NelderMead::describe(self)
    }

    fn clone_boxed(&self) -> Box<dyn Algorithm<P>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Separable quadratic with its minimum at `center`.
    #[derive(Clone)]
    struct Quadratic {
        lb: Vec<f64>,
        ub: Vec<f64>,
        center: Vec<f64>,
    }

    impl Quadratic {
        fn new(center: Vec<f64>, half_width: f64) -> Self {
            let dim = center.len();
            Self {
                lb: vec![-half_width; dim],
                ub: vec![half_width; dim],
                center,
            }
        }
    }

    impl Problem for Quadratic {
        fn dimension(&self) -> usize {
            self.center.len()
        }
        fn lower_bounds(&self) -> &[f64] {
            &self.lb
        }
        fn upper_bounds(&self) -> &[f64] {
            &self.ub
        }
        fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
            fitness[0] = x
                .iter()
                .zip(&self.center)
                .map(|(v, c)| (v - c) * (v - c))
                .sum();
        }
    }

    /// Two continuous dimensions with their minimum at 1, plus an
    /// integer tail that contributes `|x_j|` each.
    struct Mixed {
        lb: Vec<f64>,
        ub: Vec<f64>,
        integer: usize,
    }

    impl Mixed {
        fn new(dim: usize, integer: usize) -> Self {
            Self {
                lb: vec![-10.0; dim],
                ub: vec![10.0; dim],
                integer,
            }
        }
    }

    impl Problem for Mixed {
        fn dimension(&self) -> usize {
            self.lb.len()
        }
        fn integer_dimension(&self) -> usize {
            self.integer
        }
        fn lower_bounds(&self) -> &[f64] {
            &self.lb
        }
        fn upper_bounds(&self) -> &[f64] {
            &self.ub
        }
        fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
            let cont = self.lb.len() - self.integer;
            let smooth: f64 = x[..cont].iter().map(|v| (v - 1.0) * (v - 1.0)).sum();
            let tail: f64 = x[cont..].iter().map(|v| v.abs()).sum();
            fitness[0] = smooth + tail;
        }
    }

    struct TwoObjective;

    impl Problem for TwoObjective {
        fn dimension(&self) -> usize {
            2
        }
        fn fitness_dimension(&self) -> usize {
            2
        }
        fn lower_bounds(&self) -> &[f64] {
            &[-1.0, -1.0]
        }
        fn upper_bounds(&self) -> &[f64] {
            &[1.0, 1.0]
        }
        fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
            fitness[0] = x[0];
            fitness[1] = -x[1];
        }
    }

    struct Constrained;

    impl Problem for Constrained {
        fn dimension(&self) -> usize {
            2
        }
        fn constraint_dimension(&self) -> usize {
            1
        }
        fn lower_bounds(&self) -> &[f64] {
            &[-1.0, -1.0]
        }
        fn upper_bounds(&self) -> &[f64] {
            &[1.0, 1.0]
        }
        fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
            fitness[0] = x[0] + x[1];
        }
    }

    struct AllInteger;

    impl Problem for AllInteger {
        fn dimension(&self) -> usize {
            2
        }
        fn integer_dimension(&self) -> usize {
            2
        }
        fn lower_bounds(&self) -> &[f64] {
            &[0.0, 0.0]
        }
        fn upper_bounds(&self) -> &[f64] {
            &[5.0, 5.0]
        }
        fn evaluate(&self, x: &[f64], fitness: &mut [f64]) {
            fitness[0] = x[0] + x[1];
        }
    }

    fn snapshot<P: Problem>(population: &Population<P>) -> Vec<(Vec<f64>, Vec<f64>)> {
        population
            .individuals()
            .iter()
            .map(|ind| (ind.decision_vector().to_vec(), ind.fitness().to_vec()))
            .collect()
    }

    // ---- construction ----

    #[test]
    fn test_new_rejects_non_positive_tol() {
        let err = NelderMead::new(NmConfig::default().with_tol(0.0))
            .expect_err("zero tolerance must be rejected");
        assert_eq!(
            err,
            Error::InvalidConfiguration {
                reason: "tolerance must be a positive number",
            }
        );
    }

    #[test]
    fn test_new_rejects_non_positive_step_size() {
        let err = NelderMead::new(NmConfig::default().with_step_size(-1.0))
            .expect_err("negative step size must be rejected");
        assert_eq!(
            err,
            Error::InvalidConfiguration {
                reason: "initial step size must be a positive number",
            }
        );
    }

    #[test]
    fn test_config_is_kept_verbatim() {
        let config = NmConfig::default().with_max_iter(17).with_tol(1e-3);
        let operator = NelderMead::new(config).expect("valid config");
        assert_eq!(*operator.config(), config);
    }

    // ---- applicability ----

    #[test]
    fn test_empty_population_is_a_noop() {
        let operator = NelderMead::default();
        let mut population = Population::new(Quadratic::new(vec![0.0, 0.0], 5.0));
        operator.refine(&mut population).expect("empty is fine");
        assert!(population.is_empty());

        // The empty check comes before the applicability checks.
        let mut unsupported = Population::new(TwoObjective);
        operator
            .refine(&mut unsupported)
            .expect("empty populations never reach the problem checks");
    }

    #[test]
    fn test_rejects_multi_objective_problems() {
        let operator = NelderMead::default();
        let mut population = Population::new(TwoObjective);
        population.push(vec![0.5, 0.5]);
        let before = snapshot(&population);

        let err = operator
            .refine(&mut population)
            .expect_err("two objectives must be rejected");
        assert_eq!(
            err,
            Error::UnsupportedProblem {
                reason: "multi-objective problems are not supported",
            }
        );
        assert_eq!(snapshot(&population), before);
    }

    #[test]
    fn test_rejects_constrained_problems() {
        let operator = NelderMead::default();
        let mut population = Population::new(Constrained);
        population.push(vec![0.0, 0.0]);
        let before = snapshot(&population);

        let err = operator
            .refine(&mut population)
            .expect_err("constraints must be rejected");
        assert_eq!(
            err,
            Error::UnsupportedProblem {
                reason: "constrained problems are not supported",
            }
        );
        assert_eq!(snapshot(&population), before);
    }

    #[test]
    fn test_rejects_problems_without_a_continuous_part() {
        let operator = NelderMead::default();
        let mut population = Population::new(AllInteger);
        population.push(vec![1.0, 2.0]);
        let before = snapshot(&population);

        let err = operator
            .refine(&mut population)
            .expect_err("a purely integer problem must be rejected");
        assert_eq!(
            err,
            Error::UnsupportedProblem {
                reason: "the problem has no continuous part",
            }
        );
        assert_eq!(snapshot(&population), before);
    }

    // ---- refinement ----

    #[test]
    fn test_refines_the_quadratic_to_its_center() {
        let operator = NelderMead::new(
            NmConfig::default()
                .with_max_iter(200)
                .with_tol(1e-6)
                .with_step_size(1.0),
        )
        .expect("valid config");
        let mut population = Population::new(Quadratic::new(vec![3.0, -1.0], 10.0));
        population.push(vec![0.0, 0.0]);
        let before = population.individuals()[0].fitness()[0];

        operator.refine(&mut population).expect("refine succeeds");

        let best = &population.individuals()[0];
        assert!(best.fitness()[0] <= before, "fitness degraded");
        assert!(best.fitness()[0] < 1e-3, "fitness: {}", best.fitness()[0]);
        assert!(
            (best.decision_vector()[0] - 3.0).abs() < 1e-2,
            "x: {}",
            best.decision_vector()[0]
        );
        assert!(
            (best.decision_vector()[1] + 1.0).abs() < 1e-2,
            "y: {}",
            best.decision_vector()[1]
        );
    }

    #[test]
    fn test_result_is_clamped_into_the_box() {
        // Unconstrained minimum at (3, -1), box only reaching 2: the
        // refined point lands exactly on the boundary.
        let operator = NelderMead::new(NmConfig::default().with_max_iter(200))
            .expect("valid config");
        let mut population = Population::new(Quadratic::new(vec![3.0, -1.0], 2.0));
        population.push(vec![0.0, 0.0]);

        operator.refine(&mut population).expect("refine succeeds");

        let best = &population.individuals()[0];
        assert_eq!(best.decision_vector()[0], 2.0);
        assert!(
            (best.decision_vector()[1] + 1.0).abs() < 1e-2,
            "y: {}",
            best.decision_vector()[1]
        );
        assert!(
            (best.fitness()[0] - 1.0).abs() < 1e-2,
            "fitness: {}",
            best.fitness()[0]
        );
    }

    #[test]
    fn test_only_the_best_individual_changes() {
        let operator = NelderMead::default();
        let mut population = Population::new(Quadratic::new(vec![3.0, -1.0], 10.0));
        population.push(vec![-5.0, 5.0]);
        population.push(vec![2.0, 0.0]);
        population.push(vec![7.0, 7.0]);
        let before = snapshot(&population);
        assert_eq!(population.best_index(), Some(1));

        operator.refine(&mut population).expect("refine succeeds");

        assert_eq!(population.len(), 3);
        assert_eq!(snapshot(&population)[0], before[0]);
        assert_eq!(snapshot(&population)[2], before[2]);
        assert!(population.individuals()[1].fitness()[0] <= before[1].1[0]);
    }

    #[test]
    fn test_integer_tail_is_untouched() {
        let operator = NelderMead::new(NmConfig::default().with_max_iter(300))
            .expect("valid config");
        let mut population = Population::new(Mixed::new(4, 2));
        population.push(vec![0.0, 0.0, 2.0, -3.0]);

        operator.refine(&mut population).expect("refine succeeds");

        let best = &population.individuals()[0];
        assert_eq!(best.decision_vector()[2].to_bits(), 2.0f64.to_bits());
        assert_eq!(best.decision_vector()[3].to_bits(), (-3.0f64).to_bits());
        assert!(
            (best.decision_vector()[0] - 1.0).abs() < 1e-2,
            "x0: {}",
            best.decision_vector()[0]
        );
        assert!(
            (best.decision_vector()[1] - 1.0).abs() < 1e-2,
            "x1: {}",
            best.decision_vector()[1]
        );
        // The tail still counts toward fitness: 0 + 0 + |2| + |-3|.
        assert!((best.fitness()[0] - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_refining_twice_is_stable() {
        let operator = NelderMead::new(NmConfig::default().with_max_iter(200))
            .expect("valid config");
        let mut population = Population::new(Quadratic::new(vec![3.0, -1.0], 10.0));
        population.push(vec![0.0, 0.0]);

        operator.refine(&mut population).expect("first refine");
        let first = population.individuals()[0].decision_vector().to_vec();
        operator.refine(&mut population).expect("second refine");
        let second = population.individuals()[0].decision_vector().to_vec();

        for (i, (a, b)) in first.iter().zip(&second).enumerate() {
            assert!(
                (a - b).abs() < 1e-3,
                "component {} drifted from {} to {}",
                i,
                a,
                b
            );
        }
    }

    #[test]
    fn test_zero_iterations_still_pick_the_best_initial_vertex() {
        let operator =
            NelderMead::new(NmConfig::default().with_max_iter(0)).expect("valid config");
        let mut population = Population::new(Quadratic::new(vec![3.0, -1.0], 10.0));
        population.push(vec![0.0, 0.0]);

        operator.refine(&mut population).expect("refine succeeds");

        // No transformation ran, but the initial simplex was built and
        // evaluated: its vertices are (0,0) -> 10, (1,0) -> 5 and
        // (0,1) -> 13, so the step along dimension 0 wins.
        assert_eq!(population.individuals()[0].decision_vector(), &[1.0, 0.0]);
        assert_eq!(population.individuals()[0].fitness()[0], 5.0);
    }

    // ---- trait object plumbing ----

    #[test]
    fn test_name_and_describe() {
        let operator = NelderMead::new(NmConfig::default().with_max_iter(250))
            .expect("valid config");
        assert_eq!(operator.name(), "Nelder-Mead simplex");
        let description = operator.describe();
        assert!(description.contains("max_iter: 250"), "{}", description);
        assert!(description.contains("step_size: 1"), "{}", description);
    }

    #[test]
    fn test_boxed_operator_clones_and_refines() {
        let boxed: Box<dyn Algorithm<Quadratic>> =
            Box::new(NelderMead::new(NmConfig::default().with_max_iter(300)).expect("valid"));
        let copy = boxed.clone();
        assert_eq!(copy.describe(), boxed.describe());
        assert_eq!(copy.name(), "Nelder-Mead simplex");

        let mut population = Population::new(Quadratic::new(vec![3.0, -1.0], 10.0));
        population.push(vec![0.0, 0.0]);
        copy.refine(&mut population).expect("refine succeeds");
        assert!(population.individuals()[0].fitness()[0] < 1e-2);
    }

    #[test]
    fn test_threads_refine_their_own_populations() {
        let operator = NelderMead::default();
        std::thread::scope(|scope| {
            for seed in [1u64, 2] {
                let operator = &operator;
                scope.spawn(move || {
                    let mut population =
                        Population::random(Quadratic::new(vec![3.0, -1.0], 10.0), 10, Some(seed));
                    let best = population.best_index().expect("population is non-empty");
                    let before = population.individuals()[best].fitness()[0];
                    operator.refine(&mut population).expect("refine succeeds");
                    let best = population.best_index().expect("population is non-empty");
                    assert!(population.individuals()[best].fitness()[0] <= before);
                });
            }
        });
    }
}
