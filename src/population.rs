//! Individuals and the population container operators refine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Error;
use crate::problem::Problem;

/// A candidate solution paired with its fitness.
///
/// The pairing is an invariant: individuals are only created and
/// mutated through [`Population`], which evaluates the problem as a
/// side effect, so a fitness vector can never go stale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    x: Vec<f64>,
    fitness: Vec<f64>,
}

impl Individual {
    /// The current decision vector.
    pub fn decision_vector(&self) -> &[f64] {
        &self.x
    }

    /// The fitness of the current decision vector.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }
}

/// A set of candidate solutions for one problem instance.
///
/// The population owns its problem and re-evaluates any individual it
/// mutates. Refinement operators receive `&mut Population`, so two
/// operators can never work on the same population at the same time;
/// separate populations are independent and can be refined from
/// separate threads.
#[derive(Debug, Clone)]
pub struct Population<P: Problem> {
    problem: P,
    individuals: Vec<Individual>,
}

impl<P: Problem> Population<P> {
    /// Creates an empty population.
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            individuals: Vec::new(),
        }
    }

    /// Creates a population of `size` uniform random individuals
    /// within the problem's bounds.
    ///
    /// Continuous dimensions are drawn uniformly from `[lb, ub]`;
    /// integer dimensions are drawn as whole numbers from the same
    /// interval. Pass a seed for reproducible populations.
    ///
    /// # Panics
    ///
    /// Panics if the bounds have the wrong length, cross (`lb > ub`
    /// in some dimension), or leave an integer dimension with no
    /// whole number to draw.
    pub fn random(problem: P, size: usize, seed: Option<u64>) -> Self {
        let dim = problem.dimension();
        let int_start = dim - problem.integer_dimension();
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut vectors: Vec<Vec<f64>> = Vec::with_capacity(size);
        {
            let lb = problem.lower_bounds();
            let ub = problem.upper_bounds();
            assert_eq!(lb.len(), dim, "lower bounds length must match dimension");
            assert_eq!(ub.len(), dim, "upper bounds length must match dimension");
            assert!(
                lb.iter().zip(ub).all(|(lo, hi)| lo <= hi),
                "lower bound above upper bound"
            );

            for _ in 0..size {
                let x = (0..dim)
                    .map(|i| {
                        if i >= int_start {
                            let lo = lb[i].ceil() as i64;
                            let hi = ub[i].floor() as i64;
                            rng.random_range(lo..=hi) as f64
                        } else {
                            rng.random_range(lb[i]..=ub[i])
                        }
                    })
                    .collect();
                vectors.push(x);
            }
        }

        let mut population = Self::new(problem);
        for x in vectors {
            population.push(x);
        }
        population
    }

    /// Evaluates `x` and appends the resulting individual.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` differs from the problem dimension.
    pub fn push(&mut self, x: Vec<f64>) {
        assert_eq!(
            x.len(),
            self.problem.dimension(),
            "decision vector length must match problem dimension"
        );
        let mut fitness = vec![0.0; self.problem.fitness_dimension()];
        self.problem.evaluate(&x, &mut fitness);
        self.individuals.push(Individual { x, fitness });
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Index of the best individual under the problem's fitness
    /// ordering, or `None` for an empty population.
    ///
    /// Ties resolve to the lowest index.
    pub fn best_index(&self) -> Option<usize> {
        self.individuals
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                self.problem.compare_fitness(a.fitness(), b.fitness())
            })
            .map(|(i, _)| i)
    }

    /// The individual at `index`, or `None` if out of range.
    pub fn individual(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// All individuals, in insertion order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The problem instance this population belongs to.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Replaces the decision vector of the individual at `index` and
    /// re-evaluates its fitness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] if `index` is out of range; the
    /// population is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` differs from the problem dimension.
    pub fn replace_decision_vector(&mut self, index: usize, x: Vec<f64>) -> Result<(), Error> {
        assert_eq!(
            x.len(),
            self.problem.dimension(),
            "decision vector length must match problem dimension"
        );
        let size = self.individuals.len();
        let individual = self
            .individuals
            .get_mut(index)
            .ok_or(Error::InvalidIndex { index, size })?;
        individual.x = x;
        self.problem.evaluate(&individual.x, &mut individual.fitness);
        Ok(())
    }
}
