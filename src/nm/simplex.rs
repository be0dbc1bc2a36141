//! Simplex search state and the derivative-free refinement loop.

use crate::error::Error;

/// Outcome of one simplex transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The simplex moved; the loop may continue.
    Continue,
    /// A full contraction produced non-finite objective values, so no
    /// transformation can make further progress. The loop must stop
    /// with the best point found so far.
    Stalled,
}

/// Transient state for one refinement: an `n + 1`-vertex simplex over
/// `n` continuous dimensions plus reusable scratch vectors.
///
/// All storage is acquired fallibly up front and owned by the value,
/// so every exit path releases it on drop. Construction never touches
/// anything outside this struct.
pub(crate) struct SimplexSearch {
    /// Simplex vertices; `vertices.len()` is `dim + 1`.
    vertices: Vec<Vec<f64>>,
    /// Objective value at each vertex.
    values: Vec<f64>,
    /// Centroid scratch buffer.
    centroid: Vec<f64>,
    /// Reflected trial point.
    reflected: Vec<f64>,
    /// Expanded or contracted trial point.
    trial: Vec<f64>,
}

impl SimplexSearch {
    /// Allocates the search state and builds the initial simplex:
    /// vertex `0` is `origin` and vertex `i + 1` steps `step_size`
    /// along dimension `i`. Evaluates the objective at every vertex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if any buffer cannot be
    /// allocated; buffers acquired before the failure are dropped and
    /// the objective is never called.
    pub(crate) fn try_new<F>(
        objective: &mut F,
        origin: &[f64],
        step_size: f64,
    ) -> Result<Self, Error>
    where
        F: FnMut(&[f64]) -> f64,
    {
        let dim = origin.len();
        debug_assert!(dim > 0, "simplex needs at least one dimension");

        let mut vertices: Vec<Vec<f64>> = Vec::new();
        vertices
            .try_reserve_exact(dim + 1)
            .map_err(|_| Error::OutOfMemory)?;
        for _ in 0..=dim {
            vertices.push(try_buffer(dim)?);
        }
        let mut steps = try_buffer(dim)?;
        let values = try_buffer(dim + 1)?;
        let centroid = try_buffer(dim)?;
        let reflected = try_buffer(dim)?;
        let trial = try_buffer(dim)?;

        steps.fill(step_size);
        let mut state = Self {
            vertices,
            values,
            centroid,
            reflected,
            trial,
        };
        for (i, vertex) in state.vertices.iter_mut().enumerate() {
            vertex.copy_from_slice(origin);
            if i > 0 {
                vertex[i - 1] += steps[i - 1];
            }
        }
        let Self {
            vertices, values, ..
        } = &mut state;
        for (value, vertex) in values.iter_mut().zip(vertices.iter()) {
            *value = objective(vertex);
        }
        Ok(state)
    }

    /// Runs the refinement loop: up to `max_iter` transformations,
    /// stopping early when the simplex size drops below `tol` or a
    /// transformation stalls. Returns the best vertex reached.
    pub(crate) fn run<F>(mut self, objective: &mut F, max_iter: usize, tol: f64) -> Vec<f64>
    where
        F: FnMut(&[f64]) -> f64,
    {
        for _ in 0..max_iter {
            if self.step(objective) == Step::Stalled {
                break;
            }
            if self.size() < tol {
                break;
            }
        }
        let best = self.best_index();
        self.vertices.swap_remove(best)
    }

    /// Applies one reflect, expand, contract, or shrink transformation
    /// to the simplex.
    ///
    /// Trial points with non-finite objective values are never
    /// accepted; a non-finite reflection is treated like a failed one
    /// and handled through contraction.
    fn step<F>(&mut self, objective: &mut F) -> Step
    where
        F: FnMut(&[f64]) -> f64,
    {
        let (lo, s_hi, hi) = self.order();

        // Centroid of every vertex except the worst.
        self.centroid.fill(0.0);
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i != hi {
                for (c, &v) in self.centroid.iter_mut().zip(vertex) {
                    *c += v;
                }
            }
        }
        let rest = (self.vertices.len() - 1) as f64;
        for c in self.centroid.iter_mut() {
            *c /= rest;
        }

        corner_move(&mut self.reflected, &self.centroid, &self.vertices[hi], 1.0);
        let f_reflected = objective(&self.reflected);

        if f_reflected.is_finite() && f_reflected < self.values[lo] {
            // The reflection beats the best vertex, so try doubling the
            // step and keep whichever lands lower.
            corner_move(&mut self.trial, &self.centroid, &self.vertices[hi], 2.0);
            let f_expanded = objective(&self.trial);
            if f_expanded.is_finite() && f_expanded < self.values[lo] {
                self.vertices[hi].copy_from_slice(&self.trial);
                self.values[hi] = f_expanded;
            } else {
                self.vertices[hi].copy_from_slice(&self.reflected);
                self.values[hi] = f_reflected;
            }
            Step::Continue
        } else if !f_reflected.is_finite() || f_reflected > self.values[s_hi] {
            // The reflection does not even beat the second-worst
            // vertex. Keep it anyway when it improves on the worst,
            // then fall back to a half-step contraction of the current
            // worst corner.
            if f_reflected.is_finite() && f_reflected <= self.values[hi] {
                self.vertices[hi].copy_from_slice(&self.reflected);
                self.values[hi] = f_reflected;
            }
            corner_move(&mut self.trial, &self.centroid, &self.vertices[hi], -0.5);
            let f_contracted = objective(&self.trial);
            if f_contracted.is_finite() && f_contracted <= self.values[hi] {
                self.vertices[hi].copy_from_slice(&self.trial);
                self.values[hi] = f_contracted;
                Step::Continue
            } else {
                self.shrink(lo, objective)
            }
        } else {
            self.vertices[hi].copy_from_slice(&self.reflected);
            self.values[hi] = f_reflected;
            Step::Continue
        }
    }

    /// Moves every vertex except the best halfway toward the best one
    /// and re-evaluates it. The whole contraction is carried out even
    /// if a value comes back non-finite; the stall is reported after.
    fn shrink<F>(&mut self, lo: usize, objective: &mut F) -> Step
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut stalled = false;
        for i in 0..self.vertices.len() {
            if i == lo {
                continue;
            }
            for j in 0..self.vertices[i].len() {
                self.vertices[i][j] = 0.5 * (self.vertices[i][j] + self.vertices[lo][j]);
            }
            self.values[i] = objective(&self.vertices[i]);
            if !self.values[i].is_finite() {
                stalled = true;
            }
        }
        if stalled {
            Step::Stalled
        } else {
            Step::Continue
        }
    }

    /// Indices of the best, second-worst, and worst vertices.
    ///
    /// NaN values rank worst; ties resolve to the earliest vertex.
    fn order(&self) -> (usize, usize, usize) {
        let mut lo = 0;
        let mut hi = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if rank_less(v, self.values[lo]) {
                lo = i;
            }
            if rank_less(self.values[hi], v) {
                hi = i;
            }
        }
        let mut s_hi = if hi == 0 { 1 } else { 0 };
        for (i, &v) in self.values.iter().enumerate() {
            if i != hi && rank_less(self.values[s_hi], v) {
                s_hi = i;
            }
        }
        (lo, s_hi, hi)
    }

    /// Index of the best vertex; ties resolve to the earliest.
    fn best_index(&self) -> usize {
        let mut lo = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if rank_less(v, self.values[lo]) {
                lo = i;
            }
        }
        lo
    }

    /// Root-mean-square distance of the vertices from their centroid,
    /// the size the convergence tolerance is tested against.
    fn size(&mut self) -> f64 {
        let count = self.vertices.len() as f64;
        self.centroid.fill(0.0);
        for vertex in &self.vertices {
            for (c, &v) in self.centroid.iter_mut().zip(vertex) {
                *c += v;
            }
        }
        for c in self.centroid.iter_mut() {
            *c /= count;
        }

        let mut sum = 0.0;
        for vertex in &self.vertices {
            for (&c, &v) in self.centroid.iter().zip(vertex) {
                let d = v - c;
                sum += d * d;
            }
        }
        (sum / count).sqrt()
    }
}

/// Writes `centroid + coeff * (centroid - worst)` into `out`.
///
/// `coeff` of `1.0` reflects the worst vertex through the centroid of
/// the rest, `2.0` doubles that step, and `-0.5` contracts halfway
/// back toward the worst vertex.
fn corner_move(out: &mut [f64], centroid: &[f64], worst: &[f64], coeff: f64) {
    for ((o, &c), &w) in out.iter_mut().zip(centroid).zip(worst) {
        *o = c + coeff * (c - w);
    }
}

/// Strict "ranks better than" ordering that places NaN after every
/// number.
fn rank_less(a: f64, b: f64) -> bool {
    match (a.is_nan(), b.is_nan()) {
        (true, _) => false,
        (false, true) => true,
        (false, false) => a < b,
    }
}

/// Fallibly allocates a zeroed buffer of `len` values.
fn try_buffer(len: usize) -> Result<Vec<f64>, Error> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory)?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}
