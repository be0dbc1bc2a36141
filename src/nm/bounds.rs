//! Projection of a refined point back into the problem's box.

/// Clamps each component of `x` into `[lb[i], ub[i]]`.
///
/// Applied once after the search loop finishes: the simplex itself is
/// free to wander outside the box, and the problem is expected to
/// return a finite (if poor) value out there or a non-finite one the
/// search then rejects.
pub(crate) fn clamp_to_bounds(x: &mut [f64], lb: &[f64], ub: &[f64]) {
    debug_assert_eq!(x.len(), lb.len());
    debug_assert_eq!(x.len(), ub.len());
    for ((v, &lo), &hi) in x.iter_mut().zip(lb).zip(ub) {
        *v = v.clamp(lo, hi);
    }
}
