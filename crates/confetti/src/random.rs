//! Uniform draws used when launching particles.

use fastrand::Rng;

/// Uniform value between `a` and `b`. The bounds may be given in either order.
pub fn random_in_range(rng: &mut Rng, a: f32, b: f32) -> f32 {
    rng.f32().mul_add(b - a, a)
}

/// Uniform value between `a` and `b`, floored to `decimals` decimal places.
pub fn random_rounded(rng: &mut Rng, a: f32, b: f32, decimals: i32) -> f32 {
    let multiplier = 10f32.powi(decimals);
    (random_in_range(rng, a, b) * multiplier).floor() / multiplier
}

/// Picks one element uniformly, `None` for an empty slice.
pub fn pick<'a, T>(rng: &mut Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.usize(..items.len()))
}
