//! Geometric utility functions for distances and directions.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use ndarray::Array1;
use rand::Rng;

/// Creates a 2D position or vector.
pub fn vec2(x: f32, y: f32) -> Array1<f32> {
    Array1::from_vec(vec![x, y])
}

/// Euclidean distance between two 2D positions.
///
/// # Arguments
///
/// * `a` - First position
/// * `b` - Second position
///
/// # Returns
///
/// The straight-line distance between `a` and `b`.
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let p = Point::new(a[0], a[1]);
    let q = Point::new(b[0], b[1]);
    Euclidean.distance(&p, &q)
}

/// Unit vector pointing in the same direction as `v`.
///
/// Returns `None` for a zero-length (or non-finite) vector.
pub fn normalize(v: &Array1<f32>) -> Option<Array1<f32>> {
    let length = v.dot(v).sqrt();
    if length > f32::EPSILON && length.is_finite() {
        Some(v / length)
    } else {
        None
    }
}

/// Random unit vector with a uniformly distributed heading.
pub fn random_direction<R: Rng>(rng: &mut R) -> Array1<f32> {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    vec2(angle.cos(), angle.sin())
}

/// Random position inside an origin-centered rectangle.
///
/// # Arguments
///
/// * `half_width` - Half extent along x
/// * `half_depth` - Half extent along y
/// * `rng` - Random source
pub fn random_position<R: Rng>(half_width: f32, half_depth: f32, rng: &mut R) -> Array1<f32> {
    vec2(
        rng.random_range(-half_width..half_width),
        rng.random_range(-half_depth..half_depth),
    )
}

/// Clamps a position into an origin-centered rectangle.
pub fn clamp_to_arena_mut(v: &mut Array1<f32>, half_width: f32, half_depth: f32) {
    v[0] = v[0].clamp(-half_width, half_width);
    v[1] = v[1].clamp(-half_depth, half_depth);
}
