//! Scalar and vector type aliases shared across the workspace.

use nalgebra::{Point2, Vector2};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;

/// Arithmetic mean of a set of 2D vectors.
///
/// Returns `None` for an empty slice.
pub fn mean_vec2(values: &[Vec2]) -> Option<Vec2> {
    if values.is_empty() {
        return None;
    }
    let sum = values.iter().fold(Vec2::zeros(), |acc, v| acc + v);
    Some(sum / values.len() as Real)
}

/// Returns `true` when both components are finite.
pub fn is_finite_vec2(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
