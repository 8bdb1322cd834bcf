//! Math primitives for the scree contact engine.
//!
//! Thin aliases over nalgebra so the rest of the workspace never names
//! nalgebra types directly.

use nalgebra as na;

/// 3D vector alias.
pub type Vec3 = na::Vector3<f64>;

/// Effective mass of two bodies meeting at a contact point:
/// `m1 m2 / (m1 + m2)`.
///
/// A non-finite mass on either side (static wall) reduces to the other
/// body's mass.
#[inline]
pub fn effective_mass(m1: f64, m2: f64) -> f64 {
    if !m2.is_finite() {
        m1
    } else if !m1.is_finite() {
        m2
    } else {
        m1 * m2 / (m1 + m2)
    }
}
