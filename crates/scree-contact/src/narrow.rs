//! Narrow-phase overlap predicates.
//!
//! Broad-phase candidates become active contacts only when a geometric
//! test confirms penetration and produces a signed gap and a unit normal.
//! Conventions: `gap < 0` means the bodies overlap by `-gap`; the normal
//! is a unit vector pointing from the counterpart toward the source, so a
//! repulsive force on the source acts along `+normal`.
//!
//! The contact table builder accepts any predicate with this signature;
//! the two shapes here cover the coupled-solver cases (particle against
//! particle, particle against a planar wall facet).

use scree_math::Vec3;

/// Result of a successful narrow-phase test.
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    /// Signed gap; negative means penetrating.
    pub gap: f64,
    /// Unit normal pointing from the counterpart toward the source.
    pub normal: Vec3,
}

/// Sphere-sphere overlap test.
///
/// Returns `None` when the spheres are separated or concentric (no
/// defined normal).
pub fn sphere_sphere(p1: &Vec3, r1: f64, p2: &Vec3, r2: f64) -> Option<Overlap> {
    let d = p1 - p2;
    let dist = d.norm();
    if dist <= f64::EPSILON {
        return None;
    }
    let gap = dist - (r1 + r2);
    if gap < 0.0 {
        Some(Overlap {
            gap,
            normal: d / dist,
        })
    } else {
        None
    }
}

/// Sphere against the halfspace behind a planar wall facet.
///
/// `wall_normal` must be unit length and points out of the wall, into the
/// simulation domain.
pub fn sphere_halfspace(
    p: &Vec3,
    r: f64,
    wall_point: &Vec3,
    wall_normal: &Vec3,
) -> Option<Overlap> {
    let gap = (p - wall_point).dot(wall_normal) - r;
    if gap < 0.0 {
        Some(Overlap {
            gap,
            normal: *wall_normal,
        })
    } else {
        None
    }
}
