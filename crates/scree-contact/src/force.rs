//! Narrow-phase force assembly for a single active contact.
//!
//! Normal direction: linear spring on the penetration depth plus a
//! viscous term scaled like a critically damped oscillator. Tangential
//! direction: an impulse-based drag `-m_eff * vs / dt` that, applied over
//! one timestep, drives the tangential relative velocity toward zero. No
//! tangential spring state is kept, so contacts need no identity across
//! steps.

use crate::surface::SurfaceProps;
use scree_math::Vec3;

/// Assembled force for one contact, split by direction.
#[derive(Debug, Clone, Copy)]
pub struct ContactForce {
    /// Spring-damper force along the contact normal.
    pub normal: Vec3,
    /// Velocity-penalty drag in the tangent plane.
    pub tangential: Vec3,
}

impl ContactForce {
    /// Combined contact force. The caller applies it to the source and
    /// its negation to the counterpart.
    pub fn total(&self) -> Vec3 {
        self.normal + self.tangential
    }
}

impl SurfaceProps {
    /// Assemble the contact force for one validated pair.
    ///
    /// * `m_eff` - effective mass of the two bodies at the contact point
    /// * `gapn` - signed gap (negative = penetrating)
    /// * `coeff` - stiffness scaling factor
    /// * `norm` - unit contact normal, counterpart toward source
    /// * `v_rel` - relative velocity of source with respect to counterpart
    /// * `dt` - current timestep; must be nonzero
    pub fn fluid_force(
        &self,
        m_eff: f64,
        gapn: f64,
        coeff: f64,
        norm: &Vec3,
        v_rel: &Vec3,
        dt: f64,
    ) -> ContactForce {
        let (kn, ndratio) = (self.kn, self.ndratio);
        let vn = v_rel.dot(norm);
        let vs = v_rel - vn * norm;

        let normal_contact_force = -kn * coeff * gapn;
        let normal_damping_force = -2.0 * ndratio * (m_eff * kn * coeff).sqrt() * vn;
        ContactForce {
            normal: (normal_contact_force + normal_damping_force) * norm,
            tangential: -vs / dt * m_eff,
        }
    }
}
