//! Critical-timestep estimation for the explicit penalty contact model.
//!
//! A linear spring-damper contact integrated explicitly is stable only
//! while the timestep stays below the natural oscillation period of the
//! stiffest, lightest admissible contact. The bound generalizes to the
//! coupled pair by taking the minimum particle mass across both solvers'
//! particle sets.

use crate::surface::SurfaceTable;

/// Stability bound `sqrt(mass_min / stiffness_max)`.
///
/// Raw formula; a zero `stiffness_max` yields infinity. Prefer
/// [`SurfaceTable::critical_timestep`] which guards the unregistered case.
#[inline]
pub fn critical_timestep(mass_min: f64, stiffness_max: f64) -> f64 {
    (mass_min / stiffness_max).sqrt()
}

impl SurfaceTable {
    /// Critical timestep for the stiffest registered pair against the
    /// lightest particle of the coupled sets.
    ///
    /// Returns `None` when no surface property has been registered
    /// (stiffness 0 would make the bound undefined).
    pub fn critical_timestep(&self, mass_min: f64) -> Option<f64> {
        let stiffness_max = self.max_stiffness();
        if stiffness_max > 0.0 {
            Some(critical_timestep(mass_min, stiffness_max))
        } else {
            None
        }
    }
}
