//! Per-step contact driver for the coupled DEM-MPM solvers.
//!
//! Each macro step runs two phases against the contact model:
//!
//! 1. **Table rebuild** - broad-phase candidate lists (external spatial
//!    index) are compacted into the active contact tables, one for
//!    particle-particle pairs and one for particle-wall pairs.
//! 2. **Force resolution** - every active contact is assembled into a
//!    normal plus tangential force and accumulated into the two solvers'
//!    force buffers with opposite signs.
//!
//! The phase barrier is structural: rebuilds borrow the model mutably,
//! resolution borrows it immutably, so the tables are fully written
//! before any force reads them.

pub mod body;

pub use body::{BodySet, Wall};

use rayon::prelude::*;
use scree_config::{Params, Result};
use scree_contact::{sphere_halfspace, sphere_sphere, CandidateLists, ContactTable, SurfaceTable};
use scree_math::{effective_mass, Vec3};

/// Contact model coupling two particle populations and a set of static
/// wall facets.
#[derive(Debug)]
pub struct ContactModel {
    surfaces: SurfaceTable,
    /// Reserved contacts per source particle against the other set.
    coordination: usize,
    /// Reserved contacts per source particle against walls.
    wall_coordination: usize,
    pp_table: ContactTable,
    pw_table: ContactTable,
}

impl ContactModel {
    /// New model for `max_materials` material ids with the given
    /// per-particle coordination capacities.
    pub fn new(max_materials: usize, coordination: usize, wall_coordination: usize) -> Self {
        Self {
            surfaces: SurfaceTable::new(max_materials),
            coordination,
            wall_coordination,
            pp_table: ContactTable::new(),
            pw_table: ContactTable::new(),
        }
    }

    /// The surface property table.
    pub fn surfaces(&self) -> &SurfaceTable {
        &self.surfaces
    }

    /// Register surface properties for a material pair and print the
    /// registered coefficients.
    pub fn add_surface_property(&mut self, id1: usize, id2: usize, params: &Params) -> Result<usize> {
        let index = self.surfaces.register_pair(id1, id2, params)?;
        println!(
            "contact pair {id1} <-> {id2}: {}",
            self.surfaces.by_index(index)
        );
        Ok(index)
    }

    /// Stability bound from the lightest particle of either set and the
    /// stiffest registered pair. `None` when no pair is registered or
    /// both sets are empty.
    pub fn critical_timestep(&self, set_a: &BodySet, set_b: &BodySet) -> Option<f64> {
        let mass_min = match (set_a.min_mass(), set_b.min_mass()) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return None,
        };
        self.surfaces.critical_timestep(mass_min)
    }

    /// Rebuild the particle-particle contact table for this step.
    ///
    /// `candidates` lists, per source particle, the counterpart indices
    /// that passed the external broad phase.
    pub fn update_particle_contact_table(
        &mut self,
        source: &BodySet,
        target: &BodySet,
        candidates: &CandidateLists,
    ) {
        let max_materials = self.surfaces.max_materials();
        self.pp_table.rebuild(
            candidates,
            self.coordination,
            |s, t| {
                let (s, t) = (s as usize, t as usize);
                sphere_sphere(
                    &source.position[s],
                    source.radius[s],
                    &target.position[t],
                    target.radius[t],
                )
            },
            |s, t| {
                scree_contact::pair_index(
                    max_materials,
                    source.material[s as usize] as usize,
                    target.material[t as usize] as usize,
                ) as u32
            },
        );
    }

    /// Rebuild the particle-wall contact table for this step.
    pub fn update_wall_contact_table(
        &mut self,
        source: &BodySet,
        walls: &[Wall],
        candidates: &CandidateLists,
    ) {
        let max_materials = self.surfaces.max_materials();
        self.pw_table.rebuild(
            candidates,
            self.wall_coordination,
            |s, w| {
                let (s, w) = (s as usize, w as usize);
                sphere_halfspace(
                    &source.position[s],
                    source.radius[s],
                    &walls[w].point,
                    &walls[w].normal,
                )
            },
            |s, w| {
                scree_contact::pair_index(
                    max_materials,
                    source.material[s as usize] as usize,
                    walls[w as usize].material as usize,
                ) as u32
            },
        );
    }

    /// Assemble and accumulate this step's contact forces.
    ///
    /// `coeff` scales the stiffness of every contact. Forces are applied
    /// to `forces_a` (source set) and, negated, to `forces_b` (target
    /// set); walls are static and absorb their reaction. Assembly runs
    /// per contact in parallel; accumulation is a plain sum, so the
    /// result is independent of contact order.
    pub fn resolve_forces(
        &self,
        source: &BodySet,
        target: &BodySet,
        coeff: f64,
        dt: f64,
        forces_a: &mut [Vec3],
        forces_b: &mut [Vec3],
    ) {
        let pair_forces: Vec<(usize, usize, Vec3)> = self
            .pp_table
            .par_iter_active()
            .map(|contact| {
                let s = contact.source as usize;
                let t = contact.target as usize;
                let props = self.surfaces.by_index(contact.pair_index as usize);
                let m_eff = effective_mass(source.mass[s], target.mass[t]);
                let v_rel = source.velocity[s] - target.velocity[t];
                let force = props
                    .fluid_force(m_eff, contact.gap, coeff, &contact.normal, &v_rel, dt)
                    .total();
                (s, t, force)
            })
            .collect();

        let wall_forces: Vec<(usize, Vec3)> = self
            .pw_table
            .par_iter_active()
            .map(|contact| {
                let s = contact.source as usize;
                let props = self.surfaces.by_index(contact.pair_index as usize);
                // Walls are static: the source mass is the effective mass
                // and the source velocity is the relative velocity.
                let force = props
                    .fluid_force(
                        source.mass[s],
                        contact.gap,
                        coeff,
                        &contact.normal,
                        &source.velocity[s],
                        dt,
                    )
                    .total();
                (s, force)
            })
            .collect();

        for (s, t, force) in pair_forces {
            forces_a[s] += force;
            forces_b[t] -= force;
        }
        for (s, force) in wall_forces {
            forces_a[s] += force;
        }
    }

    /// Active particle-particle contact table of the current step.
    pub fn particle_table(&self) -> &ContactTable {
        &self.pp_table
    }

    /// Active particle-wall contact table of the current step.
    pub fn wall_table(&self) -> &ContactTable {
        &self.pw_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn surface_params(kn: f64, ndratio: f64) -> Params {
        Params::new()
            .set("NormalStiffness", kn)
            .set("NormalViscousDamping", ndratio)
    }

    /// One fluid particle pressed into one rigid particle along z.
    fn overlapping_pair() -> (BodySet, BodySet) {
        let mut fluid = BodySet::new();
        fluid.push(Vec3::new(0.0, 0.0, 0.95), Vec3::new(0.0, 0.0, -1.0), 1.0, 0.5, 0);
        let mut rigid = BodySet::new();
        rigid.push(Vec3::new(0.0, 0.0, 0.0), Vec3::zeros(), 1.0, 0.5, 1);
        (fluid, rigid)
    }

    fn candidate_pairing(n_sources: usize, capacity: usize, pairs: &[(usize, u32)]) -> CandidateLists {
        let mut lists = CandidateLists::new(n_sources, capacity);
        for &(s, t) in pairs {
            lists.push(s, t);
        }
        lists
    }

    #[test]
    fn test_coupled_step_is_equal_and_opposite() {
        let (fluid, rigid) = overlapping_pair();
        let mut model = ContactModel::new(2, 4, 2);
        model
            .add_surface_property(0, 1, &surface_params(1e6, 0.2))
            .unwrap();

        let candidates = candidate_pairing(1, 4, &[(0, 0)]);
        model.update_particle_contact_table(&fluid, &rigid, &candidates);
        assert_eq!(model.particle_table().active_count(), 1);

        let mut f_fluid = vec![Vec3::zeros(); 1];
        let mut f_rigid = vec![Vec3::zeros(); 1];
        model.resolve_forces(&fluid, &rigid, 1.0, 1e-4, &mut f_fluid, &mut f_rigid);

        assert_relative_eq!(f_fluid[0] + f_rigid[0], Vec3::zeros(), epsilon = 1e-9);
        // Gap is 0.95 - 1.0 = -0.05 and the pair approaches at 1 m/s:
        // elastic 5e4, damping 2*0.2*sqrt(0.5*1e6)*1.
        let expected = 5e4 + 2.0 * 0.2 * (0.5f64 * 1e6).sqrt();
        assert_relative_eq!(f_fluid[0].z, expected, epsilon = 1e-9);
        assert!(f_rigid[0].z < 0.0);
    }

    #[test]
    fn test_separated_candidates_produce_no_contact() {
        let mut fluid = BodySet::new();
        fluid.push(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), 1.0, 0.5, 0);
        let mut rigid = BodySet::new();
        rigid.push(Vec3::zeros(), Vec3::zeros(), 1.0, 0.5, 1);

        let mut model = ContactModel::new(2, 4, 2);
        model
            .add_surface_property(0, 1, &surface_params(1e6, 0.2))
            .unwrap();

        // Broad phase may overapproximate; the narrow phase must reject.
        let candidates = candidate_pairing(1, 4, &[(0, 0)]);
        model.update_particle_contact_table(&fluid, &rigid, &candidates);
        assert_eq!(model.particle_table().active_count(), 0);
    }

    #[test]
    fn test_wall_contact_pushes_source_only() {
        let mut fluid = BodySet::new();
        fluid.push(Vec3::new(0.0, 0.0, 0.4), Vec3::zeros(), 2.0, 0.5, 0);
        let walls = vec![Wall {
            point: Vec3::zeros(),
            normal: Vec3::new(0.0, 0.0, 1.0),
            material: 1,
        }];

        let mut model = ContactModel::new(2, 4, 2);
        model
            .add_surface_property(0, 1, &surface_params(1e5, 0.0))
            .unwrap();

        let candidates = candidate_pairing(1, 2, &[(0, 0)]);
        model.update_wall_contact_table(&fluid, &walls, &candidates);
        assert_eq!(model.wall_table().active_count(), 1);

        let rigid = BodySet::new();
        let mut f_fluid = vec![Vec3::zeros(); 1];
        let mut f_rigid: Vec<Vec3> = Vec::new();
        model.resolve_forces(&fluid, &rigid, 1.0, 1e-4, &mut f_fluid, &mut f_rigid);

        // Static penetration of 0.1 against kn=1e5.
        assert_relative_eq!(f_fluid[0], Vec3::new(0.0, 0.0, 1e4), epsilon = 1e-9);
    }

    #[test]
    fn test_contacts_per_particle_never_exceed_coordination() {
        // Six overlapping candidates against a coordination number of 2.
        let mut fluid = BodySet::new();
        fluid.push(Vec3::zeros(), Vec3::zeros(), 1.0, 1.0, 0);
        let mut rigid = BodySet::new();
        for i in 0..6 {
            let angle = i as f64;
            rigid.push(
                Vec3::new(0.5 * angle.cos(), 0.5 * angle.sin(), 0.0),
                Vec3::zeros(),
                1.0,
                1.0,
                1,
            );
        }

        let mut model = ContactModel::new(2, 2, 2);
        model
            .add_surface_property(0, 1, &surface_params(1e6, 0.2))
            .unwrap();

        let candidates =
            candidate_pairing(1, 6, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        model.update_particle_contact_table(&fluid, &rigid, &candidates);

        assert_eq!(model.particle_table().contacts_of(0).count(), 2);
        assert_eq!(model.particle_table().truncated(), 4);
    }

    #[test]
    fn test_critical_timestep_over_both_sets() {
        let mut fluid = BodySet::new();
        fluid.push(Vec3::zeros(), Vec3::zeros(), 4.0, 0.5, 0);
        let mut rigid = BodySet::new();
        rigid.push(Vec3::zeros(), Vec3::zeros(), 1.0, 0.5, 1);

        let mut model = ContactModel::new(2, 4, 2);
        assert!(model.critical_timestep(&fluid, &rigid).is_none());

        model
            .add_surface_property(0, 1, &surface_params(1e6, 0.2))
            .unwrap();
        // Lightest particle is the rigid one.
        assert_relative_eq!(model.critical_timestep(&fluid, &rigid).unwrap(), 1e-3);
    }

    #[test]
    fn test_rebuild_replaces_previous_step() {
        let (fluid, rigid) = overlapping_pair();
        let mut model = ContactModel::new(2, 4, 2);
        model
            .add_surface_property(0, 1, &surface_params(1e6, 0.2))
            .unwrap();

        let candidates = candidate_pairing(1, 4, &[(0, 0)]);
        model.update_particle_contact_table(&fluid, &rigid, &candidates);
        assert_eq!(model.particle_table().active_count(), 1);

        // Next step: broad phase reports nothing.
        let empty = CandidateLists::new(1, 4);
        model.update_particle_contact_table(&fluid, &rigid, &empty);
        assert_eq!(model.particle_table().active_count(), 0);
    }
}
