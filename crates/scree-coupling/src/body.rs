//! Column-array views of a solver's particle population.

use scree_math::Vec3;

/// Particle population of one solver (DEM bodies or MPM material points),
/// stored as parallel columns.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    /// Particle centers (m).
    pub position: Vec<Vec3>,
    /// Particle velocities (m/s).
    pub velocity: Vec<Vec3>,
    /// Particle masses (kg).
    pub mass: Vec<f64>,
    /// Contact radii (m).
    pub radius: Vec<f64>,
    /// Material id per particle.
    pub material: Vec<u32>,
}

impl BodySet {
    /// Empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one particle.
    pub fn push(&mut self, position: Vec3, velocity: Vec3, mass: f64, radius: f64, material: u32) {
        self.position.push(position);
        self.velocity.push(velocity);
        self.mass.push(mass);
        self.radius.push(radius);
        self.material.push(material);
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Minimum particle mass, `None` when empty.
    pub fn min_mass(&self) -> Option<f64> {
        self.mass.iter().copied().reduce(f64::min)
    }
}

/// Static planar wall facet.
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    /// A point on the facet (m).
    pub point: Vec3,
    /// Unit normal pointing into the simulation domain.
    pub normal: Vec3,
    /// Material id of the wall surface.
    pub material: u32,
}
