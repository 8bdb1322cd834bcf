//! Contact resolution between two coupled particle solvers.
//!
//! Implements:
//! - Symmetric per-material-pair surface property table
//! - Critical-timestep estimator for the explicit penalty integration
//! - Capacity-bounded, lock-free per-step contact table
//! - Spring-damper normal force + velocity-penalty tangential force
//!
//! The broad-phase spatial index and the time integrator are external
//! collaborators: candidate neighbor lists come in, assembled forces go
//! out. Nothing in this crate keeps state across steps except the
//! immutable surface table.

pub mod force;
pub mod narrow;
pub mod surface;
pub mod table;
pub mod timestep;

pub use force::ContactForce;
pub use narrow::{sphere_halfspace, sphere_sphere, Overlap};
pub use surface::{pair_index, SurfaceProps, SurfaceTable};
pub use table::{CandidateLists, ContactPair, ContactTable};
pub use timestep::critical_timestep;
