//! scree — contact resolution between a discrete-element solver and a
//! material-point solver.
//!
//! This is the umbrella crate re-exporting the public surface of the
//! member crates:
//!
//! - [`scree_contact`]: surface property table, critical timestep bound,
//!   per-step contact table, force assembly
//! - [`scree_material`]: fluid/structure constitutive registration and
//!   checkpointable particle state
//! - [`scree_coupling`]: the per-step driver tying candidate lists,
//!   tables, and force accumulation together
//!
//! The broad-phase spatial index and the time integrators stay external:
//! they hand in [`CandidateLists`] and consume the accumulated force
//! buffers.

pub use scree_config::{self, Params, Result, SetupError};
pub use scree_contact::{
    self, critical_timestep, pair_index, CandidateLists, ContactForce, ContactPair, ContactTable,
    Overlap, SurfaceProps, SurfaceTable,
};
pub use scree_coupling::{self, BodySet, ContactModel, Wall};
pub use scree_material::{self, MaterialModel, MaterialTable, StateSnapshot, StateVars};
pub use scree_math::{self, effective_mass, Vec3};
