//! Per-material-pair surface properties.
//!
//! Contact coefficients live in a flattened `M x M` matrix indexed by the
//! ordered pairing `id1 * M + id2`. Off-diagonal registration writes both
//! orderings with identical values so lookup never depends on argument
//! order. The table is written during setup only; stepping reads it
//! immutably.

use scree_config::{check_material_id, Params, Result};
use std::fmt;

/// Contact coefficients for one ordered material pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceProps {
    /// Normal contact stiffness (N/m).
    pub kn: f64,
    /// Normal viscous damping ratio (dimensionless).
    pub ndratio: f64,
    /// Normal cutoff distance. Reserved; always 0 at creation.
    pub ncut: f64,
}

impl SurfaceProps {
    /// Whether this entry has been registered.
    pub fn is_set(&self) -> bool {
        self.kn > 0.0
    }
}

impl fmt::Display for SurfaceProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kn = {:.4e}, ndratio = {}", self.kn, self.ndratio)
    }
}

/// Linear index of the ordered pair (id1, id2) in a flat `M x M` table.
#[inline]
pub fn pair_index(max_materials: usize, id1: usize, id2: usize) -> usize {
    id1 * max_materials + id2
}

/// Flattened symmetric table of surface properties.
#[derive(Debug, Clone)]
pub struct SurfaceTable {
    max_materials: usize,
    props: Vec<SurfaceProps>,
}

impl SurfaceTable {
    /// Create an empty table for `max_materials` material ids.
    pub fn new(max_materials: usize) -> Self {
        Self {
            max_materials,
            props: vec![SurfaceProps::default(); max_materials * max_materials],
        }
    }

    /// Configured maximum material count.
    pub fn max_materials(&self) -> usize {
        self.max_materials
    }

    /// Linear index of the ordered pair (id1, id2).
    #[inline]
    pub fn pair_index(&self, id1: usize, id2: usize) -> usize {
        pair_index(self.max_materials, id1, id2)
    }

    /// Properties for the pair (id1, id2). Order-independent once
    /// registered.
    #[inline]
    pub fn get(&self, id1: usize, id2: usize) -> &SurfaceProps {
        &self.props[self.pair_index(id1, id2)]
    }

    /// Properties at a precomputed linear index.
    #[inline]
    pub fn by_index(&self, index: usize) -> &SurfaceProps {
        &self.props[index]
    }

    /// Register contact properties for a material pair.
    ///
    /// Requires `NormalStiffness` and `NormalViscousDamping`; both ids must
    /// be below the configured maximum. The diagonal case writes a single
    /// entry, the off-diagonal case writes (id1,id2) and (id2,id1) with
    /// identical values. Re-registering an already populated entry warns
    /// and overwrites.
    ///
    /// Returns the linear index written (diagonal) or the (id1,id2) index
    /// (off-diagonal).
    pub fn register_pair(&mut self, id1: usize, id2: usize, params: &Params) -> Result<usize> {
        check_material_id(id1, self.max_materials)?;
        check_material_id(id2, self.max_materials)?;
        let kn = params.required_f64("NormalStiffness")?;
        let ndratio = params.required_f64("NormalViscousDamping")?;

        let entry = SurfaceProps {
            kn,
            ndratio,
            ncut: 0.0,
        };
        let index = self.pair_index(id1, id2);
        if self.props[index].is_set() {
            eprintln!(
                "warning: overwriting surface properties for materials {id1} <-> {id2} \
                 (was {})",
                self.props[index]
            );
        }
        self.props[index] = entry;
        if id1 != id2 {
            let mirror = self.pair_index(id2, id1);
            self.props[mirror] = entry;
        }
        Ok(index)
    }

    /// Maximum registered stiffness, or 0 when nothing is registered.
    ///
    /// Scans all `M x M` entries; meant for setup-time use, not per-step.
    pub fn max_stiffness(&self) -> f64 {
        let mut max = 0.0f64;
        for entry in &self.props {
            if entry.kn > 0.0 {
                max = max.max(entry.kn);
            }
        }
        max
    }
}
