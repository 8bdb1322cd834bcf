//! Constitutive material registration for the coupled fluid-structure
//! model.
//!
//! Each material slot is either a weakly compressible fluid or an elastic
//! structure; the variant is chosen once at registration time, so
//! stepping code matches on a tagged enum instead of re-checking flags.

pub mod state;

pub use state::{StateSnapshot, StateVars};

use scree_config::{check_material_id, Params, Result};

/// Constitutive model selected for one material slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialModel {
    /// Weakly compressible fluid.
    Fluid {
        /// Reference density (kg/m³).
        density: f64,
        /// Bulk modulus (Pa).
        modulus: f64,
        /// Equation-of-state exponent.
        gamma: f64,
        /// Dynamic viscosity (Pa·s).
        viscosity: f64,
        /// Atmospheric pressure offset (Pa).
        atmospheric_pressure: f64,
    },
    /// Elastic structure.
    Structure {
        /// Reference density (kg/m³).
        density: f64,
        /// Young's modulus (Pa).
        young_modulus: f64,
        /// Poisson's ratio (dimensionless).
        poisson_ratio: f64,
    },
}

impl MaterialModel {
    /// Reference density of either variant.
    pub fn density(&self) -> f64 {
        match self {
            MaterialModel::Fluid { density, .. } => *density,
            MaterialModel::Structure { density, .. } => *density,
        }
    }
}

/// Registered materials for one solver, indexed by material id.
#[derive(Debug, Clone)]
pub struct MaterialTable {
    models: Vec<Option<MaterialModel>>,
}

impl MaterialTable {
    /// Empty table for `max_materials` slots.
    pub fn new(max_materials: usize) -> Self {
        Self {
            models: vec![None; max_materials],
        }
    }

    /// Configured maximum material count.
    pub fn max_materials(&self) -> usize {
        self.models.len()
    }

    /// Register a material from its keyed configuration.
    ///
    /// Requires `MaterialID` (below the configured maximum) and
    /// `IsStructure`. Fluids read `Density` (default 1000), `Modulus`
    /// (default 2e5), `gamma` (default 7), `Viscosity` (default 1e-3) and
    /// `atmospheric_pressure` (default 0). Structures read `Density`
    /// (default 2650), require `YoungModulus`, and read `PossionRatio`
    /// (default 0.3). Re-registering a populated slot warns and
    /// overwrites.
    ///
    /// Returns the material id registered.
    pub fn register(&mut self, params: &Params) -> Result<usize> {
        let id = params.required_usize("MaterialID")?;
        check_material_id(id, self.models.len())?;

        let is_structure = params.required_bool("IsStructure")?;
        let model = if is_structure {
            MaterialModel::Structure {
                density: params.optional_f64("Density", 2650.0)?,
                young_modulus: params.required_f64("YoungModulus")?,
                poisson_ratio: params.optional_f64("PossionRatio", 0.3)?,
            }
        } else {
            MaterialModel::Fluid {
                density: params.optional_f64("Density", 1000.0)?,
                modulus: params.optional_f64("Modulus", 2e5)?,
                gamma: params.optional_f64("gamma", 7.0)?,
                viscosity: params.optional_f64("Viscosity", 1e-3)?,
                atmospheric_pressure: params.optional_f64("atmospheric_pressure", 0.0)?,
            }
        };

        if self.models[id].is_some() {
            eprintln!("warning: overwriting material {id}");
        }
        self.models[id] = Some(model);
        self.print_summary(id);
        Ok(id)
    }

    /// Registered model for `id`, if any.
    pub fn get(&self, id: usize) -> Option<&MaterialModel> {
        self.models.get(id).and_then(|slot| slot.as_ref())
    }

    /// Lateral pressure coefficient for `id`. Unity for both variants of
    /// this model family.
    pub fn lateral_coefficient(&self, _id: usize) -> f64 {
        1.0
    }

    fn print_summary(&self, id: usize) {
        match &self.models[id] {
            Some(MaterialModel::Fluid {
                density,
                modulus,
                gamma,
                viscosity,
                atmospheric_pressure,
            }) => println!(
                "material {id}: fluid (rho0 = {density}, modulus = {modulus:.3e}, \
                 gamma = {gamma}, viscosity = {viscosity:.3e}, p_atm = {atmospheric_pressure})"
            ),
            Some(MaterialModel::Structure {
                density,
                young_modulus,
                poisson_ratio,
            }) => println!(
                "material {id}: structure (rho0 = {density}, E = {young_modulus:.3e}, \
                 nu = {poisson_ratio})"
            ),
            None => {}
        }
    }
}
