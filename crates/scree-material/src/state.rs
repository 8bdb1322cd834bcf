//! Per-particle constitutive state variables.
//!
//! The coupled model tracks an effective-stress measure and a current
//! density per particle. A contiguous index range can be exported as a
//! checkpoint snapshot and re-imported verbatim.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// State variables for up to `max_particles` particles.
#[derive(Debug, Clone)]
pub struct StateVars {
    /// Effective-stress measure per particle.
    pub estress: Vec<f64>,
    /// Current density per particle (kg/m³).
    pub rho: Vec<f64>,
}

impl StateVars {
    /// Zero-initialized state for `max_particles` particles.
    pub fn new(max_particles: usize) -> Self {
        Self {
            estress: vec![0.0; max_particles],
            rho: vec![0.0; max_particles],
        }
    }

    /// Number of particle slots.
    pub fn len(&self) -> usize {
        self.estress.len()
    }

    /// Whether there are no particle slots.
    pub fn is_empty(&self) -> bool {
        self.estress.is_empty()
    }

    /// Export the state of a contiguous particle range.
    pub fn snapshot(&self, range: Range<usize>) -> StateSnapshot {
        StateSnapshot {
            start: range.start,
            estress: self.estress[range.clone()].to_vec(),
            rho: self.rho[range].to_vec(),
        }
    }

    /// Re-import a snapshot at the range it was exported from.
    pub fn restore(&mut self, snapshot: &StateSnapshot) {
        let start = snapshot.start;
        let end = start + snapshot.estress.len();
        self.estress[start..end].copy_from_slice(&snapshot.estress);
        self.rho[start..end].copy_from_slice(&snapshot.rho);
    }
}

/// Checkpointable state of a contiguous particle range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// First particle index of the exported range.
    pub start: usize,
    /// Effective-stress values of the range.
    pub estress: Vec<f64>,
    /// Density values of the range.
    pub rho: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Square roots keep the values non-terminating in binary, so the
    // serde round-trip below would catch any lossy float formatting.
    fn populated(n: usize) -> StateVars {
        let mut vars = StateVars::new(n);
        for i in 0..n {
            vars.estress[i] = -1.5 * (i as f64).sqrt();
            vars.rho[i] = 1000.0 + (i as f64).sqrt();
        }
        vars
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let vars = populated(10);
        let snapshot = vars.snapshot(3..8);

        let mut other = StateVars::new(10);
        other.restore(&snapshot);

        assert_eq!(&other.estress[3..8], &vars.estress[3..8]);
        assert_eq!(&other.rho[3..8], &vars.rho[3..8]);
        // Outside the range stays untouched.
        assert_eq!(other.estress[0], 0.0);
        assert_eq!(other.rho[9], 0.0);
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let vars = populated(6);
        let snapshot = vars.snapshot(0..6);

        let encoded = serde_json::to_string(&snapshot).unwrap();
        let decoded: StateSnapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, snapshot);

        let mut restored = StateVars::new(6);
        restored.restore(&decoded);
        assert_eq!(restored.estress, vars.estress);
        assert_eq!(restored.rho, vars.rho);
    }
}
