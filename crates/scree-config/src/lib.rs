//! Keyed configuration parameters for scene setup.
//!
//! Surface properties and material models are configured through keyed
//! structures (JSON objects). `Params` wraps one object and offers typed
//! lookups: `required` raises `MissingParameter`, `optional` falls back to
//! a default.

pub mod error;

pub use error::{Result, SetupError};

use serde_json::{Map, Value};

/// A keyed parameter table for one registration call.
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Map<String, Value>,
}

impl Params {
    /// Create an empty parameter table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object value.
    ///
    /// Fails with `InvalidParameter` when the value is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(SetupError::InvalidParameter(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Insert a value under `key`, replacing any previous entry.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.entries.insert(key.to_owned(), value.into());
        self
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Required numeric parameter.
    pub fn required_f64(&self, key: &str) -> Result<f64> {
        self.raw_required(key)?
            .as_f64()
            .ok_or_else(|| SetupError::InvalidParameter(format!("{key} must be a number")))
    }

    /// Required unsigned integer parameter.
    pub fn required_usize(&self, key: &str) -> Result<usize> {
        self.raw_required(key)?
            .as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| {
                SetupError::InvalidParameter(format!("{key} must be a non-negative integer"))
            })
    }

    /// Required boolean parameter.
    pub fn required_bool(&self, key: &str) -> Result<bool> {
        self.raw_required(key)?
            .as_bool()
            .ok_or_else(|| SetupError::InvalidParameter(format!("{key} must be a boolean")))
    }

    /// Optional numeric parameter with a default.
    pub fn optional_f64(&self, key: &str, default: f64) -> Result<f64> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_f64()
                .ok_or_else(|| SetupError::InvalidParameter(format!("{key} must be a number"))),
        }
    }

    fn raw_required(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| SetupError::MissingParameter(key.to_owned()))
    }
}

/// Reject a material id that exceeds the configured maximum.
pub fn check_material_id(id: usize, max: usize) -> Result<()> {
    if id < max {
        Ok(())
    } else {
        Err(SetupError::IndexOutOfRange { id, max })
    }
}
