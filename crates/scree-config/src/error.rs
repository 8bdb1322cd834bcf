//! Setup-time error types.
//!
//! Every error here is raised while a scene is being configured, never
//! during stepping. Stepping-time anomalies (contact-capacity overflow)
//! are absorbed by design and never surface as errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("material id {id} out of range (max {max})")]
    IndexOutOfRange { id: usize, max: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, SetupError>;
