//! Error types for the optic_core library.

use crate::Field;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for optic_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A field was supplied but could not be read as a number
    #[error("Invalid {field} value: {value:?}")]
    InvalidValue { field: Field, value: String },

    /// Sphere, cylinder and axis were not supplied in an allowed pattern
    #[error("{}", crate::validator::COMBINATION_MESSAGE)]
    InvalidCombination,

    /// Vertex compensation has no finite result for this power and distance
    #[error("Cannot compensate {power:+.2} D at a vertex distance of {vertex_distance_mm} mm")]
    DegenerateVertex { power: f64, vertex_distance_mm: f64 },
}
