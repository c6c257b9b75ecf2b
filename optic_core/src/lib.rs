#![forbid(unsafe_code)]

//! Validation, formatting and conversion of optical prescriptions.
//!
//! This crate provides:
//! - Quarter-diopter numeric helpers and signed power formatting
//! - Eyeglass prescription validation and plus-to-minus cylinder transposition
//! - Contact-lens conversion with vertex-distance compensation
//! - CSV batch conversion
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod numeric;
pub mod validator;
pub mod converter;
pub mod batch;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, ConversionConfig};
pub use numeric::{format_power, is_multiple_of_quarter, round_to_nearest_quarter};
pub use validator::{
    check_sph_cyl_axis_combo, transform_sph_cyl_axis, validate_add, validate_axis, validate_cyl,
    validate_pd, validate_prescription, validate_sg, validate_sph, validate_vertex_distance,
};
pub use converter::{
    convert_to_spheric, convert_to_spheric_with, convert_to_toric, convert_to_toric_with,
    spherical_equivalent, vertex_compensate,
};
pub use batch::{convert_csv, BatchSummary, LensKind};
