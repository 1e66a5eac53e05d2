//! Field data model and preprocessing.
//!
//! Purpose
//! -------
//! Define [`Field`], the in-memory representation of one reduced
//! simulation field f(t, kx, ky) with its coordinate axes, plus the
//! preprocessing applied before any correlation: scale zeroing, time-range
//! truncation, regular-grid time resampling, and the lab-frame transform.
//!
//! Downstream usage
//! ----------------
//! - The external data source (file reader) builds a [`Field`] via
//!   [`Field::new`]; everything after that point stays inside this crate.
//! - [`crate::analysis::run`] applies the configured preprocessing in a
//!   fixed order: time range → scale zeroing → time interpolation →
//!   optional lab-frame transform.
pub mod data;
pub mod errors;
pub mod lab_frame;

pub use data::Field;
pub use errors::{FieldError, FieldResult};
