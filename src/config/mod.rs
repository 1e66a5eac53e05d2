//! Analysis configuration — the validated option record driving a run.
//!
//! Purpose
//! -------
//! Collect every recognized analysis option in one explicit, serde-friendly
//! record, [`AnalysisConfig`], together with the machine/experiment
//! normalization constants, [`Normalization`]. Parsing the on-disk
//! configuration format is an external concern; this module only defines
//! the record and validates it before any computation starts.
//!
//! Key behaviors
//! -------------
//! - Carry analysis selection ([`AnalysisKind`]), domain selection
//!   ([`Domain`]), preprocessing switches, time-window length, fit guesses
//!   and fit bounds with the defaults of the original analysis tool.
//! - Validate the whole record up front via [`AnalysisConfig::validate`];
//!   an invalid record aborts the run before any field data is touched.
//!
//! Conventions
//! -----------
//! - Lengths in the perpendicular guess are in normalized gyroradius units;
//!   the parallel guess is in metres and inverse metres because no
//!   normalized unit exists along the parallel direction.
//! - Errors use the dedicated [`errors::ConfigError`] enum and the alias
//!   [`errors::ConfigResult`].
pub mod errors;
pub mod options;

pub use errors::{ConfigError, ConfigResult};
pub use options::{AnalysisConfig, AnalysisKind, Domain, Normalization};
