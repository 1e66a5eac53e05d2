//! gk_correlation — correlation analysis of gyrokinetic turbulence output.
//!
//! Purpose
//! -------
//! Post-process turbulence-simulation field snapshots (spectral fields over
//! radial/poloidal wavenumber and time) into statistical correlation
//! properties: perpendicular correlation lengths, wavenumbers and tilt
//! angle, a correlation time per time window, and a parallel correlation
//! length along the field line.
//!
//! Key behaviors
//! -------------
//! - Build correlation functions from raw spectral fields, either through
//!   the 2D Wiener–Khinchin estimator or through direct convolution-based
//!   correlation ([`correlation`]).
//! - Partition the time axis into fixed-length, non-overlapping windows and
//!   fit a parametric correlation model to each window independently, with
//!   an adaptive warm-start guess carried from the last successful fit
//!   ([`fitting`], [`analysis`]).
//! - Optionally transform the field into the lab (non-rotating) frame with
//!   mandatory prior time resampling ([`field::lab_frame`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Reading the simulation's binary output format is out of scope; the
//!   field arrives as an in-memory complex array plus coordinate axes
//!   ([`field::Field`]).
//! - Per-window fit failures are recovered locally and never abort a run;
//!   only configuration or data errors that invalidate the whole run are
//!   fatal.
//!
//! Downstream usage
//! ----------------
//! - Build an [`config::AnalysisConfig`], construct a [`field::Field`] from
//!   the external data source, and call [`analysis::run`]. The resulting
//!   [`analysis::results::AnalysisReport`] holds one record per time window
//!   and can be persisted as a row-oriented CSV table.
pub mod analysis;
pub mod config;
pub mod correlation;
pub mod field;
pub mod fitting;
pub mod spectral;
