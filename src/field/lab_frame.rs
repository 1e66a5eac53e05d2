//! Lab-frame transform — undo the rotating simulation frame.
//!
//! Purpose
//! -------
//! The simulation evolves fields in a frame co-rotating with the bulk
//! plasma. Experimental diagnostics live in the lab frame, so a field must
//! be multiplied by the toroidal-rotation phase factor
//! `exp(-i·n·ω₀·t)` before its time statistics can be compared with
//! measurements, where n is the toroidal mode number of each ky mode and
//! ω₀ the bulk angular frequency.
//!
//! Invariants & assumptions
//! ------------------------
//! - The rotation phase oscillates faster than anything in the simulation
//!   frame, so the time axis must be resampled onto a finer regular grid
//!   first (`time_interp_fac` > 1). Running without refinement is a
//!   correctness risk, flagged with a `warn`-level diagnostic rather than
//!   an error: analyses may deliberately accept reduced lab-frame time
//!   fidelity.
//! - Perpendicular-correlation results are insensitive to the transform
//!   (the phase factor drops out of |f(kx, ky)|²); only the time analysis
//!   consumes lab-frame fields.
use num_complex::Complex64;

use crate::config::AnalysisConfig;
use crate::field::data::Field;
use crate::field::errors::FieldResult;

/// Whether `time_interp_fac` is too coarse to resolve the rotation phase.
///
/// A factor of 1 leaves the time axis unchanged, so the phase factor is
/// sampled at the raw cadence and aliases. The threshold is deliberately
/// lenient; callers wanting stricter guarantees raise the factor.
pub fn insufficient_interpolation(time_interp_fac: usize) -> bool {
    time_interp_fac <= 1
}

/// Transform a simulation-frame field into the lab frame.
///
/// Steps, in order:
/// 1. Resample the time axis onto a regular grid refined by
///    `cfg.time_interp_fac` (mandatory; see module docs). Emits a `warn`
///    diagnostic when the factor is insufficient instead of failing.
/// 2. Multiply each (t, kx, ky) sample by `exp(-i·n·ω₀·t)`, with the
///    toroidal mode number `n = round(ky · a_minor/ρ_ref · dψ/dψN)` and
///    the time converted from normalized units to seconds via
///    a_minor/vth_ref.
///
/// # Errors
/// Propagates [`crate::field::errors::FieldError`] from the resampling
/// step.
pub fn to_lab_frame(field: &Field, cfg: &AnalysisConfig) -> FieldResult<Field> {
    if insufficient_interpolation(cfg.time_interp_fac) {
        log::warn!(
            "lab-frame transform with time_interp_fac = {}: the rotation phase is \
             under-resolved and lab-frame time statistics may be misleading",
            cfg.time_interp_fac
        );
    }
    let fine = field.interpolate_time(cfg.time_interp_fac)?;

    let norm = &cfg.normalization;
    let t_to_seconds = norm.a_minor / norm.vth_ref;
    let mode_numbers: Vec<f64> = fine
        .ky()
        .iter()
        .map(|&ky| (ky * norm.a_minor / norm.rho_ref * norm.dpsi_da).round())
        .collect();

    let mut data = fine.data().clone();
    for ((it, _, j), value) in data.indexed_iter_mut() {
        let phase = -mode_numbers[j] * norm.omega * fine.t()[it] * t_to_seconds;
        *value *= Complex64::from_polar(1.0, phase);
    }
    Field::new(data, fine.t().clone(), fine.kx().clone(), fine.ky().clone())
}
