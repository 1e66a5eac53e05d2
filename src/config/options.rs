//! Option record and normalization constants for a correlation run.
use serde::Deserialize;

use crate::config::errors::{ConfigError, ConfigResult};

/// Which part of the radial domain the analysis operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Use the full simulation box.
    Full,
    /// Restrict to a centred box of physical size `box_size` (in metres).
    Middle,
}

/// Analysis selected for the run.
///
/// `Zf` and `WriteField` are recognized for completeness, but they are thin
/// output/presentation tasks handled outside this crate; dispatching them
/// through the pipeline yields [`ConfigError::UnsupportedAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Perp,
    Time,
    Par,
    Zf,
    WriteField,
}

/// Machine and reference-species normalization constants.
///
/// Fields
/// ------
/// - `a_minor`: minor radius of the device, in metres.
/// - `vth_ref`: thermal velocity of the reference species, in m/s.
/// - `rho_ref`: Larmor radius of the reference species, in metres.
/// - `pitch_angle`: pitch angle of the field lines, in radians; maps the
///   toroidal plane onto the poloidal plane for the y grid.
/// - `bref`, `nref`, `tref`: reference magnetic field, density and
///   temperature, carried through for reporting.
/// - `omega`: bulk plasma angular frequency ω₀, in rad/s, used by the
///   lab-frame transform.
/// - `dpsi_da`: dψ/dψN flux-label derivative entering the toroidal mode
///   number relation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Normalization {
    pub a_minor: f64,
    pub vth_ref: f64,
    pub rho_ref: f64,
    pub pitch_angle: f64,
    pub bref: f64,
    pub nref: f64,
    pub tref: f64,
    pub omega: f64,
    pub dpsi_da: f64,
}

impl Default for Normalization {
    fn default() -> Self {
        // Reference values of the MAST case the original tool shipped with.
        Normalization {
            a_minor: 0.58044,
            vth_ref: 1.4587e5,
            rho_ref: 6.0791e-3,
            pitch_angle: 0.6001,
            bref: 0.8,
            nref: 1.3e19,
            tref: 2.2e2,
            omega: 4.7144e4,
            dpsi_da: 1.09,
        }
    }
}

/// AnalysisConfig — every recognized option of a correlation run.
///
/// Parameters
/// ----------
/// Construct via struct literal over [`AnalysisConfig::default`] (or
/// deserialize from the external configuration layer), then call
/// [`AnalysisConfig::validate`] before handing the record to
/// [`crate::analysis::run`].
///
/// Fields
/// ------
/// - `domain`: full box or centred middle box.
/// - `analysis`: which analysis to run.
/// - `field_name`: name of the field variable, carried through to output.
/// - `species_index`, `theta_index`: indices already applied by the
///   external data source when reducing the raw array; recorded here for
///   provenance only.
/// - `time_interpolate`: resample the time axis onto a regular grid before
///   any spectral operation in time.
/// - `time_interp_fac`: resampling refinement factor; the lab-frame
///   transform requires a factor above 1 to resolve the rotation phase.
/// - `zero_bes_scales`: zero modes larger than the BES viewing area
///   (|kx| < 0.25, ky < 0.5 in normalized units).
/// - `zero_zf_scales`: zero the zonal-flow (ky = 0) modes.
/// - `lab_frame`: apply the toroidal-rotation phase factor before the time
///   analysis.
/// - `time_slice`: window length in samples for per-window statistics.
/// - `box_size`: physical (x, y) box sides in metres for `Domain::Middle`.
/// - `time_range`: `[start, end)` sample range analyzed; `end = 0` means
///   "to the end of the axis".
/// - `perp_fit_length`: half-width, in grid points, of the restricted
///   perpendicular fit domain around zero separation.
/// - `perp_guess`: initial `[lx, ly, kx, ky, theta]` for the tilted
///   Gaussian, in normalized gyroradius units (ky ignored when `ky_free`
///   is false).
/// - `ky_free`: when false, ky is pinned to 2π/ly rather than fitted.
/// - `npeaks_fit`: number of correlation-function peaks per side used in
///   the time-correlation fit.
/// - `time_guess`: initial `[amplitude, tau]` for the time fit.
/// - `time_max`: sanity bound on the fitted correlation time.
/// - `par_guess`: initial `[lz, kz]` for the parallel fit, in metres and
///   inverse metres.
/// - `drift_threshold`: fraction of the window lag span below which peak
///   drift counts as "no drift" (stationary flow). Tunable heuristic.
/// - `normalization`: see [`Normalization`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub domain: Domain,
    pub analysis: AnalysisKind,
    pub field_name: String,
    pub species_index: Option<usize>,
    pub theta_index: Option<usize>,
    pub time_interpolate: bool,
    pub time_interp_fac: usize,
    pub zero_bes_scales: bool,
    pub zero_zf_scales: bool,
    pub lab_frame: bool,
    pub time_slice: usize,
    pub box_size: [f64; 2],
    pub time_range: [usize; 2],
    pub perp_fit_length: usize,
    pub perp_guess: Vec<f64>,
    pub ky_free: bool,
    pub npeaks_fit: usize,
    pub time_guess: [f64; 2],
    pub time_max: f64,
    pub par_guess: [f64; 2],
    pub drift_threshold: f64,
    pub normalization: Normalization,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            domain: Domain::Full,
            analysis: AnalysisKind::Perp,
            field_name: "ntot_t".to_string(),
            species_index: Some(0),
            theta_index: None,
            time_interpolate: true,
            time_interp_fac: 1,
            zero_bes_scales: false,
            zero_zf_scales: false,
            lab_frame: false,
            time_slice: 50,
            box_size: [0.2, 0.1],
            time_range: [0, 0],
            perp_fit_length: 20,
            perp_guess: vec![10.0, 10.0, 0.1, 0.1, 0.0],
            ky_free: false,
            npeaks_fit: 5,
            time_guess: [1.0, 10.0],
            time_max: 1.0e3,
            par_guess: [1.0, 1.0],
            drift_threshold: 0.1,
            normalization: Normalization::default(),
        }
    }
}

impl AnalysisConfig {
    /// Number of free parameters expected in `perp_guess`.
    ///
    /// The tilted Gaussian always takes `[lx, ly, kx, ky, theta]` in the
    /// guess; when `ky_free` is false the ky entry is carried but pinned to
    /// 2π/ly inside the fit.
    pub const PERP_GUESS_LEN: usize = 5;

    /// Validate the whole record, failing fast on the first violation.
    ///
    /// `nt` is the length of the available time axis; it is needed here
    /// because `time_slice` and `time_range` are constrained by the data.
    ///
    /// # Errors
    /// Returns the matching [`ConfigError`] for the first invalid field.
    /// A validation failure is fatal: no computation may start from an
    /// invalid record.
    pub fn validate(&self, nt: usize) -> ConfigResult<()> {
        let (start, end) = self.resolved_time_range(nt);
        if start >= end || end > nt {
            return Err(ConfigError::InvalidTimeRange { start, end, nt });
        }
        if self.time_slice == 0 || self.time_slice > end - start {
            return Err(ConfigError::InvalidTimeSlice {
                time_slice: self.time_slice,
                nt: end - start,
            });
        }
        if self.time_interp_fac == 0 {
            return Err(ConfigError::InvalidInterpFactor { value: self.time_interp_fac });
        }
        if self.npeaks_fit == 0 {
            return Err(ConfigError::InvalidNpeaksFit { value: self.npeaks_fit });
        }
        if self.perp_guess.len() != Self::PERP_GUESS_LEN {
            return Err(ConfigError::GuessLengthMismatch {
                analysis: "perp",
                expected: Self::PERP_GUESS_LEN,
                found: self.perp_guess.len(),
            });
        }
        for (i, &g) in self.perp_guess.iter().enumerate() {
            // lx and ly seed lengths and must be positive.
            if !g.is_finite() || (i < 2 && g <= 0.0) {
                return Err(ConfigError::InvalidGuess { analysis: "perp", index: i, value: g });
            }
        }
        for (i, &g) in self.time_guess.iter().enumerate() {
            if !g.is_finite() || g <= 0.0 {
                return Err(ConfigError::InvalidGuess { analysis: "time", index: i, value: g });
            }
        }
        for (i, &g) in self.par_guess.iter().enumerate() {
            if !g.is_finite() || (i == 0 && g <= 0.0) {
                return Err(ConfigError::InvalidGuess { analysis: "par", index: i, value: g });
            }
        }
        if !self.time_max.is_finite() || self.time_max <= 0.0 {
            return Err(ConfigError::InvalidTimeMax { value: self.time_max });
        }
        if !(0.0..1.0).contains(&self.drift_threshold) || self.drift_threshold == 0.0 {
            return Err(ConfigError::InvalidDriftThreshold { value: self.drift_threshold });
        }
        if self.domain == Domain::Middle
            && (self.box_size[0] <= 0.0 || self.box_size[1] <= 0.0)
        {
            return Err(ConfigError::InvalidBoxSize { value: self.box_size });
        }
        for (name, value) in [
            ("a_minor", self.normalization.a_minor),
            ("vth_ref", self.normalization.vth_ref),
            ("rho_ref", self.normalization.rho_ref),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidNormalization { name, value });
            }
        }
        if !self.normalization.omega.is_finite() {
            return Err(ConfigError::InvalidNormalization {
                name: "omega",
                value: self.normalization.omega,
            });
        }
        Ok(())
    }

    /// Resolve `time_range` against the axis length, mapping `end = 0` to
    /// "all remaining samples".
    pub fn resolved_time_range(&self, nt: usize) -> (usize, usize) {
        let start = self.time_range[0];
        let end = if self.time_range[1] == 0 { nt } else { self.time_range[1] };
        (start, end)
    }
}
