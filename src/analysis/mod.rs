//! Analysis engines and the run driver.
//!
//! Purpose
//! -------
//! Dispatch one validated configuration record against one input field:
//! apply the shared preprocessing (time-range truncation, scale zeroing,
//! regular-grid resampling, optional lab-frame transform, middle-domain
//! restriction), then hand the prepared data to the perpendicular, time or
//! parallel engine. Each engine walks its windows strictly left to right,
//! carrying the warm-start guess, and returns an
//! [`results::AnalysisReport`] with one record per window.
pub mod errors;
pub mod parallel;
pub mod perp;
pub mod results;
pub mod time;

pub use errors::{AnalysisError, AnalysisResult};
pub use parallel::ParallelField;
pub use results::{AnalysisReport, FitRecord, Frame};
pub use time::FlowClass;

use ndarray::{Array1, Array3, s};

use crate::config::{AnalysisConfig, AnalysisKind, ConfigError, Domain};
use crate::field::{lab_frame, Field};
use crate::spectral::{RealSpaceField, SpectralTransform};

/// Input data of one run. The perpendicular and time analyses consume the
/// spectral field; the parallel analysis consumes real-space profiles
/// along the field line.
#[derive(Debug, Clone, Copy)]
pub enum AnalysisInput<'a> {
    Spectral(&'a Field),
    Parallel(&'a ParallelField),
}

/// Shared preprocessing of the spectral field, in pipeline order:
/// truncate to `time_range`, zero the configured scales, then either
/// transform to the lab frame (which resamples internally) or resample
/// onto a regular time grid.
fn prepare_spectral(field: &Field, cfg: &AnalysisConfig) -> AnalysisResult<(Field, Frame)> {
    cfg.validate(field.nt())?;
    let (start, end) = cfg.resolved_time_range(field.nt());
    let mut field = field.slice_time(start, end);
    if cfg.zero_bes_scales {
        field.zero_bes_scales();
    }
    if cfg.zero_zf_scales {
        field.zero_zf_scales();
    }

    // The rotation phase drops out of |f|², so the perpendicular analysis
    // always runs in the simulation frame.
    let lab = cfg.lab_frame && cfg.analysis == AnalysisKind::Time;
    if lab {
        Ok((lab_frame::to_lab_frame(&field, cfg)?, Frame::Lab))
    } else if cfg.time_interpolate {
        Ok((field.interpolate_time(cfg.time_interp_fac)?, Frame::Simulation))
    } else {
        Ok((field, Frame::Simulation))
    }
}

/// Restrict a real-space field to the centred physical box `box_size`
/// (metres). The grids are symmetric about zero, so the restriction keeps
/// the separation axes centred.
fn restrict_middle(real: &RealSpaceField, box_size: [f64; 2]) -> AnalysisResult<RealSpaceField> {
    let keep = |axis: &Array1<f64>, half: f64| -> Vec<usize> {
        axis.iter()
            .enumerate()
            .filter(|(_, &v)| v.abs() <= half)
            .map(|(i, _)| i)
            .collect()
    };
    let xs = keep(&real.x, box_size[0] / 2.0);
    let ys = keep(&real.y, box_size[1] / 2.0);
    if xs.is_empty() || ys.is_empty() {
        return Err(ConfigError::InvalidBoxSize { value: box_size }.into());
    }

    let nt = real.t.len();
    let mut data = Array3::<f64>::zeros((nt, xs.len(), ys.len()));
    for (i_new, &i) in xs.iter().enumerate() {
        for (j_new, &j) in ys.iter().enumerate() {
            data.slice_mut(s![.., i_new, j_new]).assign(&real.data.slice(s![.., i, j]));
        }
    }
    Ok(RealSpaceField {
        data,
        x: Array1::from_iter(xs.iter().map(|&i| real.x[i])),
        y: Array1::from_iter(ys.iter().map(|&j| real.y[j])),
        t: real.t.clone(),
    })
}

/// Run the configured analysis against the input data.
///
/// # Errors
/// - [`ConfigError::UnsupportedAnalysis`] for `zf` and `write_field`,
///   which are presentation tasks handled outside this crate.
/// - [`AnalysisError::InputMismatch`] when the input variant does not
///   match the selected analysis.
/// - Configuration and field errors that invalidate the whole run.
///   Per-window fit failures never surface here; they are recorded in the
///   returned report.
pub fn run(input: AnalysisInput<'_>, cfg: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    match (cfg.analysis, input) {
        (AnalysisKind::Perp, AnalysisInput::Spectral(field)) => {
            let (field, _) = prepare_spectral(field, cfg)?;
            perp::perp_analysis(&field, cfg)
        }
        (AnalysisKind::Time, AnalysisInput::Spectral(field)) => {
            let (field, frame) = prepare_spectral(field, cfg)?;
            let transform = SpectralTransform::for_field(&field)?;
            let norm = &cfg.normalization;
            let mut real = transform.real_space_field(&field, norm.rho_ref, norm.pitch_angle);
            if cfg.domain == Domain::Middle {
                real = restrict_middle(&real, cfg.box_size)?;
            }
            time::time_analysis(&real, cfg, frame)
        }
        (AnalysisKind::Par, AnalysisInput::Parallel(par)) => {
            parallel::parallel_analysis(par, cfg)
        }
        (AnalysisKind::Zf, _) => {
            Err(ConfigError::UnsupportedAnalysis { name: "zf" }.into())
        }
        (AnalysisKind::WriteField, _) => {
            Err(ConfigError::UnsupportedAnalysis { name: "write_field" }.into())
        }
        (AnalysisKind::Perp, AnalysisInput::Parallel(_)) => {
            Err(AnalysisError::InputMismatch { analysis: "perp", expected: "a spectral field" })
        }
        (AnalysisKind::Time, AnalysisInput::Parallel(_)) => {
            Err(AnalysisError::InputMismatch { analysis: "time", expected: "a spectral field" })
        }
        (AnalysisKind::Par, AnalysisInput::Spectral(_)) => {
            Err(AnalysisError::InputMismatch {
                analysis: "par",
                expected: "parallel field-line profiles",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;
    use num_complex::Complex64;

    fn spectral_field(nt: usize) -> Field {
        let mut data = Array3::zeros((nt, 4, 3));
        for it in 0..nt {
            data[[it, 1, 1]] = Complex64::new(1.0, 0.2);
        }
        Field::new(
            data,
            Array1::linspace(0.0, (nt - 1) as f64, nt),
            Array1::from_vec(vec![0.0, 0.5, 1.0, -0.5]),
            Array1::from_vec(vec![0.0, 0.2, 0.4]),
        )
        .unwrap()
    }

    #[test]
    // zf and write_field are handled by the external presentation layer.
    fn presentation_analyses_are_rejected() {
        let field = spectral_field(10);
        for (kind, name) in [(AnalysisKind::Zf, "zf"), (AnalysisKind::WriteField, "write_field")]
        {
            let cfg = AnalysisConfig { analysis: kind, ..AnalysisConfig::default() };
            let err = run(AnalysisInput::Spectral(&field), &cfg).unwrap_err();
            assert!(matches!(
                err,
                AnalysisError::Config(ConfigError::UnsupportedAnalysis { name: n }) if n == name
            ));
        }
    }

    #[test]
    fn mismatched_input_is_rejected() {
        let field = spectral_field(10);
        let cfg =
            AnalysisConfig { analysis: AnalysisKind::Par, ..AnalysisConfig::default() };
        assert!(matches!(
            run(AnalysisInput::Spectral(&field), &cfg),
            Err(AnalysisError::InputMismatch { analysis: "par", .. })
        ));
    }

    #[test]
    fn invalid_configuration_aborts_before_computing() {
        let field = spectral_field(10);
        let cfg = AnalysisConfig { time_slice: 50, ..AnalysisConfig::default() };
        assert!(matches!(
            run(AnalysisInput::Spectral(&field), &cfg),
            Err(AnalysisError::Config(ConfigError::InvalidTimeSlice { .. }))
        ));
    }

    #[test]
    // The middle-domain restriction keeps exactly the grid points inside
    // the box and stays centred on zero.
    fn restrict_middle_keeps_centred_box() {
        let real = RealSpaceField {
            data: Array3::from_shape_fn((2, 5, 5), |(t, i, j)| (t * 25 + i * 5 + j) as f64),
            x: Array1::linspace(-2.0, 2.0, 5),
            y: Array1::linspace(-1.0, 1.0, 5),
            t: Array1::linspace(0.0, 1.0, 2),
        };
        let small = restrict_middle(&real, [2.0, 1.0]).unwrap();
        assert_eq!(small.x.to_vec(), vec![-1.0, 0.0, 1.0]);
        assert_eq!(small.y.to_vec(), vec![-0.5, 0.0, 0.5]);
        assert_relative_eq!(small.data[[1, 0, 0]], real.data[[1, 1, 1]]);
    }

    #[test]
    // A box too small for a grid with no point at x = 0 selects nothing
    // and fails as a configuration error.
    fn restrict_middle_rejects_empty_selection() {
        let real = RealSpaceField {
            data: Array3::zeros((1, 4, 5)),
            x: Array1::linspace(-2.0, 2.0, 4),
            y: Array1::linspace(-1.0, 1.0, 5),
            t: Array1::linspace(0.0, 0.0, 1),
        };
        assert!(matches!(
            restrict_middle(&real, [0.1, 1.0]),
            Err(AnalysisError::Config(ConfigError::InvalidBoxSize { .. }))
        ));
    }
}
