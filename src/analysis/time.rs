//! Time correlation analysis.
//!
//! Purpose
//! -------
//! Per time window: build C(Δt, Δy) from the cached real-space field,
//! follow the correlation peak across poloidal separations, classify the
//! flow from the peak drift, and fit the matching envelope model to
//! extract a correlation time.
//!
//! Key behaviors
//! -------------
//! - Peaks drifting to positive Δt with Δy mean structures advected with
//!   the flow: the peak heights trace a decaying exponential over the peak
//!   times. Drift to negative Δt is the opposite flow direction, fit with
//!   the growing variant of the same model.
//! - When the peaks cluster near Δt = 0 (drift below `drift_threshold` of
//!   the window lag span) the flow is classified stationary and a Gaussian
//!   envelope is fit to the central (Δy = 0) trace instead.
//! - Fitted correlation times outside (0, `time_max`] are rejected; the
//!   window is recorded failed and the warm-start guess stays unchanged.
use ndarray::s;

use crate::analysis::errors::AnalysisResult;
use crate::analysis::results::{AnalysisReport, FitRecord, Frame};
use crate::config::AnalysisConfig;
use crate::correlation::{time_correlation, TimeWindowSplitter};
use crate::fitting::{fit, ExpEnvelope, FitData, FitGuess, FitOptions, GaussianEnvelope};
use crate::spectral::RealSpaceField;

pub const TIME_COLUMNS: &[&str] = &["tau"];

/// Flow classification of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowClass {
    Decaying,
    Growing,
    Stationary,
}

impl FlowClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowClass::Decaying => "decaying",
            FlowClass::Growing => "growing",
            FlowClass::Stationary => "stationary",
        }
    }
}

/// Peak of the correlation trace at one poloidal separation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Peak {
    time: f64,
    height: f64,
}

/// Locate the correlation peak per Δy column, from Δy = 0 out to
/// `npeaks` separations on the positive side. The correlation is
/// symmetric under simultaneous lag reversal, so one side carries all the
/// information; the drift direction survives in the sign of the peak
/// times.
fn trace_peaks(
    corr: &ndarray::Array2<f64>, dt_step: f64, npeaks: usize,
) -> Vec<Peak> {
    let (nlags, nsep) = corr.dim();
    let (k0, l0) = (nlags / 2, nsep / 2);
    let npeaks = npeaks.min(nsep - 1 - l0);

    (0..=npeaks)
        .map(|m| {
            let column = corr.slice(s![.., l0 + m]);
            let mut best = (0, f64::NEG_INFINITY);
            for (k, &v) in column.iter().enumerate() {
                if v > best.1 {
                    best = (k, v);
                }
            }
            Peak { time: (best.0 as f64 - k0 as f64) * dt_step, height: best.1 }
        })
        .collect()
}

/// Classify the flow from the drift of the off-centre peak times.
///
/// The Δy = 0 peak sits at Δt = 0 by construction and carries no drift
/// information, so only the off-centre peaks enter the mean.
fn classify(peaks: &[Peak], lag_span: f64, threshold: f64) -> FlowClass {
    if peaks.len() < 2 {
        return FlowClass::Stationary;
    }
    let drift =
        peaks[1..].iter().map(|p| p.time).sum::<f64>() / (peaks.len() - 1) as f64;
    if drift.abs() <= threshold * lag_span {
        FlowClass::Stationary
    } else if drift > 0.0 {
        FlowClass::Decaying
    } else {
        FlowClass::Growing
    }
}

/// Run the time analysis over every window of the cached real-space field.
///
/// # Errors
/// Propagates configuration errors from the window split; per-window fit
/// failures are recorded in the report instead.
pub fn time_analysis(
    real: &RealSpaceField, cfg: &AnalysisConfig, frame: Frame,
) -> AnalysisResult<AnalysisReport> {
    let nt = real.t.len();
    let dt_step = (real.t[nt - 1] - real.t[0]) / (nt - 1) as f64;
    let windows = TimeWindowSplitter::new(cfg.time_slice)?.split(nt)?;
    let mut guess = FitGuess::seeded(&cfg.time_guess);
    let opts = FitOptions::default();
    let mut records = Vec::with_capacity(windows.len());

    for window in &windows {
        let corr = time_correlation(real.data.slice(s![window.start..window.end, .., ..]));
        let lag_span = (window.len() - 1) as f64 * dt_step;
        let peaks = trace_peaks(&corr, dt_step, cfg.npeaks_fit);
        let flow = classify(&peaks, lag_span, cfg.drift_threshold);
        let guess_used = guess.current().to_vec();
        let seed = guess.current().clone();

        let outcome = match flow {
            FlowClass::Stationary => {
                // Central trace C(Δt, 0) over every lag.
                let (nlags, nsep) = corr.dim();
                let k0 = nlags / 2;
                let lags: Vec<f64> =
                    (0..nlags).map(|k| (k as f64 - k0 as f64) * dt_step).collect();
                let trace: Vec<f64> = corr.slice(s![.., nsep / 2]).to_vec();
                let model = GaussianEnvelope { time_max: cfg.time_max };
                fit(&model, &FitData::one_dimensional(&lags, &trace), &seed, &opts)
            }
            FlowClass::Decaying | FlowClass::Growing => {
                let times: Vec<f64> = peaks.iter().map(|p| p.time).collect();
                let heights: Vec<f64> = peaks.iter().map(|p| p.height).collect();
                let model = ExpEnvelope {
                    growing: flow == FlowClass::Growing,
                    time_max: cfg.time_max,
                };
                fit(&model, &FitData::one_dimensional(&times, &heights), &seed, &opts)
            }
        };

        match outcome {
            Ok(outcome) => {
                let tau = outcome.params[1].abs();
                guess.accept(&[outcome.params[0].abs(), tau]);
                records.push(
                    FitRecord::success(window.index, guess_used, vec![tau])
                        .with_label(flow.as_str()),
                );
            }
            Err(err) => {
                log::warn!(
                    "time fit failed for window {} ({} flow): {err}",
                    window.index,
                    flow.as_str()
                );
                records
                    .push(FitRecord::failure(window.index, guess_used).with_label(flow.as_str()));
            }
        }
    }

    Ok(AnalysisReport {
        analysis: "time",
        frame,
        param_columns: TIME_COLUMNS,
        label_column: Some("flow"),
        records,
    })
}
