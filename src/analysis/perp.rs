//! Perpendicular correlation analysis.
//!
//! Purpose
//! -------
//! Per time window: average the Wiener–Khinchin correlation function over
//! the window, restrict the fit domain to the centre of the separation
//! plane, and fit the tilted Gaussian. The fit guess is warm-started from
//! the last successful window; a failed window is recorded and skipped
//! without touching the guess.
//!
//! Conventions
//! -----------
//! - Separation coordinates are in normalized gyroradius units, matching
//!   the configured `perp_guess`. The zero-separation sample sits at
//!   (nkx/2, nky − 1) of the shifted correlation array, so the coordinate
//!   axes are built around those indices rather than taken from the
//!   physical grids.
use ndarray::{s, Array1, Array2};

use crate::analysis::errors::AnalysisResult;
use crate::analysis::results::{AnalysisReport, FitRecord, Frame};
use crate::config::AnalysisConfig;
use crate::correlation::{perp_correlation, TimeWindowSplitter};
use crate::field::Field;
use crate::fitting::{fit, FitData, FitGuess, FitOptions, TiltedGaussian};

pub const PERP_COLUMNS: &[&str] = &["lx", "ly", "kx", "ky", "theta"];

/// Separation axis of length `n` with zero at `centre`, step `step`.
fn separation_axis(n: usize, centre: usize, step: f64) -> Array1<f64> {
    Array1::from_iter((0..n).map(|i| (i as f64 - centre as f64) * step))
}

/// Restrict the averaged correlation to `±perp_fit_length` grid points
/// around zero separation and flatten it into fit data.
fn fit_domain(
    avg: &Array2<f64>, dx: &Array1<f64>, dy: &Array1<f64>, half_width: usize,
) -> FitData {
    let (nx, ny) = avg.dim();
    let (cx, cy) = (nx / 2, ny / 2);
    let x_lo = cx.saturating_sub(half_width);
    let x_hi = (cx + half_width + 1).min(nx);
    let y_lo = cy.saturating_sub(half_width);
    let y_hi = (cy + half_width + 1).min(ny);

    let npoints = (x_hi - x_lo) * (y_hi - y_lo);
    let mut coords = Array2::<f64>::zeros((npoints, 2));
    let mut values = Array1::<f64>::zeros(npoints);
    let mut row = 0;
    for i in x_lo..x_hi {
        for j in y_lo..y_hi {
            coords[[row, 0]] = dx[i];
            coords[[row, 1]] = dy[j];
            values[row] = avg[[i, j]];
            row += 1;
        }
    }
    FitData { coords, values }
}

/// Run the perpendicular analysis over every time window of `field`.
///
/// # Errors
/// Propagates configuration and field errors that invalidate the run;
/// per-window fit failures are recorded in the report instead.
pub fn perp_analysis(field: &Field, cfg: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    let corr = perp_correlation(field)?;
    let (nt, nkx, ny) = corr.dim();

    // Box lengths in gyroradius units; the grids span ±2π/k₁ like the
    // physical grids, with zero pinned to the shifted zero-lag indices.
    let step_x = 4.0 * std::f64::consts::PI / (field.kx()[1] * (nkx - 1) as f64);
    let step_y = 4.0 * std::f64::consts::PI / (field.ky()[1] * (ny - 1) as f64);
    let dx = separation_axis(nkx, nkx / 2, step_x);
    let dy = separation_axis(ny, ny / 2, step_y);

    let windows = TimeWindowSplitter::new(cfg.time_slice)?.split(nt)?;
    let model = TiltedGaussian { ky_free: cfg.ky_free };
    let mut guess = FitGuess::seeded(&cfg.perp_guess);
    let opts = FitOptions::default();
    let mut records = Vec::with_capacity(windows.len());

    for window in &windows {
        let avg =
            corr.slice(s![window.start..window.end, .., ..]).sum_axis(ndarray::Axis(0))
                / window.len() as f64;
        let data = fit_domain(&avg, &dx, &dy, cfg.perp_fit_length);
        let seed = model.params_from_guess(&guess.current().to_vec());
        let guess_used = guess.current().to_vec();

        match fit(&model, &data, &seed, &opts) {
            Ok(outcome) => {
                let report = model.report(&outcome.params);
                guess.accept(&report);
                records.push(FitRecord::success(window.index, guess_used, report.to_vec()));
            }
            Err(err) => {
                log::warn!("perp fit failed for window {}: {err}", window.index);
                records.push(FitRecord::failure(window.index, guess_used));
            }
        }
    }

    Ok(AnalysisReport {
        analysis: "perp",
        frame: Frame::Simulation,
        param_columns: PERP_COLUMNS,
        label_column: None,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn separation_axis_is_zero_at_centre() {
        let axis = separation_axis(6, 3, 0.5);
        assert_relative_eq!(axis[3], 0.0);
        assert_relative_eq!(axis[0], -1.5);
        assert_relative_eq!(axis[5], 1.0);
    }

    #[test]
    // The restricted domain is a (2w+1)² block around the centre, clamped
    // to the array bounds.
    fn fit_domain_restricts_around_centre() {
        let avg = Array2::from_shape_fn((8, 7), |(i, j)| (i * 10 + j) as f64);
        let dx = separation_axis(8, 4, 1.0);
        let dy = separation_axis(7, 3, 1.0);

        let data = fit_domain(&avg, &dx, &dy, 1);
        assert_eq!(data.values.len(), 9);
        assert_relative_eq!(data.coords[[4, 0]], 0.0);
        assert_relative_eq!(data.coords[[4, 1]], 0.0);
        assert_relative_eq!(data.values[4], avg[[4, 3]]);

        // A half-width beyond the array keeps every point.
        let data = fit_domain(&avg, &dx, &dy, 100);
        assert_eq!(data.values.len(), 56);
    }
}
