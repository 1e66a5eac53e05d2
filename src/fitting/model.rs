//! Parametric correlation models and their acceptance predicates.
//!
//! Purpose
//! -------
//! The three analysis engines share one fitting pattern: a nonlinear model
//! plus an initial guess plus bounded iterations plus an accept/reject
//! decision. This module supplies the model side of that pattern through
//! the [`CorrelationModel`] trait and its concrete implementations:
//!
//! - [`TiltedGaussian`] — the perpendicular correlation surface;
//! - [`ExpEnvelope`] — decaying/growing envelope over correlation peaks;
//! - [`GaussianEnvelope`] — the stationary-flow central-trace envelope;
//! - [`OscillatingGaussian`] — the parallel correlation profile.
//!
//! Conventions
//! -----------
//! - Parameters that act as squared lengths are sign-degenerate; models
//!   evaluate them through their squares and report absolute values, so
//!   the optimizer is free to wander across zero without being rejected
//!   for a mirror solution.
//! - Acceptance predicates express *physical* sanity (positive, bounded
//!   correlation times), not solver health; solver health is handled by
//!   the runner in [`crate::fitting::least_squares`].
use ndarray::Array1;
use std::f64::consts::PI;

use crate::fitting::errors::{FitError, FitResult};

/// Free-parameter vector of a model fit.
pub type Params = Array1<f64>;

/// A nonlinear correlation model fit by the shared least-squares runner.
pub trait CorrelationModel {
    /// Number of free parameters.
    fn n_params(&self) -> usize;

    /// Model value at one separation coordinate (`coord` has one entry
    /// per separation axis: `[Δx, Δy]`, `[Δt]` or `[Δz]`).
    fn value(&self, params: &Params, coord: &[f64]) -> f64;

    /// Physical acceptance predicate applied to converged parameters.
    ///
    /// # Errors
    /// [`FitError::SanityViolation`] when a parameter leaves its physical
    /// domain; the engines treat this exactly like non-convergence.
    fn accept(&self, params: &Params) -> FitResult<()>;
}

/// Tilted 2D Gaussian for the perpendicular correlation function:
///
/// `C(Δx, Δy) = exp(-(Δx'/lx)² - (Δy'/ly)²) · cos(kx·Δx' + ky·Δy')`
///
/// where (Δx', Δy') is (Δx, Δy) rotated by the tilt angle θ.
///
/// Parameter layout is `[lx, ly, kx, ky, θ]` when `ky_free`, otherwise
/// `[lx, ly, kx, θ]` with ky pinned to 2π/|ly|. The pinned form reflects
/// that a correlation function built from a dominant poloidal mode has its
/// oscillation wavelength tied to the envelope width; freeing ky is a
/// configuration choice.
#[derive(Debug, Clone, Copy)]
pub struct TiltedGaussian {
    pub ky_free: bool,
}

impl TiltedGaussian {
    /// Build the initial parameter vector from the configured guess
    /// `[lx, ly, kx, ky, θ]`, dropping the ky entry when it is pinned.
    pub fn params_from_guess(&self, guess: &[f64]) -> Params {
        if self.ky_free {
            Array1::from_vec(guess.to_vec())
        } else {
            Array1::from_vec(vec![guess[0], guess[1], guess[2], guess[4]])
        }
    }

    /// Expand a fitted parameter vector into `[lx, ly, kx, ky, θ]`,
    /// resolving the pinned ky and normalizing sign-degenerate lengths.
    pub fn report(&self, params: &Params) -> [f64; 5] {
        let lx = params[0].abs();
        let ly = params[1].abs();
        let kx = params[2];
        if self.ky_free {
            [lx, ly, kx, params[3], params[4]]
        } else {
            [lx, ly, kx, 2.0 * PI / ly, params[3]]
        }
    }

    fn unpack(&self, params: &Params) -> (f64, f64, f64, f64, f64) {
        let (lx, ly, kx) = (params[0], params[1], params[2]);
        if self.ky_free {
            (lx, ly, kx, params[3], params[4])
        } else {
            (lx, ly, kx, 2.0 * PI / ly.abs(), params[3])
        }
    }
}

impl CorrelationModel for TiltedGaussian {
    fn n_params(&self) -> usize {
        if self.ky_free {
            5
        } else {
            4
        }
    }

    fn value(&self, params: &Params, coord: &[f64]) -> f64 {
        let (lx, ly, kx, ky, theta) = self.unpack(params);
        let (dx, dy) = (coord[0], coord[1]);
        let xr = dx * theta.cos() + dy * theta.sin();
        let yr = -dx * theta.sin() + dy * theta.cos();
        (-(xr / lx).powi(2) - (yr / ly).powi(2)).exp() * (kx * xr + ky * yr).cos()
    }

    fn accept(&self, params: &Params) -> FitResult<()> {
        for (param, value) in [("lx", params[0]), ("ly", params[1])] {
            if value == 0.0 {
                return Err(FitError::SanityViolation {
                    param,
                    value,
                    reason: "correlation length collapsed to zero",
                });
            }
        }
        Ok(())
    }
}

/// Exponential envelope `A·exp(s·t/τ)` over correlation-peak heights.
///
/// `s = −1` for a decaying envelope (flow carrying structures through the
/// domain in the positive direction), `s = +1` for the growing variant
/// with the opposite flow direction. τ is the correlation time.
#[derive(Debug, Clone, Copy)]
pub struct ExpEnvelope {
    pub growing: bool,
    pub time_max: f64,
}

impl CorrelationModel for ExpEnvelope {
    fn n_params(&self) -> usize {
        2
    }

    fn value(&self, params: &Params, coord: &[f64]) -> f64 {
        let (amp, tau) = (params[0], params[1]);
        let sign = if self.growing { 1.0 } else { -1.0 };
        amp * (sign * coord[0] / tau).exp()
    }

    fn accept(&self, params: &Params) -> FitResult<()> {
        check_tau(params[1], self.time_max)
    }
}

/// Gaussian envelope `A·exp(-(t/τ)²)` for the stationary-flow case, fit
/// to the central (Δy = 0) correlation trace.
#[derive(Debug, Clone, Copy)]
pub struct GaussianEnvelope {
    pub time_max: f64,
}

impl CorrelationModel for GaussianEnvelope {
    fn n_params(&self) -> usize {
        2
    }

    fn value(&self, params: &Params, coord: &[f64]) -> f64 {
        let (amp, tau) = (params[0], params[1]);
        amp * (-(coord[0] / tau).powi(2)).exp()
    }

    fn accept(&self, params: &Params) -> FitResult<()> {
        // The square makes tau sign-degenerate; bound its magnitude.
        check_tau(params[1].abs(), self.time_max)
    }
}

/// Oscillating Gaussian `exp(-(Δz/lz)²)·cos(kz·Δz)` for the parallel
/// correlation function. No amplitude parameter: the input correlation is
/// normalized to 1 at zero separation.
#[derive(Debug, Clone, Copy)]
pub struct OscillatingGaussian;

impl CorrelationModel for OscillatingGaussian {
    fn n_params(&self) -> usize {
        2
    }

    fn value(&self, params: &Params, coord: &[f64]) -> f64 {
        let (lz, kz) = (params[0], params[1]);
        (-(coord[0] / lz).powi(2)).exp() * (kz * coord[0]).cos()
    }

    fn accept(&self, params: &Params) -> FitResult<()> {
        if params[0] == 0.0 {
            return Err(FitError::SanityViolation {
                param: "lz",
                value: params[0],
                reason: "parallel correlation length collapsed to zero",
            });
        }
        Ok(())
    }
}

fn check_tau(tau: f64, time_max: f64) -> FitResult<()> {
    if !tau.is_finite() || tau <= 0.0 {
        return Err(FitError::SanityViolation {
            param: "tau",
            value: tau,
            reason: "correlation time must be positive",
        });
    }
    if tau > time_max {
        return Err(FitError::SanityViolation {
            param: "tau",
            value: tau,
            reason: "correlation time exceeds time_max",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // With ky pinned, the reported ky is exactly 2π/ly for any fitted ly.
    fn pinned_ky_is_two_pi_over_ly() {
        let model = TiltedGaussian { ky_free: false };
        let report = model.report(&array![3.0, 5.0, 0.2, 0.1]);
        assert_relative_eq!(report[3], 2.0 * PI / 5.0);
        // Sign-degenerate ly still reports a positive length and ky.
        let report = model.report(&array![3.0, -5.0, 0.2, 0.1]);
        assert_relative_eq!(report[1], 5.0);
        assert_relative_eq!(report[3], 2.0 * PI / 5.0);
    }

    #[test]
    fn tilted_gaussian_is_one_at_zero_separation() {
        for ky_free in [false, true] {
            let model = TiltedGaussian { ky_free };
            let params = model.params_from_guess(&[2.0, 3.0, 0.5, 0.4, 0.3]);
            assert_eq!(params.len(), model.n_params());
            assert_relative_eq!(model.value(&params, &[0.0, 0.0]), 1.0);
        }
    }

    #[test]
    // Tilt rotates the anisotropy axes: with lx != ly the value along the
    // rotated major axis matches the unrotated model evaluated on-axis.
    fn tilt_rotates_the_axes() {
        let tilted = TiltedGaussian { ky_free: true };
        let theta: f64 = 0.6;
        let params = array![2.0, 0.7, 0.0, 0.0, theta];
        let straight = array![2.0, 0.7, 0.0, 0.0, 0.0];
        let r = 1.3;
        let along_major = [r * theta.cos(), r * theta.sin()];
        assert_relative_eq!(
            tilted.value(&params, &along_major),
            tilted.value(&straight, &[r, 0.0]),
            epsilon = 1e-12
        );
    }

    #[test]
    fn exp_envelope_signs_reflect_flow_direction() {
        let params = array![1.0, 2.0];
        let decaying = ExpEnvelope { growing: false, time_max: 100.0 };
        let growing = ExpEnvelope { growing: true, time_max: 100.0 };
        assert!(decaying.value(&params, &[1.0]) < 1.0);
        assert!(growing.value(&params, &[1.0]) > 1.0);
        assert_relative_eq!(
            decaying.value(&params, &[1.0]) * growing.value(&params, &[1.0]),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn tau_sanity_bounds_are_enforced() {
        let model = ExpEnvelope { growing: false, time_max: 10.0 };
        assert!(model.accept(&array![1.0, 5.0]).is_ok());
        assert!(matches!(
            model.accept(&array![1.0, -5.0]),
            Err(FitError::SanityViolation { param: "tau", .. })
        ));
        assert!(matches!(
            model.accept(&array![1.0, 50.0]),
            Err(FitError::SanityViolation { param: "tau", .. })
        ));
    }

    #[test]
    fn oscillating_gaussian_matches_closed_form() {
        let model = OscillatingGaussian;
        let params = array![1.5, 2.0];
        let z = 0.8;
        assert_relative_eq!(
            model.value(&params, &[z]),
            (-(z / 1.5f64).powi(2)).exp() * (2.0 * z).cos(),
            epsilon = 1e-12
        );
    }
}
