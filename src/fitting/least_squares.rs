//! Shared nonlinear least-squares runner for every correlation model.
//!
//! Purpose
//! -------
//! Provide the solver half of the "model + guess + bounded iterations +
//! accept/reject" pattern: wrap a [`CorrelationModel`] and a dataset in an
//! argmin cost function over the sum-of-squares residual, run L-BFGS with
//! a More–Thuente line search and finite-difference gradients, and turn
//! the solver state into either a validated [`FitOutcome`] or a
//! recoverable [`FitError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The iteration cap in [`FitOptions`] is the only timeout semantics a
//!   fit has; hitting it is reported as [`FitError::NonConvergence`].
//! - A successful return implies the solver converged, the parameters are
//!   finite, and the model's acceptance predicate passed. Callers never
//!   need to re-check solver health.
//! - None of the correlation models carries an analytic gradient; the
//!   cost gradient is a central finite difference of the residual sum.
use argmin::core::{CostFunction, Error, Executor, Gradient, State, TerminationReason,
                   TerminationStatus};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2};

use crate::fitting::errors::{FitError, FitResult};
use crate::fitting::model::{CorrelationModel, Params};

/// One fit dataset: coordinates (one row per point, one column per
/// separation axis) and the observed correlation values.
#[derive(Debug, Clone)]
pub struct FitData {
    pub coords: Array2<f64>,
    pub values: Array1<f64>,
}

impl FitData {
    /// Convenience constructor for 1D fits over a single separation axis.
    pub fn one_dimensional(coords: &[f64], values: &[f64]) -> FitData {
        FitData {
            coords: Array1::from_vec(coords.to_vec()).insert_axis(ndarray::Axis(1)),
            values: Array1::from_vec(values.to_vec()),
        }
    }
}

/// Solver options: the bounded-iteration cap and convergence tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub max_iter: u64,
    pub tol_grad: f64,
    pub tol_cost: f64,
    pub lbfgs_mem: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions { max_iter: 200, tol_grad: 1e-10, tol_cost: 1e-14, lbfgs_mem: 7 }
    }
}

/// A converged, accepted fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub params: Params,
    pub cost: f64,
    pub iterations: u64,
}

/// Sum-of-squares residual adapter between a correlation model and the
/// argmin solver stack.
struct ResidualAdapter<'a, M: CorrelationModel> {
    model: &'a M,
    data: &'a FitData,
}

impl<M: CorrelationModel> ResidualAdapter<'_, M> {
    fn sum_squares(&self, params: &Params) -> f64 {
        self.data
            .coords
            .outer_iter()
            .zip(self.data.values.iter())
            .map(|(coord, &observed)| {
                let predicted = self.model.value(params, coord.as_slice().unwrap_or(&[]));
                (predicted - observed).powi(2)
            })
            .sum()
    }
}

impl<M: CorrelationModel> CostFunction for ResidualAdapter<'_, M> {
    type Param = Params;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.sum_squares(params);
        if !value.is_finite() {
            return Err(FitError::NonFiniteCost { value }.into());
        }
        Ok(value)
    }
}

impl<M: CorrelationModel> Gradient for ResidualAdapter<'_, M> {
    type Param = Params;
    type Gradient = Array1<f64>;

    /// Central finite difference of the residual sum. Non-finite entries
    /// (a residual blowing up inside the stencil) surface as a fit error
    /// rather than a panic.
    fn gradient(&self, params: &Self::Param) -> Result<Self::Gradient, Error> {
        let grad = params.central_diff(&|p: &Params| self.sum_squares(p));
        for (index, &g) in grad.iter().enumerate() {
            if !g.is_finite() {
                return Err(FitError::NonFiniteGradient { index }.into());
            }
        }
        Ok(grad)
    }
}

/// Run one bounded nonlinear least-squares fit.
///
/// # Behavior
/// - Validates the guess against the model's parameter count and
///   finiteness requirements.
/// - Runs L-BFGS (More–Thuente line search) from the guess, capped at
///   `opts.max_iter` iterations.
/// - Converts every failure mode — solver error, iteration-cap hit,
///   non-finite parameters, rejected acceptance predicate — into the
///   matching [`FitError`], which callers recover from per window.
///
/// # Errors
/// - [`FitError::GuessLengthMismatch`] / [`FitError::InvalidGuess`] for a
///   bad seed.
/// - [`FitError::NonConvergence`] when the iteration cap is reached.
/// - [`FitError::Divergence`] for non-finite fitted parameters.
/// - [`FitError::SanityViolation`] from the model's acceptance predicate.
/// - [`FitError::Backend`] for solver-internal failures.
pub fn fit<M: CorrelationModel>(
    model: &M, data: &FitData, guess: &Params, opts: &FitOptions,
) -> FitResult<FitOutcome> {
    if guess.len() != model.n_params() {
        return Err(FitError::GuessLengthMismatch {
            expected: model.n_params(),
            found: guess.len(),
        });
    }
    for (index, &value) in guess.iter().enumerate() {
        if !value.is_finite() {
            return Err(FitError::InvalidGuess { index, value });
        }
    }

    let problem = ResidualAdapter { model, data };
    let linesearch = MoreThuenteLineSearch::new();
    let solver = LBFGS::new(linesearch, opts.lbfgs_mem)
        .with_tolerance_grad(opts.tol_grad)?
        .with_tolerance_cost(opts.tol_cost)?;

    let result = Executor::new(problem, solver)
        .configure(|state| state.param(guess.clone()).max_iters(opts.max_iter))
        .run()?;
    let mut state = result.state().clone();
    let iterations = state.get_iter();

    if let TerminationStatus::Terminated(TerminationReason::MaxItersReached) =
        state.get_termination_status()
    {
        return Err(FitError::NonConvergence { iterations });
    }
    let params = state.take_best_param().ok_or(FitError::MissingParams)?;
    for (index, &value) in params.iter().enumerate() {
        if !value.is_finite() {
            return Err(FitError::Divergence { index, value });
        }
    }
    model.accept(&params)?;
    Ok(FitOutcome { params, cost: state.get_best_cost(), iterations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::model::{ExpEnvelope, GaussianEnvelope, OscillatingGaussian};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Round trip: data generated by the model with zero noise is fit back
    // to the generating parameters.
    fn exp_envelope_round_trip() {
        let model = ExpEnvelope { growing: false, time_max: 100.0 };
        let truth = array![0.9, 3.0];
        let coords: Vec<f64> = (0..20).map(|i| i as f64 * 0.25).collect();
        let values: Vec<f64> = coords.iter().map(|&t| model.value(&truth, &[t])).collect();
        let data = FitData::one_dimensional(&coords, &values);

        let outcome =
            fit(&model, &data, &array![1.2, 2.0], &FitOptions::default()).expect("fit converges");
        assert_relative_eq!(outcome.params[0], 0.9, max_relative = 1e-6);
        assert_relative_eq!(outcome.params[1], 3.0, max_relative = 1e-6);
        assert!(outcome.cost < 1e-10);
    }

    #[test]
    fn gaussian_envelope_round_trip() {
        let model = GaussianEnvelope { time_max: 100.0 };
        let truth = array![1.0, 2.5];
        let coords: Vec<f64> = (-15..=15).map(|i| i as f64 * 0.2).collect();
        let values: Vec<f64> = coords.iter().map(|&t| model.value(&truth, &[t])).collect();
        let data = FitData::one_dimensional(&coords, &values);

        let outcome =
            fit(&model, &data, &array![0.8, 1.5], &FitOptions::default()).expect("fit converges");
        assert_relative_eq!(outcome.params[0], 1.0, max_relative = 1e-6);
        assert_relative_eq!(outcome.params[1].abs(), 2.5, max_relative = 1e-6);
    }

    #[test]
    fn guess_validation_rejects_bad_seeds() {
        let model = OscillatingGaussian;
        let data = FitData::one_dimensional(&[0.0, 1.0], &[1.0, 0.5]);
        assert!(matches!(
            fit(&model, &data, &array![1.0], &FitOptions::default()),
            Err(FitError::GuessLengthMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            fit(&model, &data, &array![1.0, f64::NAN], &FitOptions::default()),
            Err(FitError::InvalidGuess { index: 1, .. })
        ));
    }

    #[test]
    // NaN observations poison the residual; the runner reports a fit
    // error instead of panicking or returning garbage parameters.
    fn nan_data_fails_recoverably() {
        let model = GaussianEnvelope { time_max: 100.0 };
        let data = FitData::one_dimensional(&[0.0, 0.5, 1.0], &[1.0, f64::NAN, 0.4]);
        assert!(fit(&model, &data, &array![1.0, 1.0], &FitOptions::default()).is_err());
    }

    #[test]
    // A converged tau beyond time_max is rejected through the acceptance
    // predicate, not silently returned.
    fn sanity_violation_is_reported() {
        let model = ExpEnvelope { growing: false, time_max: 0.5 };
        let truth = array![1.0, 3.0];
        let coords: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let values: Vec<f64> = coords.iter().map(|&t| model.value(&truth, &[t])).collect();
        let data = FitData::one_dimensional(&coords, &values);
        assert!(matches!(
            fit(&model, &data, &array![1.0, 2.9], &FitOptions::default()),
            Err(FitError::SanityViolation { param: "tau", .. })
        ));
    }
}
