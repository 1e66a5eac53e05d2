//! Nonlinear least-squares fitting of parametric correlation models.
//!
//! Purpose
//! -------
//! One strategy layer shared by all three analysis engines: a model
//! abstraction ([`CorrelationModel`]) with concrete tilted-Gaussian,
//! exponential-envelope, Gaussian-envelope and oscillating-Gaussian
//! variants, a bounded L-BFGS runner over the sum-of-squares residual
//! ([`fit`]), and the explicit warm-start state threaded between windows
//! ([`FitGuess`]).
pub mod errors;
pub mod guess;
pub mod least_squares;
pub mod model;

pub use errors::{FitError, FitResult};
pub use guess::FitGuess;
pub use least_squares::{fit, FitData, FitOptions, FitOutcome};
pub use model::{
    CorrelationModel, ExpEnvelope, GaussianEnvelope, OscillatingGaussian, Params, TiltedGaussian,
};
