use argmin::core::Error;

/// Result alias for fit operations.
pub type FitResult<T> = Result<T, FitError>;

/// Per-fit failures. All of these are recovered locally by the analysis
/// engines: the affected window is marked failed and the run continues.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// The initial guess does not match the model's parameter count.
    GuessLengthMismatch {
        expected: usize,
        found: usize,
    },

    /// A guess entry must be finite.
    InvalidGuess {
        index: usize,
        value: f64,
    },

    /// The optimizer stopped at its iteration cap without converging.
    NonConvergence {
        iterations: u64,
    },

    /// The solver returned non-finite parameters.
    Divergence {
        index: usize,
        value: f64,
    },

    /// The residual cost evaluated to a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    /// A finite-difference gradient entry is non-finite.
    NonFiniteGradient {
        index: usize,
    },

    /// The solver finished but produced no parameter vector.
    MissingParams,

    /// A fitted parameter violates a physical sanity bound (for example a
    /// non-positive correlation time, or one beyond the configured
    /// maximum). Treated exactly like non-convergence by the engines.
    SanityViolation {
        param: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Any other solver-side failure (line search breakdown and similar).
    Backend {
        text: String,
    },
}

impl std::error::Error for FitError {}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::GuessLengthMismatch { expected, found } => {
                write!(f, "Guess length mismatch: expected {expected}, found {found}")
            }
            FitError::InvalidGuess { index, value } => {
                write!(f, "Invalid guess at index {index}: {value}")
            }
            FitError::NonConvergence { iterations } => {
                write!(f, "Fit did not converge within {iterations} iterations")
            }
            FitError::Divergence { index, value } => {
                write!(f, "Fit diverged: parameter {index} is {value}")
            }
            FitError::NonFiniteCost { value } => {
                write!(f, "Non-finite residual cost: {value}")
            }
            FitError::NonFiniteGradient { index } => {
                write!(f, "Non-finite gradient entry at index {index}")
            }
            FitError::MissingParams => {
                write!(f, "Solver returned no parameter vector")
            }
            FitError::SanityViolation { param, value, reason } => {
                write!(f, "Fitted {param} = {value} violates sanity bound: {reason}")
            }
            FitError::Backend { text } => {
                write!(f, "Solver backend error: {text}")
            }
        }
    }
}

impl From<Error> for FitError {
    fn from(err: Error) -> Self {
        match err.downcast::<FitError>() {
            Ok(fit_err) => fit_err,
            Err(other) => FitError::Backend { text: other.to_string() },
        }
    }
}
