/// Result alias for field construction and preprocessing.
pub type FieldResult<T> = Result<T, FieldError>;

/// Data errors that invalidate the whole run for the affected field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A spectral axis is degenerate (length <= 1); no transform or
    /// correlation is defined over it.
    InsufficientResolution {
        axis: &'static str,
        len: usize,
    },

    /// An axis length does not match the corresponding array dimension.
    AxisLengthMismatch {
        axis: &'static str,
        expected: usize,
        found: usize,
    },

    /// The time axis must be strictly increasing.
    NonMonotonicTimeAxis {
        index: usize,
    },

    /// Time-axis resampling failed to build an interpolant.
    Interpolation {
        reason: &'static str,
    },
}

impl std::error::Error for FieldError {}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::InsufficientResolution { axis, len } => {
                write!(f, "Insufficient resolution on {axis}: length {len}, need at least 2")
            }
            FieldError::AxisLengthMismatch { axis, expected, found } => {
                write!(f, "Axis {axis} length mismatch: expected {expected}, found {found}")
            }
            FieldError::NonMonotonicTimeAxis { index } => {
                write!(f, "Time axis is not strictly increasing at index {index}")
            }
            FieldError::Interpolation { reason } => {
                write!(f, "Time-axis interpolation failed: {reason}")
            }
        }
    }
}
