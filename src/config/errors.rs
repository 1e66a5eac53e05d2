/// Result alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal configuration errors, raised before any computation starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// time_slice must be positive and no longer than the time axis.
    InvalidTimeSlice {
        time_slice: usize,
        nt: usize,
    },

    /// time_range must satisfy start < end and end <= nt.
    InvalidTimeRange {
        start: usize,
        end: usize,
        nt: usize,
    },

    /// The guess vector for a fit has the wrong number of parameters.
    GuessLengthMismatch {
        analysis: &'static str,
        expected: usize,
        found: usize,
    },

    /// A guess entry must be finite (and positive where it seeds a length).
    InvalidGuess {
        analysis: &'static str,
        index: usize,
        value: f64,
    },

    /// time_max bounds the accepted correlation time and must be positive.
    InvalidTimeMax {
        value: f64,
    },

    /// time_interp_fac must be at least 1.
    InvalidInterpFactor {
        value: usize,
    },

    /// npeaks_fit must be at least 1.
    InvalidNpeaksFit {
        value: usize,
    },

    /// Box sides must be positive when domain = middle.
    InvalidBoxSize {
        value: [f64; 2],
    },

    /// drift_threshold must lie in (0, 1).
    InvalidDriftThreshold {
        value: f64,
    },

    /// A normalization constant is non-finite or non-positive.
    InvalidNormalization {
        name: &'static str,
        value: f64,
    },

    /// The requested analysis is handled by the external presentation
    /// layer, not by this pipeline.
    UnsupportedAnalysis {
        name: &'static str,
    },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidTimeSlice { time_slice, nt } => {
                write!(
                    f,
                    "Invalid time_slice {time_slice}: must be positive and at most nt = {nt}"
                )
            }
            ConfigError::InvalidTimeRange { start, end, nt } => {
                write!(f, "Invalid time_range [{start}, {end}): must satisfy start < end <= {nt}")
            }
            ConfigError::GuessLengthMismatch { analysis, expected, found } => {
                write!(f, "{analysis} guess length mismatch: expected {expected}, found {found}")
            }
            ConfigError::InvalidGuess { analysis, index, value } => {
                write!(f, "Invalid {analysis} guess at index {index}: {value}")
            }
            ConfigError::InvalidTimeMax { value } => {
                write!(f, "Invalid time_max {value}: must be positive and finite")
            }
            ConfigError::InvalidInterpFactor { value } => {
                write!(f, "Invalid time_interp_fac {value}: must be at least 1")
            }
            ConfigError::InvalidNpeaksFit { value } => {
                write!(f, "Invalid npeaks_fit {value}: must be at least 1")
            }
            ConfigError::InvalidBoxSize { value } => {
                write!(f, "Invalid box_size {value:?}: both sides must be positive")
            }
            ConfigError::InvalidDriftThreshold { value } => {
                write!(f, "Invalid drift_threshold {value}: must lie strictly between 0 and 1")
            }
            ConfigError::InvalidNormalization { name, value } => {
                write!(f, "Invalid normalization constant {name} = {value}")
            }
            ConfigError::UnsupportedAnalysis { name } => {
                write!(
                    f,
                    "Analysis '{name}' is a presentation-layer task and is not run by the \
                     correlation pipeline"
                )
            }
        }
    }
}
