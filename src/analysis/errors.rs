use crate::config::errors::ConfigError;
use crate::field::errors::FieldError;

/// Result alias for analysis runs.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Run-level failures. Everything here invalidates the whole run; the
/// per-window fit failures are recovered inside the engines and never
/// surface as an `AnalysisError`.
#[derive(Debug)]
pub enum AnalysisError {
    /// The configuration record is invalid.
    Config(ConfigError),

    /// The field data is unusable (degenerate axes, failed resampling).
    Field(FieldError),

    /// The supplied input variant does not carry the data the selected
    /// analysis needs.
    InputMismatch {
        analysis: &'static str,
        expected: &'static str,
    },

    /// Writing the result table failed.
    Csv(csv::Error),
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Config(err) => Some(err),
            AnalysisError::Field(err) => Some(err),
            AnalysisError::Csv(err) => Some(err),
            AnalysisError::InputMismatch { .. } => None,
        }
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Config(err) => write!(f, "Configuration error: {err}"),
            AnalysisError::Field(err) => write!(f, "Field error: {err}"),
            AnalysisError::InputMismatch { analysis, expected } => {
                write!(f, "The {analysis} analysis requires {expected} input data")
            }
            AnalysisError::Csv(err) => write!(f, "Result table write failed: {err}"),
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        AnalysisError::Config(err)
    }
}

impl From<FieldError> for AnalysisError {
    fn from(err: FieldError) -> Self {
        AnalysisError::Field(err)
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        AnalysisError::Csv(err)
    }
}
