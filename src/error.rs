use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictError>;

/// Failures of the model-backed operations. Both are fatal: the artifacts
/// are static, so retrying cannot help.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("model artifact {} unavailable: {reason}", path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("classifier returned label index {index}, decoder knows {known} labels")]
    UnknownLabelIndex { index: usize, known: usize },
}

impl PredictError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PredictError::ModelUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Survey answers that fall outside the form's bounds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} has no option {value}")]
    UnknownOption { field: &'static str, value: i64 },

    #[error("{field} is {value} but {rule}")]
    Inconsistent {
        field: &'static str,
        value: i64,
        rule: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error("a result is already showing; reset before submitting again")]
    ResultShowing,
}
