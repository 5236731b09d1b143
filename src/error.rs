use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlgebraError {
    #[error("Shape mismatch in {operation}: {left} vs {right}")]
    ShapeMismatch {
        operation: &'static str,
        left: String,
        right: String,
    },

    #[error("Incompatible rings: {left} vs {right}")]
    RingMismatch { left: String, right: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid ring parameters: {0}")]
    InvalidParameters(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

pub type Result<T> = std::result::Result<T, AlgebraError>;

impl AlgebraError {
    pub(crate) fn shape(operation: &'static str, left: impl ToString, right: impl ToString) -> Self {
        Self::ShapeMismatch {
            operation,
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

impl From<std::io::Error> for AlgebraError {
    fn from(err: std::io::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}
