use thiserror::Error;

/// Errors raised by the plain-text operation engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OperationError {
    #[error("INVALID_ARGUMENT: {0}")]
    InvalidArgument(String),
    #[error("LENGTH_MISMATCH: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl OperationError {
    pub(crate) fn length_mismatch(expected: usize, actual: usize) -> Self {
        log::trace!("length mismatch: expected {expected}, got {actual}");
        OperationError::LengthMismatch { expected, actual }
    }
}
