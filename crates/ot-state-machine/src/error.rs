use thiserror::Error;

/// Errors raised by [`StateMachine`](crate::StateMachine) events.
///
/// `E` is the error type of the operations being synchronized.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StateMachineError<E> {
    /// The event is not legal in the current state, e.g. an acknowledgement
    /// while nothing is outstanding.
    #[error("INVALID_STATE: {0}")]
    InvalidState(&'static str),
    #[error("DISPOSED")]
    Disposed,
    #[error(transparent)]
    Operation(#[from] E),
}
