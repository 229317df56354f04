use std::mem;

use ot_types::Operation;

use crate::error::StateMachineError;
use crate::handler::TransitionHandler;
use crate::state::State;

type Result<T, O> = std::result::Result<T, StateMachineError<<O as Operation>::Error>>;

/// Per-client synchronization protocol.
///
/// Keeps at most one operation in flight. Local edits made while waiting for
/// the server's acknowledgement are composed into a single buffer; remote
/// edits are transformed against whatever is pending before they reach the
/// view. A failed event leaves the state untouched.
#[derive(Debug)]
pub struct StateMachine<O, H> {
    state: State<O>,
    handler: H,
    disposed: bool,
}

impl<O, H> StateMachine<O, H>
where
    O: Operation,
    H: TransitionHandler<O>,
{
    pub fn new(handler: H) -> Self {
        Self {
            state: State::Synchronized,
            handler,
            disposed: false,
        }
    }

    pub fn state(&self) -> &State<O> {
        &self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn is_synchronized(&self) -> bool {
        matches!(self.state, State::Synchronized)
    }

    pub fn is_awaiting_confirm(&self) -> bool {
        matches!(self.state, State::AwaitingConfirm(_))
    }

    pub fn is_awaiting_with_buffer(&self) -> bool {
        matches!(self.state, State::AwaitingConfirmWithBuffer(..))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ── Protocol events ───────────────────────────────────────────────────

    /// A local edit was made.
    pub fn apply_client(&mut self, operation: O) -> Result<(), O> {
        self.ensure_live("apply_client")?;
        let from = self.state.name();
        let next = match mem::take(&mut self.state) {
            State::Synchronized => {
                self.handler.send_operation(&operation);
                State::AwaitingConfirm(operation)
            }
            State::AwaitingConfirm(outstanding) => State::AwaitingConfirmWithBuffer(outstanding, operation),
            State::AwaitingConfirmWithBuffer(outstanding, buffer) => match buffer.compose(&operation) {
                Ok(composed) => State::AwaitingConfirmWithBuffer(outstanding, composed),
                Err(err) => {
                    self.state = State::AwaitingConfirmWithBuffer(outstanding, buffer);
                    return Err(err.into());
                }
            },
        };
        self.transition(from, next);
        Ok(())
    }

    /// An edit from another client arrived through the server.
    pub fn apply_server(&mut self, operation: O) -> Result<(), O> {
        self.ensure_live("apply_server")?;
        let from = self.state.name();
        let next = match &self.state {
            State::Synchronized => {
                self.handler.apply_operation(&operation);
                return Ok(());
            }
            State::AwaitingConfirm(outstanding) => {
                let (outstanding, remote) = outstanding.transform(&operation)?;
                self.handler.apply_operation(&remote);
                State::AwaitingConfirm(outstanding)
            }
            State::AwaitingConfirmWithBuffer(outstanding, buffer) => {
                let (outstanding, remote) = outstanding.transform(&operation)?;
                let (buffer, remote) = buffer.transform(&remote)?;
                self.handler.apply_operation(&remote);
                State::AwaitingConfirmWithBuffer(outstanding, buffer)
            }
        };
        self.transition(from, next);
        Ok(())
    }

    /// The server accepted the outstanding operation.
    pub fn server_ack(&mut self) -> Result<(), O> {
        self.ensure_live("server_ack")?;
        let from = self.state.name();
        let next = match mem::take(&mut self.state) {
            State::Synchronized => return Err(Self::reject("server_ack", "nothing awaiting acknowledgement")),
            State::AwaitingConfirm(_) => State::Synchronized,
            State::AwaitingConfirmWithBuffer(_, buffer) => {
                self.handler.send_operation(&buffer);
                State::AwaitingConfirm(buffer)
            }
        };
        self.transition(from, next);
        Ok(())
    }

    /// The server rejected the outstanding operation; everything pending is
    /// sent again as one operation.
    pub fn server_retry(&mut self) -> Result<(), O> {
        self.ensure_live("server_retry")?;
        let from = self.state.name();
        let next = match mem::take(&mut self.state) {
            State::Synchronized => return Err(Self::reject("server_retry", "nothing to resend")),
            State::AwaitingConfirm(outstanding) => {
                self.handler.send_operation(&outstanding);
                State::AwaitingConfirm(outstanding)
            }
            State::AwaitingConfirmWithBuffer(outstanding, buffer) => match outstanding.compose(&buffer) {
                Ok(composed) => {
                    self.handler.send_operation(&composed);
                    State::AwaitingConfirm(composed)
                }
                Err(err) => {
                    self.state = State::AwaitingConfirmWithBuffer(outstanding, buffer);
                    return Err(err.into());
                }
            },
        };
        self.transition(from, next);
        Ok(())
    }

    // ── Direct forwarding ─────────────────────────────────────────────────

    /// Hands `operation` to the handler's send side without a state change.
    pub fn send_operation(&mut self, operation: &O) -> Result<(), O> {
        self.ensure_live("send_operation")?;
        self.handler.send_operation(operation);
        Ok(())
    }

    /// Hands `operation` to the handler's apply side without a state change.
    pub fn apply_operation(&mut self, operation: &O) -> Result<(), O> {
        self.ensure_live("apply_operation")?;
        self.handler.apply_operation(operation);
        Ok(())
    }

    /// Stops the machine. Idempotent; every later call fails with
    /// [`StateMachineError::Disposed`].
    pub fn dispose(&mut self) {
        if !self.disposed {
            log::debug!("[StateMachine] disposed in {}", self.state.name());
            self.disposed = true;
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn ensure_live(&self, event: &str) -> Result<(), O> {
        if self.disposed {
            log::warn!("[StateMachine] {event} after dispose");
            return Err(StateMachineError::Disposed);
        }
        Ok(())
    }

    fn reject(event: &str, reason: &'static str) -> StateMachineError<O::Error> {
        log::warn!("[StateMachine] {event} rejected: {reason}");
        StateMachineError::InvalidState(reason)
    }

    fn transition(&mut self, from: &'static str, next: State<O>) {
        if from != next.name() {
            log::debug!("[StateMachine] {from} -> {}", next.name());
        }
        self.state = next;
    }
}
