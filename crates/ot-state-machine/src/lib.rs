//! Client-side synchronization for operational transformation.
//!
//! A [`StateMachine`] sits between an editor and the server. It is generic
//! over any [`ot_types::Operation`] and talks to the outside world only
//! through a [`TransitionHandler`]:
//!
//! - `apply_client` for local edits; the first one is sent, later ones are
//!   buffered until the server acknowledges.
//! - `apply_server` for remote edits; they are rebased over pending local
//!   work before reaching the view.
//! - `server_ack` / `server_retry` for the server's verdict on the
//!   outstanding operation.

pub mod error;
pub mod handler;
pub mod machine;
pub mod state;

pub use error::StateMachineError;
pub use handler::TransitionHandler;
pub use machine::StateMachine;
pub use state::State;
