//! Editor-facing plain-text operations.
//!
//! [`WrappedOperation`] pairs a [`PlainTextOperation`](ot_plaintext::PlainTextOperation)
//! with the [`Cursor`] positions before and after it, so that an editor can
//! restore selections on undo and keep remote carets in place while
//! concurrent edits are transformed.

pub mod cursor;
pub mod metadata;
pub mod wrapped;

pub use cursor::Cursor;
pub use metadata::OperationMetadata;
pub use wrapped::WrappedOperation;
