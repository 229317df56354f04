//! Plain-text operational transformation.
//!
//! A [`PlainTextOperation`] is a normalized sequence of [`Span`]s (retain,
//! insert, delete) that turns a document of `base_length` characters into one
//! of `target_length` characters. Operations can be applied, inverted,
//! composed and transformed against concurrent operations.
//!
//! # Example
//!
//! ```
//! use ot_plaintext::PlainTextOperation;
//!
//! let mut op = PlainTextOperation::new();
//! op.retain(6).insert("Me").delete("World");
//! assert_eq!(op.apply("Hello World").unwrap(), "Hello Me");
//! assert_eq!(op.to_json(), serde_json::json!([6, "Me", -5]));
//! ```

pub mod attributes;
pub mod codec;
pub mod error;
pub mod operation;
pub mod span;

pub use attributes::{AttributeValue, Attributes};
pub use error::OperationError;
pub use operation::PlainTextOperation;
pub use span::{CharCount, Span};
