//! Shared types for operational transformation.
//!
//! The client state machine only needs two things from an operation: it must
//! compose with a later operation and transform against a concurrent one.
//! Every concrete operation type (plain text, wrapped with cursor metadata)
//! implements [`Operation`].

use std::error::Error;

/// An operation that can be composed and transformed.
pub trait Operation: Sized {
    /// Error raised when two operands are incompatible.
    type Error: Error + 'static;

    /// Merges `self` followed by `other` into one operation with the same
    /// effect as applying both in order.
    fn compose(&self, other: &Self) -> Result<Self, Self::Error>;

    /// Transforms two concurrent operations `a` (self) and `b` (other) into
    /// `(a', b')` such that `apply(apply(S, a), b') == apply(apply(S, b), a')`.
    fn transform(&self, other: &Self) -> Result<(Self, Self), Self::Error>;
}
