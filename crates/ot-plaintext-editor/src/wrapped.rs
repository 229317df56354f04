//! An operation that carries cursor metadata along with its edits.

use std::fmt;

use ot_plaintext::{Attributes, CharCount, OperationError, PlainTextOperation, Span};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::cursor::Cursor;
use crate::metadata::OperationMetadata;

/// A [`PlainTextOperation`] decorated with optional [`OperationMetadata`].
///
/// The algebra is delegated to the inner operation; the metadata is
/// re-derived alongside it. `==` compares both the operation and the
/// metadata, [`WrappedOperation::equals`] only the operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrappedOperation {
    operation: PlainTextOperation,
    metadata: Option<OperationMetadata>,
}

impl WrappedOperation {
    pub fn new(operation: PlainTextOperation, metadata: Option<OperationMetadata>) -> Self {
        Self { operation, metadata }
    }

    pub fn operation(&self) -> &PlainTextOperation {
        &self.operation
    }

    pub fn metadata(&self) -> Option<&OperationMetadata> {
        self.metadata.as_ref()
    }

    pub fn into_parts(self) -> (PlainTextOperation, Option<OperationMetadata>) {
        (self.operation, self.metadata)
    }

    /// Cursor position once this operation is applied.
    pub fn cursor(&self) -> Option<Cursor> {
        self.metadata.and_then(|meta| meta.cursor_after())
    }

    // ── Builders ──────────────────────────────────────────────────────────

    pub fn retain(&mut self, count: usize) -> &mut Self {
        self.operation.retain(count);
        self
    }

    pub fn retain_with(&mut self, count: usize, attributes: Attributes) -> &mut Self {
        self.operation.retain_with(count, attributes);
        self
    }

    pub fn insert(&mut self, text: impl Into<String>) -> &mut Self {
        self.operation.insert(text);
        self
    }

    pub fn insert_with(&mut self, text: impl Into<String>, attributes: Attributes) -> &mut Self {
        self.operation.insert_with(text, attributes);
        self
    }

    pub fn delete(&mut self, count: impl Into<CharCount>) -> &mut Self {
        self.operation.delete(count);
        self
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_noop(&self) -> bool {
        self.operation.is_noop()
    }

    /// Compares the edits of both operations, ignoring metadata.
    pub fn equals<O: AsRef<PlainTextOperation> + ?Sized>(&self, other: &O) -> bool {
        self.operation.equals(other.as_ref())
    }

    pub fn is_equal_base_length(&self, length: usize) -> bool {
        self.operation.is_equal_base_length(length)
    }

    pub fn is_equal_target_length(&self, length: usize) -> bool {
        self.operation.is_equal_target_length(length)
    }

    /// True if `other` can be applied right after `self`.
    pub fn can_merge_with<O: AsRef<PlainTextOperation> + ?Sized>(&self, other: &O) -> bool {
        self.operation.target_length() == other.as_ref().base_length()
    }

    /// Whether an undo stack should fold `other` into `self`: true for
    /// no-ops, consecutive typing, and repeated backspace or forward delete
    /// at one spot.
    pub fn should_be_composed_with<O: AsRef<PlainTextOperation> + ?Sized>(&self, other: &O) -> bool {
        let other = other.as_ref();
        if self.is_noop() || other.is_noop() {
            return true;
        }
        let (Some(a), Some(b)) = (simple_span(&self.operation), simple_span(other)) else {
            return false;
        };
        let (start_a, start_b) = (start_index(&self.operation), start_index(other));
        match (a, b) {
            (Span::Insert { text, .. }, Span::Insert { .. }) => start_a + text.chars().count() == start_b,
            (Span::Delete(_), Span::Delete(len_b)) => start_b + len_b == start_a || start_a == start_b,
            _ => false,
        }
    }

    /// Same decision as [`Self::should_be_composed_with`] for operations
    /// that will be composed after being inverted:
    /// `a.should_be_composed_with(b) == b⁻¹.should_be_composed_with_inverted(a⁻¹)`.
    pub fn should_be_composed_with_inverted<O: AsRef<PlainTextOperation> + ?Sized>(&self, other: &O) -> bool {
        let other = other.as_ref();
        if self.is_noop() || other.is_noop() {
            return true;
        }
        let (Some(a), Some(b)) = (simple_span(&self.operation), simple_span(other)) else {
            return false;
        };
        let (start_a, start_b) = (start_index(&self.operation), start_index(other));
        match (a, b) {
            (Span::Insert { text, .. }, Span::Insert { .. }) => {
                start_a + text.chars().count() == start_b || start_a == start_b
            }
            (Span::Delete(_), Span::Delete(len_b)) => start_b + len_b == start_a,
            _ => false,
        }
    }

    // ── Algebra ───────────────────────────────────────────────────────────

    pub fn apply(&self, document: &str) -> Result<String, OperationError> {
        self.operation.apply(document)
    }

    pub fn apply_with_attributes(
        &self,
        document: &str,
        input: Option<&[Attributes]>,
        output: Option<&mut Vec<Attributes>>,
    ) -> Result<String, OperationError> {
        self.operation.apply_with_attributes(document, input, output)
    }

    /// Inverse operation; its cursor after is this operation's cursor before.
    pub fn invert(&self, document: &str) -> Result<Self, OperationError> {
        Ok(Self::new(
            self.operation.invert(document)?,
            self.metadata.map(|meta| meta.invert()),
        ))
    }

    /// Composes the edits. The result starts at `self`'s cursor and ends at
    /// `other`'s; when only one side has metadata, that side's is kept.
    pub fn compose(&self, other: &Self) -> Result<Self, OperationError> {
        let operation = self.operation.compose(&other.operation)?;
        let metadata = match (self.metadata, other.metadata) {
            (Some(a), Some(b)) => Some(a.compose(&b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        };
        Ok(Self::new(operation, metadata))
    }

    /// Transforms the edits; each side's cursors are moved through the other
    /// side's edits.
    pub fn transform(&self, other: &Self) -> Result<(Self, Self), OperationError> {
        let (a_prime, b_prime) = self.operation.transform(&other.operation)?;
        Ok((
            Self::new(a_prime, self.metadata.map(|meta| meta.transform(&other.operation))),
            Self::new(b_prime, other.metadata.map(|meta| meta.transform(&self.operation))),
        ))
    }

    pub fn to_json(&self) -> Value {
        self.operation.to_json()
    }
}

/// The single edit of an operation shaped `[retain] edit [retain]`.
fn simple_span(operation: &PlainTextOperation) -> Option<&Span> {
    match operation.spans() {
        [only] => Some(only),
        [first, second] if first.is_retain() => Some(second),
        [first, second] if second.is_retain() => Some(first),
        [first, middle, last] if first.is_retain() && last.is_retain() => Some(middle),
        _ => None,
    }
}

fn start_index(operation: &PlainTextOperation) -> usize {
    match operation.spans().first() {
        Some(Span::Retain { count, .. }) => *count,
        _ => 0,
    }
}

impl From<PlainTextOperation> for WrappedOperation {
    fn from(operation: PlainTextOperation) -> Self {
        Self::new(operation, None)
    }
}

impl AsRef<PlainTextOperation> for WrappedOperation {
    fn as_ref(&self) -> &PlainTextOperation {
        &self.operation
    }
}

impl ot_types::Operation for WrappedOperation {
    type Error = OperationError;

    fn compose(&self, other: &Self) -> Result<Self, Self::Error> {
        WrappedOperation::compose(self, other)
    }

    fn transform(&self, other: &Self) -> Result<(Self, Self), Self::Error> {
        WrappedOperation::transform(self, other)
    }
}

impl fmt::Display for WrappedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.operation, f)
    }
}

/// Only the edits travel on the wire.
impl Serialize for WrappedOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.operation.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WrappedOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PlainTextOperation::deserialize(deserializer).map(Self::from)
    }
}
