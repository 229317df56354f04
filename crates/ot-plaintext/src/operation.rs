//! Plain-text operation: an ordered, normalized sequence of spans.
//!
//! # Normalization
//!
//! Every builder call keeps the span list canonical, so operations with the
//! same effect compare equal:
//! - adjacent retains (with equal attributes) merge, as do adjacent inserts
//!   with equal attributes and adjacent deletes;
//! - an insert is always placed before a delete at the same position;
//! - zero-length spans are dropped.

use std::cmp::Ordering;
use std::fmt;

use crate::attributes::{compose_attributes, overlay, transform_attributes, Attributes};
use crate::error::OperationError;
use crate::span::{split_chars, CharCount, Span};

/// A sequence of [`Span`]s transforming a document of `base_length`
/// characters into one of `target_length` characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlainTextOperation {
    spans: Vec<Span>,
    base_length: usize,
    target_length: usize,
}

impl PlainTextOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Length of the document this operation applies to.
    pub fn base_length(&self) -> usize {
        self.base_length
    }

    /// Length of the document this operation produces.
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn is_equal_base_length(&self, length: usize) -> bool {
        self.base_length == length
    }

    pub fn is_equal_target_length(&self, length: usize) -> bool {
        self.target_length == length
    }

    // ── Builders ──────────────────────────────────────────────────────────

    /// Skips over `count` characters.
    pub fn retain(&mut self, count: usize) -> &mut Self {
        self.retain_with(count, Attributes::new())
    }

    /// Skips over `count` characters, applying `attributes` to them.
    pub fn retain_with(&mut self, count: usize, attributes: Attributes) -> &mut Self {
        if count == 0 {
            return self;
        }
        self.base_length += count;
        self.target_length += count;
        if let Some(Span::Retain { count: last, attributes: last_attributes }) = self.spans.last_mut() {
            if *last_attributes == attributes {
                *last += count;
                return self;
            }
        }
        self.spans.push(Span::Retain { count, attributes });
        self
    }

    /// Inserts `text` at the current position.
    pub fn insert(&mut self, text: impl Into<String>) -> &mut Self {
        self.insert_with(text, Attributes::new())
    }

    /// Inserts `text` carrying `attributes` at the current position.
    pub fn insert_with(&mut self, text: impl Into<String>, attributes: Attributes) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        self.target_length += text.chars().count();

        let len = self.spans.len();
        let merge_at = match self.spans.as_slice() {
            [.., Span::Insert { attributes: last, .. }] if *last == attributes => Some(len - 1),
            [.., Span::Insert { attributes: last, .. }, Span::Delete(_)] if *last == attributes => Some(len - 2),
            _ => None,
        };
        if let Some(index) = merge_at {
            if let Span::Insert { text: last, .. } = &mut self.spans[index] {
                last.push_str(&text);
            }
            return self;
        }

        let span = Span::Insert { text, attributes };
        // Insert goes ahead of a trailing delete.
        if let Some(Span::Delete(_)) = self.spans.last() {
            self.spans.insert(len - 1, span);
        } else {
            self.spans.push(span);
        }
        self
    }

    /// Deletes characters at the current position. Accepts a count or the
    /// text being deleted.
    pub fn delete(&mut self, count: impl Into<CharCount>) -> &mut Self {
        let CharCount(count) = count.into();
        if count == 0 {
            return self;
        }
        self.base_length += count;
        if let Some(Span::Delete(last)) = self.spans.last_mut() {
            *last += count;
        } else {
            self.spans.push(Span::Delete(count));
        }
        self
    }

    /// Appends a span through the matching builder.
    pub fn push(&mut self, span: Span) -> &mut Self {
        match span {
            Span::Retain { count, attributes } => self.retain_with(count, attributes),
            Span::Insert { text, attributes } => self.insert_with(text, attributes),
            Span::Delete(count) => self.delete(count),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// True if the operation leaves the document untouched: it only retains
    /// and none of its retains carry attributes.
    pub fn is_noop(&self) -> bool {
        self.spans
            .iter()
            .all(|span| matches!(span, Span::Retain { attributes, .. } if attributes.is_empty()))
    }

    /// Structural equality of the span sequences.
    pub fn equals(&self, other: &PlainTextOperation) -> bool {
        self.spans == other.spans
    }

    // ── Algebra ───────────────────────────────────────────────────────────

    /// Applies the operation to `document`.
    pub fn apply(&self, document: &str) -> Result<String, OperationError> {
        self.apply_with_attributes(document, None, None)
    }

    /// Applies the operation to `document`, tracking per-character
    /// attributes.
    ///
    /// `input` holds the attributes of each character of `document` (missing
    /// entries count as empty). When `output` is given, one attribute set is
    /// pushed for every character of the result.
    pub fn apply_with_attributes(
        &self,
        document: &str,
        input: Option<&[Attributes]>,
        mut output: Option<&mut Vec<Attributes>>,
    ) -> Result<String, OperationError> {
        let chars: Vec<char> = document.chars().collect();
        if chars.len() != self.base_length {
            return Err(OperationError::length_mismatch(self.base_length, chars.len()));
        }

        let mut result = String::with_capacity(document.len());
        let mut index = 0usize;
        for span in &self.spans {
            match span {
                Span::Retain { count, attributes } => {
                    result.extend(&chars[index..index + count]);
                    if let Some(out) = output.as_deref_mut() {
                        for k in index..index + count {
                            let current = input.and_then(|attrs| attrs.get(k));
                            out.push(overlay(current, attributes));
                        }
                    }
                    index += count;
                }
                Span::Insert { text, attributes } => {
                    result.push_str(text);
                    if let Some(out) = output.as_deref_mut() {
                        let inserted = overlay(None, attributes);
                        out.extend(text.chars().map(|_| inserted.clone()));
                    }
                }
                Span::Delete(count) => {
                    index += count;
                }
            }
        }
        Ok(result)
    }

    /// Computes the operation that reverts this one when applied to its
    /// result. `document` is the text this operation was applied to.
    pub fn invert(&self, document: &str) -> Result<Self, OperationError> {
        let chars: Vec<char> = document.chars().collect();
        if chars.len() != self.base_length {
            return Err(OperationError::length_mismatch(self.base_length, chars.len()));
        }

        let mut inverse = Self::new();
        let mut index = 0usize;
        for span in &self.spans {
            match span {
                Span::Retain { count, attributes } => {
                    inverse.retain_with(*count, attributes.clone());
                    index += count;
                }
                Span::Insert { text, .. } => {
                    inverse.delete(text.as_str());
                }
                Span::Delete(count) => {
                    inverse.insert(chars[index..index + count].iter().collect::<String>());
                    index += count;
                }
            }
        }
        Ok(inverse)
    }

    /// Merges `self` followed by `other` into a single operation, so that
    /// `apply(apply(S, self), other) == apply(S, self.compose(other))`.
    pub fn compose(&self, other: &Self) -> Result<Self, OperationError> {
        if self.target_length != other.base_length {
            return Err(OperationError::length_mismatch(self.target_length, other.base_length));
        }

        let mut composed = Self::new();
        let mut ops1 = self.spans.iter().cloned();
        let mut ops2 = other.spans.iter().cloned();
        let mut op1 = ops1.next();
        let mut op2 = ops2.next();

        loop {
            match (op1.take(), op2.take()) {
                (None, None) => break,
                (Some(Span::Delete(count)), rest) => {
                    composed.delete(count);
                    op1 = ops1.next();
                    op2 = rest;
                }
                (rest, Some(Span::Insert { text, attributes })) => {
                    composed.insert_with(text, attributes);
                    op1 = rest;
                    op2 = ops2.next();
                }
                (None, _) | (_, None) => {
                    return Err(OperationError::length_mismatch(self.target_length, other.base_length));
                }
                (
                    Some(Span::Retain { count: a, attributes: attrs1 }),
                    Some(Span::Retain { count: b, attributes: attrs2 }),
                ) => {
                    let (min, rest1, rest2) = consume(a, b);
                    composed.retain_with(min, compose_attributes(&attrs1, &attrs2, false));
                    op1 = resume(&mut ops1, rest1, |count| Span::Retain { count, attributes: attrs1 });
                    op2 = resume(&mut ops2, rest2, |count| Span::Retain { count, attributes: attrs2 });
                }
                (Some(Span::Retain { count: a, attributes: attrs1 }), Some(Span::Delete(b))) => {
                    let (min, rest1, rest2) = consume(a, b);
                    composed.delete(min);
                    op1 = resume(&mut ops1, rest1, |count| Span::Retain { count, attributes: attrs1 });
                    op2 = resume(&mut ops2, rest2, Span::Delete);
                }
                (
                    Some(Span::Insert { text, attributes: attrs1 }),
                    Some(Span::Retain { count: b, attributes: attrs2 }),
                ) => {
                    let attributes = compose_attributes(&attrs1, &attrs2, true);
                    let a = text.chars().count();
                    match a.cmp(&b) {
                        Ordering::Less => {
                            composed.insert_with(text, attributes);
                            op1 = ops1.next();
                            op2 = Some(Span::Retain { count: b - a, attributes: attrs2 });
                        }
                        Ordering::Equal => {
                            composed.insert_with(text, attributes);
                            op1 = ops1.next();
                            op2 = ops2.next();
                        }
                        Ordering::Greater => {
                            let (head, tail) = split_chars(&text, b);
                            composed.insert_with(head, attributes);
                            op1 = Some(Span::Insert { text: tail.to_string(), attributes: attrs1 });
                            op2 = ops2.next();
                        }
                    }
                }
                // Inserted by self, deleted by other: both vanish.
                (Some(Span::Insert { text, attributes }), Some(Span::Delete(b))) => {
                    let a = text.chars().count();
                    match a.cmp(&b) {
                        Ordering::Less => {
                            op1 = ops1.next();
                            op2 = Some(Span::Delete(b - a));
                        }
                        Ordering::Equal => {
                            op1 = ops1.next();
                            op2 = ops2.next();
                        }
                        Ordering::Greater => {
                            let (_, tail) = split_chars(&text, b);
                            op1 = Some(Span::Insert { text: tail.to_string(), attributes });
                            op2 = ops2.next();
                        }
                    }
                }
            }
        }
        Ok(composed)
    }

    /// Transforms two concurrent operations `a` (self) and `b` (other) over
    /// the same base into `(a', b')` such that
    /// `apply(apply(S, a), b') == apply(apply(S, b), a')`.
    ///
    /// When both sides insert at the same position, the insert of `self` ends
    /// up first.
    pub fn transform(&self, other: &Self) -> Result<(Self, Self), OperationError> {
        if self.base_length != other.base_length {
            return Err(OperationError::length_mismatch(self.base_length, other.base_length));
        }

        let mut a_prime = Self::new();
        let mut b_prime = Self::new();
        let mut ops1 = self.spans.iter().cloned();
        let mut ops2 = other.spans.iter().cloned();
        let mut op1 = ops1.next();
        let mut op2 = ops2.next();

        loop {
            match (op1.take(), op2.take()) {
                (None, None) => break,
                (Some(Span::Insert { text, attributes }), rest) => {
                    b_prime.retain(text.chars().count());
                    a_prime.insert_with(text, attributes);
                    op1 = ops1.next();
                    op2 = rest;
                }
                (rest, Some(Span::Insert { text, attributes })) => {
                    a_prime.retain(text.chars().count());
                    b_prime.insert_with(text, attributes);
                    op1 = rest;
                    op2 = ops2.next();
                }
                (None, _) | (_, None) => {
                    return Err(OperationError::length_mismatch(self.base_length, other.base_length));
                }
                (
                    Some(Span::Retain { count: a, attributes: attrs1 }),
                    Some(Span::Retain { count: b, attributes: attrs2 }),
                ) => {
                    let (min, rest1, rest2) = consume(a, b);
                    let (attrs1_prime, attrs2_prime) = transform_attributes(&attrs1, &attrs2);
                    a_prime.retain_with(min, attrs1_prime);
                    b_prime.retain_with(min, attrs2_prime);
                    op1 = resume(&mut ops1, rest1, |count| Span::Retain { count, attributes: attrs1 });
                    op2 = resume(&mut ops2, rest2, |count| Span::Retain { count, attributes: attrs2 });
                }
                // Both deleted the same range: nothing left to do on either side.
                (Some(Span::Delete(a)), Some(Span::Delete(b))) => {
                    let (_, rest1, rest2) = consume(a, b);
                    op1 = resume(&mut ops1, rest1, Span::Delete);
                    op2 = resume(&mut ops2, rest2, Span::Delete);
                }
                (Some(Span::Delete(a)), Some(Span::Retain { count: b, attributes: attrs2 })) => {
                    let (min, rest1, rest2) = consume(a, b);
                    a_prime.delete(min);
                    op1 = resume(&mut ops1, rest1, Span::Delete);
                    op2 = resume(&mut ops2, rest2, |count| Span::Retain { count, attributes: attrs2 });
                }
                (Some(Span::Retain { count: a, attributes: attrs1 }), Some(Span::Delete(b))) => {
                    let (min, rest1, rest2) = consume(a, b);
                    b_prime.delete(min);
                    op1 = resume(&mut ops1, rest1, |count| Span::Retain { count, attributes: attrs1 });
                    op2 = resume(&mut ops2, rest2, Span::Delete);
                }
            }
        }
        Ok((a_prime, b_prime))
    }
}

/// Consumes the shared amount of two counted spans, returning it along with
/// what is left of each side.
fn consume(a: usize, b: usize) -> (usize, usize, usize) {
    let min = a.min(b);
    (min, a - min, b - min)
}

/// Continues with the leftover part of a span, or the next span once it is
/// used up.
fn resume<I, F>(spans: &mut I, rest: usize, remainder: F) -> Option<Span>
where
    I: Iterator<Item = Span>,
    F: FnOnce(usize) -> Span,
{
    if rest > 0 {
        Some(remainder(rest))
    } else {
        spans.next()
    }
}

impl FromIterator<Span> for PlainTextOperation {
    fn from_iter<T: IntoIterator<Item = Span>>(spans: T) -> Self {
        let mut operation = Self::new();
        operation.extend(spans);
        operation
    }
}

impl Extend<Span> for PlainTextOperation {
    fn extend<T: IntoIterator<Item = Span>>(&mut self, spans: T) {
        for span in spans {
            self.push(span);
        }
    }
}

impl AsRef<PlainTextOperation> for PlainTextOperation {
    fn as_ref(&self) -> &PlainTextOperation {
        self
    }
}

impl ot_types::Operation for PlainTextOperation {
    type Error = OperationError;

    fn compose(&self, other: &Self) -> Result<Self, Self::Error> {
        PlainTextOperation::compose(self, other)
    }

    fn transform(&self, other: &Self) -> Result<(Self, Self), Self::Error> {
        PlainTextOperation::transform(self, other)
    }
}

/// Renders the spans as `RETAIN n, INSERT "text", DELETE n`.
impl fmt::Display for PlainTextOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match span {
                Span::Retain { count, .. } => write!(f, "RETAIN {count}")?,
                Span::Insert { text, .. } => write!(f, "INSERT \"{text}\"")?,
                Span::Delete(count) => write!(f, "DELETE {count}")?,
            }
        }
        Ok(())
    }
}
