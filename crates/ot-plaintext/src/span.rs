//! The three edit primitives an operation is made of.

use crate::attributes::Attributes;

/// One edit primitive.
///
/// Counts are in characters (Unicode scalar values). Zero-length spans are
/// never stored inside an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    /// Copy `count` characters, applying `attributes` to them.
    Retain { count: usize, attributes: Attributes },
    /// Inject `text` carrying `attributes`.
    Insert { text: String, attributes: Attributes },
    /// Drop `count` characters.
    Delete(usize),
}

impl Span {
    pub fn retain(count: usize) -> Self {
        Span::Retain {
            count,
            attributes: Attributes::new(),
        }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Span::Insert {
            text: text.into(),
            attributes: Attributes::new(),
        }
    }

    /// Characters consumed from the document the span is applied to.
    pub fn src_len(&self) -> usize {
        match self {
            Span::Retain { count, .. } => *count,
            Span::Insert { .. } => 0,
            Span::Delete(count) => *count,
        }
    }

    /// Characters the span leaves in the result.
    pub fn dst_len(&self) -> usize {
        match self {
            Span::Retain { count, .. } => *count,
            Span::Insert { text, .. } => text.chars().count(),
            Span::Delete(_) => 0,
        }
    }

    /// Number of characters the span retains, inserts or deletes.
    pub fn len(&self) -> usize {
        match self {
            Span::Retain { count, .. } | Span::Delete(count) => *count,
            Span::Insert { text, .. } => text.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_retain(&self) -> bool {
        matches!(self, Span::Retain { .. })
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Span::Insert { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Span::Delete(_))
    }

    /// Attributes of a retain or insert; `None` for deletes and for spans
    /// with an empty attribute set.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Span::Retain { attributes, .. } | Span::Insert { attributes, .. } if !attributes.is_empty() => {
                Some(attributes)
            }
            _ => None,
        }
    }
}

/// A character count for [`crate::PlainTextOperation::delete`]: either a
/// number or the text being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount(pub usize);

impl From<usize> for CharCount {
    fn from(count: usize) -> Self {
        CharCount(count)
    }
}

impl From<&str> for CharCount {
    fn from(text: &str) -> Self {
        CharCount(text.chars().count())
    }
}

impl From<&String> for CharCount {
    fn from(text: &String) -> Self {
        CharCount::from(text.as_str())
    }
}

impl From<String> for CharCount {
    fn from(text: String) -> Self {
        CharCount::from(text.as_str())
    }
}

/// Splits `s` after `n` characters.
pub(crate) fn split_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((byte, _)) => s.split_at(byte),
        None => (s, ""),
    }
}
