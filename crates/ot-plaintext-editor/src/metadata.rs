use ot_plaintext::PlainTextOperation;
use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;

/// Cursor positions before and after an operation. Purely informational:
/// never affects how the operation edits text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    cursor_before: Option<Cursor>,
    cursor_after: Option<Cursor>,
}

impl OperationMetadata {
    pub fn new(cursor_before: Option<Cursor>, cursor_after: Option<Cursor>) -> Self {
        Self {
            cursor_before,
            cursor_after,
        }
    }

    pub fn cursor_before(&self) -> Option<Cursor> {
        self.cursor_before
    }

    pub fn cursor_after(&self) -> Option<Cursor> {
        self.cursor_after
    }

    /// Metadata of the inverse operation: before and after trade places.
    pub fn invert(&self) -> Self {
        Self::new(self.cursor_after, self.cursor_before)
    }

    /// Metadata of `self`'s operation followed by `other`'s.
    pub fn compose(&self, other: &Self) -> Self {
        let cursor_after = match (self.cursor_after, other.cursor_after) {
            (Some(first), Some(second)) => Some(first.compose(&second)),
            (_, second) => second,
        };
        Self::new(self.cursor_before, cursor_after)
    }

    /// Moves both cursors through a concurrent `operation`.
    pub fn transform(&self, operation: &PlainTextOperation) -> Self {
        Self::new(
            self.cursor_before.map(|cursor| cursor.transform(operation)),
            self.cursor_after.map(|cursor| cursor.transform(operation)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_swaps() {
        let meta = OperationMetadata::new(Some(Cursor::new(4, 9)), None);
        assert_eq!(meta.invert(), OperationMetadata::new(None, Some(Cursor::new(4, 9))));
    }

    #[test]
    fn compose_spans_both() {
        let a = OperationMetadata::new(Some(Cursor::new(2, 9)), Some(Cursor::new(3, 5)));
        let b = OperationMetadata::new(Some(Cursor::new(3, 9)), Some(Cursor::new(4, 7)));
        assert_eq!(
            a.compose(&b),
            OperationMetadata::new(Some(Cursor::new(2, 9)), Some(Cursor::new(4, 7)))
        );
    }

    #[test]
    fn compose_without_later_cursor() {
        let a = OperationMetadata::new(Some(Cursor::caret(1)), Some(Cursor::caret(2)));
        let b = OperationMetadata::new(None, None);
        assert_eq!(a.compose(&b), OperationMetadata::new(Some(Cursor::caret(1)), None));
        assert_eq!(b.compose(&a), OperationMetadata::new(None, Some(Cursor::caret(2))));
    }

    #[test]
    fn serde_shape() {
        let meta = OperationMetadata::new(None, Some(Cursor::caret(1)));
        assert_eq!(
            serde_json::to_value(meta).unwrap(),
            serde_json::json!({"cursorBefore": null, "cursorAfter": {"anchor": 1, "head": 1}})
        );
    }
}
