//! Selections that follow the text they point into.

use ot_plaintext::{PlainTextOperation, Span};
use serde::{Deserialize, Serialize};

/// An immutable selection `(anchor, head)`. A selection with
/// `anchor == head` is a caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    anchor: usize,
    head: usize,
}

impl Cursor {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn is_caret(&self) -> bool {
        self.anchor == self.head
    }

    /// A later cursor supersedes an earlier one.
    pub fn compose(&self, other: &Cursor) -> Cursor {
        *other
    }

    /// Moves both ends through `operation`. Text inserted at the position
    /// pushes it forward; deleted text before it pulls it back.
    pub fn transform(&self, operation: &PlainTextOperation) -> Cursor {
        let anchor = transform_index(self.anchor, operation);
        if self.is_caret() {
            return Cursor::caret(anchor);
        }
        Cursor::new(anchor, transform_index(self.head, operation))
    }
}

fn transform_index(index: usize, operation: &PlainTextOperation) -> usize {
    let mut new_index = index;
    // Source characters still ahead of the position.
    let mut ahead = index;
    for span in operation.spans() {
        match span {
            Span::Retain { count, .. } => {
                if *count > ahead {
                    break;
                }
                ahead -= count;
            }
            Span::Insert { text, .. } => {
                new_index += text.chars().count();
            }
            Span::Delete(count) => {
                new_index -= ahead.min(*count);
                if *count > ahead {
                    break;
                }
                ahead -= count;
            }
        }
    }
    new_index
}
