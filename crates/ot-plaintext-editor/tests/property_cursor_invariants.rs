use ot_plaintext::PlainTextOperation;
use ot_plaintext_editor::{Cursor, OperationMetadata, WrappedOperation};
use proptest::prelude::*;

type Step = (u8, usize, String);

/// Builds an operation over a document of `base` characters, retaining
/// whatever the steps leave untouched.
fn build_op(base: usize, steps: &[Step]) -> PlainTextOperation {
    let mut op = PlainTextOperation::new();
    let mut remaining = base;
    for (kind, n, text) in steps {
        match kind % 3 {
            0 => {
                let n = (*n).min(remaining);
                op.retain(n);
                remaining -= n;
            }
            1 => {
                op.insert(text.as_str());
            }
            _ => {
                let n = (*n).min(remaining);
                op.delete(n);
                remaining -= n;
            }
        }
    }
    op.retain(remaining);
    op
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec((0u8..3, 1usize..6, "[A-Zü]{1,3}"), 0..10)
}

fn doc() -> impl Strategy<Value = String> {
    "[a-zé]{0,16}"
}

proptest! {
    #[test]
    fn transformed_cursor_stays_inside_result(doc in doc(), s in steps(), a in 0usize..32, h in 0usize..32) {
        let len = doc.chars().count();
        let op = build_op(len, &s);
        let cursor = Cursor::new(a % (len + 1), h % (len + 1));
        let moved = cursor.transform(&op);
        prop_assert!(moved.anchor() <= op.target_length());
        prop_assert!(moved.head() <= op.target_length());
    }

    #[test]
    fn cursor_transform_keeps_order(doc in doc(), s in steps(), i in 0usize..32, j in 0usize..32) {
        let len = doc.chars().count();
        let op = build_op(len, &s);
        let (lo, hi) = {
            let (i, j) = (i % (len + 1), j % (len + 1));
            (i.min(j), i.max(j))
        };
        let moved = Cursor::new(lo, hi).transform(&op);
        prop_assert!(moved.anchor() <= moved.head());
    }

    #[test]
    fn retain_only_operation_leaves_cursor(doc in doc(), a in 0usize..32) {
        let len = doc.chars().count();
        let mut op = PlainTextOperation::new();
        op.retain(len);
        let cursor = Cursor::caret(a % (len + 1));
        prop_assert_eq!(cursor.transform(&op), cursor);
    }

    #[test]
    fn wrapped_transform_converges_and_carries_cursors(
        doc in doc(),
        sa in steps(),
        sb in steps(),
        ca in 0usize..32,
        cb in 0usize..32,
    ) {
        let len = doc.chars().count();
        let before_a = Cursor::caret(ca % (len + 1));
        let before_b = Cursor::caret(cb % (len + 1));
        let a = WrappedOperation::new(build_op(len, &sa), Some(OperationMetadata::new(Some(before_a), None)));
        let b = WrappedOperation::new(build_op(len, &sb), Some(OperationMetadata::new(Some(before_b), None)));

        let (a_prime, b_prime) = a.transform(&b).unwrap();
        let left = b_prime.apply(&a.apply(&doc).unwrap()).unwrap();
        let right = a_prime.apply(&b.apply(&doc).unwrap()).unwrap();
        prop_assert_eq!(&left, &right);

        let a_meta = a_prime.metadata().copied().unwrap();
        prop_assert_eq!(a_meta.cursor_before(), Some(before_a.transform(b.operation())));
        prop_assert_eq!(a_meta.cursor_after(), None);
        let b_meta = b_prime.metadata().copied().unwrap();
        prop_assert_eq!(b_meta.cursor_before(), Some(before_b.transform(a.operation())));
    }
}
