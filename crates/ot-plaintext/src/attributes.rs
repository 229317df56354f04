//! Attribute sets attached to retain and insert spans.
//!
//! An attribute set maps string keys to primitive values. An empty set means
//! "no attributes", so spans never need an `Option` around it. Inside a retain
//! span the value `false` means "remove this key" when the span is applied.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A primitive attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl AttributeValue {
    /// `false` clears a key instead of setting it.
    pub fn is_removal(&self) -> bool {
        matches!(self, AttributeValue::Bool(false))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value.into())
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::Number(value.into())
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

/// Key/value attributes of a span. Equality ignores key order.
pub type Attributes = IndexMap<String, AttributeValue>;

/// Overlays `update` on top of `current`, as a retain span does for every
/// character it copies.
pub fn overlay(current: Option<&Attributes>, update: &Attributes) -> Attributes {
    let mut merged = current.cloned().unwrap_or_default();
    for (key, value) in update {
        if value.is_removal() {
            merged.shift_remove(key);
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Merges the attributes of two sequential spans covering the same
/// characters. The second span wins on conflict. When the first span is an
/// insert, removals in `second` drop the key outright since there is nothing
/// underneath left to clear.
pub fn compose_attributes(first: &Attributes, second: &Attributes, first_is_insert: bool) -> Attributes {
    let mut merged = first.clone();
    for (key, value) in second {
        if first_is_insert && value.is_removal() {
            merged.shift_remove(key);
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Splits the attributes of two concurrent retains over the same range into
/// the attributes each side still has to apply after the other.
///
/// Keys set by only one side stay with that side. Keys set to the same value
/// by both are already applied everywhere. Keys set to different values go to
/// the left operand.
pub fn transform_attributes(left: &Attributes, right: &Attributes) -> (Attributes, Attributes) {
    let mut left_prime = Attributes::new();
    let mut right_prime = Attributes::new();

    for (key, value) in left {
        match right.get(key) {
            Some(other) if other == value => {}
            _ => {
                left_prime.insert(key.clone(), value.clone());
            }
        }
    }
    for (key, value) in right {
        if !left.contains_key(key) {
            right_prime.insert(key.clone(), value.clone());
        }
    }
    (left_prime, right_prime)
}
