//! JSON wire form of a [`PlainTextOperation`].
//!
//! Each span becomes one token:
//! - `n` (positive integer): retain `n` characters;
//! - `-n` (negative integer): delete `n` characters;
//! - `"text"`: insert `text`.
//!
//! An attribute object right before a retain or insert token applies to that
//! span. An operation without spans is written as `[0]`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::attributes::{AttributeValue, Attributes};
use crate::error::OperationError;
use crate::operation::PlainTextOperation;
use crate::span::Span;

impl PlainTextOperation {
    /// Encodes the operation into its token array.
    pub fn to_json(&self) -> Value {
        if self.spans().is_empty() {
            return Value::Array(vec![Value::from(0)]);
        }
        let mut tokens = Vec::with_capacity(self.spans().len());
        for span in self.spans() {
            if let Some(attributes) = span.attributes() {
                tokens.push(encode_attributes(attributes));
            }
            tokens.push(match span {
                Span::Retain { count, .. } => Value::from(*count),
                Span::Insert { text, .. } => Value::String(text.clone()),
                Span::Delete(count) => Value::from(-(*count as i64)),
            });
        }
        Value::Array(tokens)
    }

    /// Decodes an operation from its token array.
    pub fn from_json(value: &Value) -> Result<Self, OperationError> {
        let tokens = value
            .as_array()
            .ok_or_else(|| invalid("operation must be an array"))?;

        let mut operation = PlainTextOperation::new();
        let mut pending: Option<Attributes> = None;
        // Totals must fit in usize before the builders add them up.
        let (mut base, mut target) = (0usize, 0usize);
        for token in tokens {
            let span = match token {
                Value::Object(map) => {
                    if pending.is_some() {
                        return Err(invalid("consecutive attribute objects"));
                    }
                    pending = Some(decode_attributes(map)?);
                    continue;
                }
                Value::Number(number) => {
                    let n = number
                        .as_i64()
                        .ok_or_else(|| invalid(format!("not an integer count: {number}")))?;
                    let count = usize::try_from(n.unsigned_abs()).map_err(|_| invalid("count overflow"))?;
                    if n > 0 {
                        Span::Retain {
                            count,
                            attributes: pending.take().unwrap_or_default(),
                        }
                    } else if pending.is_some() {
                        return Err(invalid("attributes must precede a retain or insert"));
                    } else {
                        Span::Delete(count)
                    }
                }
                Value::String(text) => Span::Insert {
                    text: text.clone(),
                    attributes: pending.take().unwrap_or_default(),
                },
                other => return Err(invalid(format!("unexpected token: {other}"))),
            };
            base = base.checked_add(span.src_len()).ok_or_else(|| invalid("count overflow"))?;
            target = target.checked_add(span.dst_len()).ok_or_else(|| invalid("count overflow"))?;
            operation.push(span);
        }
        if pending.is_some() {
            return Err(invalid("trailing attribute object"));
        }
        Ok(operation)
    }
}

fn invalid(message: impl Into<String>) -> OperationError {
    OperationError::InvalidArgument(message.into())
}

fn encode_attributes(attributes: &Attributes) -> Value {
    let map: Map<String, Value> = attributes
        .iter()
        .map(|(key, value)| (key.clone(), attribute_to_json(value)))
        .collect();
    Value::Object(map)
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Number(n) => Value::Number(n.clone()),
        AttributeValue::String(s) => Value::String(s.clone()),
    }
}

fn decode_attributes(map: &Map<String, Value>) -> Result<Attributes, OperationError> {
    map.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Null => AttributeValue::Null,
                Value::Bool(b) => AttributeValue::Bool(*b),
                Value::Number(n) => AttributeValue::Number(n.clone()),
                Value::String(s) => AttributeValue::String(s.clone()),
                _ => return Err(invalid(format!("attribute {key:?} is not a primitive"))),
            };
            Ok((key.clone(), value))
        })
        .collect()
}

impl Serialize for PlainTextOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PlainTextOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        PlainTextOperation::from_json(&value).map_err(D::Error::custom)
    }
}
