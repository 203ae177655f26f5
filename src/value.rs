//! In-memory values produced by decoding and consumed by encoding.

use indexmap::IndexMap;

use crate::shape::{ScalarKind, Shape};

/// A decoded or to-be-encoded value.
///
/// Records carry their own wire names and omit flags, so the encoder
/// walks a value without consulting a shape descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer (32-bit targets are range-checked on decode).
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 text.
    Text(String),
    /// Ordered list of values of one shape.
    Sequence(Vec<Value>),
    /// Key-value pairs, insertion-ordered so encode output is
    /// reproducible.
    Mapping(IndexMap<String, Value>),
    /// Ordered named fields.
    Record(Vec<RecordField>),
}

/// One record field with its resolved wire name and omit flag.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    /// Name as it appears in the document.
    pub name: String,
    /// Skip the field when encoding if its value is an empty sequence,
    /// mapping, or text.
    pub omit_empty: bool,
    /// The field's value.
    pub value: Value,
}

impl RecordField {
    /// Field with omit-if-empty off.
    pub fn new(name: &str, value: Value) -> RecordField {
        RecordField {
            name: name.to_string(),
            omit_empty: false,
            value,
        }
    }

    /// Field with omit-if-empty on.
    pub fn omit_empty(name: &str, value: Value) -> RecordField {
        RecordField {
            name: name.to_string(),
            omit_empty: true,
            value,
        }
    }
}

impl Value {
    /// The zero value for a shape: `0`, `0.0`, `false`, empty text, or an
    /// empty sequence, mapping, or zero-filled record.
    ///
    /// Record decoding starts from the zero value, so fields absent from
    /// a document keep their zeros.
    pub fn zero(shape: &Shape) -> Value {
        match shape {
            Shape::Scalar(ScalarKind::Int { .. }) => Value::Integer(0),
            Shape::Scalar(ScalarKind::Float) => Value::Float(0.0),
            Shape::Scalar(ScalarKind::Bool) => Value::Bool(false),
            Shape::Scalar(ScalarKind::Text) => Value::Text(String::new()),
            Shape::Sequence(_) => Value::Sequence(Vec::new()),
            Shape::Mapping(_) => Value::Mapping(IndexMap::new()),
            Shape::Record(fields) => Value::Record(
                fields
                    .iter()
                    .map(|f| RecordField {
                        name: f.name.clone(),
                        omit_empty: f.omit_empty,
                        value: Value::zero(&f.shape),
                    })
                    .collect(),
            ),
        }
    }

    /// Returns the integer if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text if this is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the fields if this is a `Record`.
    pub fn as_record(&self) -> Option<&[RecordField]> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a record field's value by wire name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.iter().find(|f| f.name == name).map(|f| &f.value),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}
