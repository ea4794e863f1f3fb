//! Value tags and the closed set of values that can be written into a tree.
//!
//! The tree itself is a `serde_json::Value` (built with `preserve_order`, so
//! object fields keep insertion order). This module adds the two small types
//! the rest of the crate dispatches on: [`Kind`] for reporting what a node is,
//! and [`EditValue`] for what a mutation writes.

use std::fmt;

use serde_json::{Number, Value};

/// The variant tag of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    /// Tag of the given node.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// True for arrays and objects.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Object)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A value that can be written into a tree by a view mutator or a pointer
/// modification.
///
/// The representation is decided once, when the caller's value is converted
/// through one of the `From` impls, instead of inspecting it at write time.
#[derive(Debug, Clone, PartialEq)]
pub enum EditValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Non-finite floats are written as `null`.
    Float(f64),
    Str(String),
    /// An arbitrary subtree, written as-is.
    Tree(Value),
}

impl EditValue {
    /// Convert into the node that will be stored.
    pub fn into_value(self) -> Value {
        match self {
            EditValue::Null => Value::Null,
            EditValue::Bool(b) => Value::Bool(b),
            EditValue::Int(n) => Value::Number(n.into()),
            EditValue::UInt(n) => Value::Number(n.into()),
            EditValue::Float(f) => Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            EditValue::Str(s) => Value::String(s),
            EditValue::Tree(v) => v,
        }
    }

    /// Tag of the node this value will become.
    pub fn kind(&self) -> Kind {
        match self {
            EditValue::Null => Kind::Null,
            EditValue::Bool(_) => Kind::Bool,
            EditValue::Int(_) | EditValue::UInt(_) => Kind::Number,
            EditValue::Float(f) if f.is_finite() => Kind::Number,
            EditValue::Float(_) => Kind::Null,
            EditValue::Str(_) => Kind::String,
            EditValue::Tree(v) => Kind::of(v),
        }
    }
}

impl From<EditValue> for Value {
    fn from(v: EditValue) -> Self {
        v.into_value()
    }
}

impl From<Value> for EditValue {
    fn from(v: Value) -> Self {
        EditValue::Tree(v)
    }
}

impl From<&Value> for EditValue {
    fn from(v: &Value) -> Self {
        EditValue::Tree(v.clone())
    }
}

impl From<bool> for EditValue {
    fn from(b: bool) -> Self {
        EditValue::Bool(b)
    }
}

impl From<&str> for EditValue {
    fn from(s: &str) -> Self {
        EditValue::Str(s.to_string())
    }
}

impl From<String> for EditValue {
    fn from(s: String) -> Self {
        EditValue::Str(s)
    }
}

impl From<char> for EditValue {
    fn from(c: char) -> Self {
        EditValue::Str(c.to_string())
    }
}

impl From<f32> for EditValue {
    fn from(f: f32) -> Self {
        EditValue::Float(f64::from(f))
    }
}

impl From<f64> for EditValue {
    fn from(f: f64) -> Self {
        EditValue::Float(f)
    }
}

impl<T: Into<EditValue>> From<Option<T>> for EditValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(EditValue::Null)
    }
}

macro_rules! edit_value_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for EditValue {
            fn from(n: $t) -> Self {
                EditValue::Int(i64::from(n))
            }
        })*
    };
}

macro_rules! edit_value_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for EditValue {
            fn from(n: $t) -> Self {
                EditValue::UInt(u64::from(n))
            }
        })*
    };
}

edit_value_from_signed!(i8, i16, i32, i64);
edit_value_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for EditValue {
    fn from(n: usize) -> Self {
        EditValue::UInt(n as u64)
    }
}

/// Interpret free-form text as a value to write.
///
/// Text that is valid JSON becomes that JSON value (`42`, `true`, `{"a":1}`);
/// anything else is written as a plain string.
pub fn coerce_text(text: &str) -> EditValue {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => EditValue::Tree(v),
        Err(_) => EditValue::Str(text.to_string()),
    }
}
