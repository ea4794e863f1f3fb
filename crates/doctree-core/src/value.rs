//! Parsing and serialization of the document tree.
//!
//! Serialization is driven by a [`SerializeOptions`] value built for each
//! call. Output is deterministic: object fields are written in insertion
//! order and array elements in sequence.
//!
//! # Example
//! ```
//! use doctree_core::value::{parse, serialize, SerializeOptions};
//!
//! let tree = parse(r#"{"b":1,"a":[true,null]}"#).unwrap();
//! let text = serialize(&tree, &SerializeOptions::compact()).unwrap();
//! assert_eq!(text, r#"{"b":1,"a":[true,null]}"#);
//! ```

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::error::Result;

/// Formatting and inclusion choices for one serialization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Write one field or element per line.
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
    /// Drop object fields whose value is `null`, at every depth.
    pub skip_nulls: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self::compact()
    }
}

impl SerializeOptions {
    /// Single-line output, nulls kept.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent: 2,
            skip_nulls: false,
        }
    }

    /// Indented output with two spaces per level, nulls kept.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::compact()
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_skip_nulls(mut self, skip_nulls: bool) -> Self {
        self.skip_nulls = skip_nulls;
        self
    }
}

/// Parse JSON text into a tree.
pub fn parse(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a tree to JSON text.
pub fn serialize(value: &Value, opts: &SerializeOptions) -> Result<String> {
    if opts.skip_nulls {
        let stripped = strip_nulls(value);
        return write_text(&stripped, opts);
    }
    write_text(value, opts)
}

fn write_text(value: &Value, opts: &SerializeOptions) -> Result<String> {
    if !opts.pretty {
        return Ok(serde_json::to_string(value)?);
    }
    let indent = " ".repeat(opts.indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Copy of `value` with every `null`-valued object field removed.
/// Array elements are kept even when they are `null`.
pub fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(strip_nulls).collect()),
        other => other.clone(),
    }
}

/// Maximum nesting depth of a tree; scalars have depth 0.
pub fn depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        Value::Array(arr) => 1 + arr.iter().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}
