//! JSON Pointer (RFC 6901) paths: computing them from parent links and
//! editing an existing tree through them.
//!
//! Segments are unescaped with `~1` → `/` then `~0` → `~`, and escaped in the
//! reverse order. The empty string addresses the document root.
//!
//! [`modify_by_pointer`] only edits structure that already exists. The parent
//! of the addressed location must resolve to an object or an array; missing
//! intermediate containers are never created.
//!
//! # Example
//! ```
//! use doctree_core::pointer::modify_by_pointer;
//! use serde_json::json;
//!
//! let mut doc = json!({"xs": [1, 2, 3]});
//! modify_by_pointer(&mut doc, "/xs/3", 4).unwrap();
//! assert_eq!(doc, json!({"xs": [1, 2, 3, 4]}));
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{Result, TreeError};
use crate::link::ParentLink;
use crate::types::{EditValue, Kind};

/// Escape one path segment: `~` → `~0`, `/` → `~1`.
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains(['~', '/']) {
        return segment.to_string();
    }
    segment.replace('~', "~0").replace('/', "~1")
}

/// Undo [`escape_segment`].
pub fn unescape_segment(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace("~1", "/").replace("~0", "~")
}

/// Parse an array index segment: ASCII digits, no leading zeros.
pub fn parse_index(segment: &str, pointer: &str) -> Result<usize> {
    let bytes = segment.as_bytes();
    let well_formed = !bytes.is_empty()
        && bytes.iter().all(u8::is_ascii_digit)
        && !(bytes.len() > 1 && bytes[0] == b'0');
    if !well_formed {
        return Err(TreeError::invalid_pointer(
            pointer,
            format!("`{segment}` is not an array index"),
        ));
    }
    segment
        .parse()
        .map_err(|_| TreeError::invalid_pointer(pointer, format!("index `{segment}` is too large")))
}

/// A parsed pointer: the ordered list of unescaped segments from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The pointer to the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse pointer text. The empty string is the root; anything else must
    /// start with `/`.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = text.strip_prefix('/') else {
            return Err(TreeError::invalid_pointer(text, "must be empty or start with `/`"));
        };
        Ok(Self {
            segments: rest.split('/').map(unescape_segment).collect(),
        })
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append an unescaped segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// This pointer extended by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.push(segment);
        out
    }

    /// Split into the parent pointer and the last segment.
    /// Returns `None` for the root, which has no parent.
    pub fn split_last(&self) -> Option<(JsonPointer, &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            JsonPointer {
                segments: parent.to_vec(),
            },
            last.as_str(),
        ))
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape_segment(segment))?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        JsonPointer::parse(s)
    }
}

/// Compute the pointer of a node from its parent link by walking the chain
/// of links up to a root view.
pub fn pointer_of(link: Option<ParentLink>) -> JsonPointer {
    let mut reversed = Vec::new();
    let mut current = link;
    while let Some(link) = current {
        reversed.push(link.segment());
        current = link.parent_link();
    }
    reversed.reverse();
    JsonPointer { segments: reversed }
}

/// Follow `pointer` from `document`. Returns `None` when any segment does
/// not resolve.
pub fn resolve<'a>(document: &'a Value, pointer: &JsonPointer) -> Option<&'a Value> {
    let mut node = document;
    for segment in pointer.segments() {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(arr) => arr.get(parse_index(segment, "").ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

fn resolve_mut<'a>(document: &'a mut Value, pointer: &JsonPointer) -> Option<&'a mut Value> {
    let mut node = document;
    for segment in pointer.segments() {
        node = match node {
            Value::Object(map) => map.get_mut(segment)?,
            Value::Array(arr) => arr.get_mut(parse_index(segment, "").ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Read the node at `pointer` text, cloned.
pub fn get_by_pointer(document: &Value, pointer: &str) -> Result<Option<Value>> {
    let parsed = JsonPointer::parse(pointer)?;
    Ok(resolve(document, &parsed).cloned())
}

/// Replace the node at `pointer` inside an existing tree.
///
/// The parent path must resolve to an object or an array:
/// - object parent: the last segment names the field to insert or replace;
/// - array parent: the last segment must be an index; `index < len` replaces,
///   `index == len` appends, anything larger is [`TreeError::IndexOutOfRange`].
///
/// Every other outcome, including the empty root pointer, is
/// [`TreeError::InvalidPointer`].
pub fn modify_by_pointer(
    document: &mut Value,
    pointer: &str,
    new_value: impl Into<EditValue>,
) -> Result<()> {
    let parsed = JsonPointer::parse(pointer)?;
    let Some((parent_path, last)) = parsed.split_last() else {
        return Err(TreeError::invalid_pointer(pointer, "the document root has no parent"));
    };
    let new_value = EditValue::into_value(new_value.into());
    let Some(parent) = resolve_mut(document, &parent_path) else {
        return Err(TreeError::invalid_pointer(
            pointer,
            format!("parent `{parent_path}` does not exist"),
        ));
    };

    match parent {
        Value::Object(map) => {
            tracing::debug!(%pointer, kind = %Kind::of(&new_value), "set object field by pointer");
            map.insert(last.to_string(), new_value);
            Ok(())
        }
        Value::Array(arr) => {
            let index = parse_index(last, pointer)?;
            let len = arr.len();
            if index < len {
                tracing::debug!(%pointer, index, "replace array element by pointer");
                arr[index] = new_value;
                Ok(())
            } else if index == len {
                tracing::debug!(%pointer, index, "append array element by pointer");
                arr.push(new_value);
                Ok(())
            } else {
                Err(TreeError::IndexOutOfRange { index, len })
            }
        }
        other => Err(TreeError::invalid_pointer(
            pointer,
            format!("parent `{parent_path}` is a {}, not a container", Kind::of(other)),
        )),
    }
}

/// Parse `json`, apply [`modify_by_pointer`], and return the edited tree.
pub fn modify_json_by_pointer(
    json: &str,
    pointer: &str,
    new_value: impl Into<EditValue>,
) -> Result<Value> {
    let mut document = crate::value::parse(json)?;
    modify_by_pointer(&mut document, pointer, new_value)?;
    Ok(document)
}
