//! Detached object and array views with write-back to their source.
//!
//! A view owns a private copy of an object or array plus an optional
//! [`ParentLink`] naming the view it was read from. Navigating with
//! `get_object` / `get_array` copies the addressed child and links the copy
//! back to the view it came from. Mutating any view updates its own copy and
//! then writes the whole copy into its parent, recursively, so the change is
//! visible when the same path is read again from the root.
//!
//! Propagation only runs child → parent. A view captured earlier is a
//! snapshot: later writes made through other views are not visible in it, and
//! writing through a stale view writes its stale copy back.
//!
//! View handles are reference-counted. Cloning a handle gives the same view
//! (see [`ObjectView::ptr_eq`]); use `deep_copy` for an independent root.
//! Handles are single-threaded and not `Send`.
//!
//! # Example
//! ```
//! use doctree_core::ObjectView;
//!
//! let root = ObjectView::parse(r#"{"a":{"b":1}}"#).unwrap();
//! let a = root.get_object("a").unwrap();
//! a.put("b", 2).unwrap();
//! assert_eq!(root.get_object("a").unwrap().get_i64("b").unwrap(), 2);
//! assert_eq!(a.pointer().to_string(), "/a");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, TreeError};
use crate::link::ParentLink;
use crate::pointer::{self, JsonPointer};
use crate::propagate::propagate;
use crate::types::{EditValue, Kind};
use crate::value::{self, SerializeOptions};

const ROOT: &str = "document root";

// ─────────────────────────────────────────────────────────────────────────────
// Typed extraction shared by both view kinds
// ─────────────────────────────────────────────────────────────────────────────

fn mismatch(at: String, expected: Kind, found: &Value) -> TreeError {
    TreeError::TypeMismatch {
        at,
        expected,
        found: Kind::of(found),
    }
}

fn extract_i64(value: &Value, at: String) -> Result<i64> {
    let Value::Number(n) = value else {
        return Err(mismatch(at, Kind::Number, value));
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(TreeError::NumberOutOfRange {
            at,
            value: n.to_string(),
        });
    }
    // Fractional numbers truncate toward zero.
    n.as_f64()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
        .ok_or_else(|| TreeError::NumberOutOfRange {
            at,
            value: n.to_string(),
        })
}

fn extract_i32(value: &Value, at: String) -> Result<i32> {
    let wide = extract_i64(value, at.clone())?;
    i32::try_from(wide).map_err(|_| TreeError::NumberOutOfRange {
        at,
        value: wide.to_string(),
    })
}

fn extract_f64(value: &Value, at: String) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| TreeError::NumberOutOfRange {
            at,
            value: n.to_string(),
        }),
        other => Err(mismatch(at, Kind::Number, other)),
    }
}

fn extract_string(value: &Value, at: String) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(mismatch(at, Kind::String, other)),
    }
}

fn extract_bool(value: &Value, at: String) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(mismatch(at, Kind::Bool, other)),
    }
}

fn field_at(name: &str) -> String {
    format!("field `{name}`")
}

fn index_at(index: usize) -> String {
    format!("index {index}")
}

// ─────────────────────────────────────────────────────────────────────────────
// ObjectView
// ─────────────────────────────────────────────────────────────────────────────

struct ObjectNode {
    fields: Map<String, Value>,
    link: Option<ParentLink>,
}

/// A detached copy of an object node, optionally linked to the view it was
/// read from.
#[derive(Clone)]
pub struct ObjectView {
    node: Rc<RefCell<ObjectNode>>,
}

impl Default for ObjectView {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectView {
    /// An empty root object.
    pub fn new() -> Self {
        Self::from_map(Map::new())
    }

    /// A root view over the given fields.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self::linked(fields, None)
    }

    /// A root view over an object value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::from_map(fields)),
            other => Err(mismatch(ROOT.to_string(), Kind::Object, &other)),
        }
    }

    /// Parse JSON text that must describe an object.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(value::parse(text)?)
    }

    /// Convert a typed structure into a root view.
    pub fn from_serialize<T: Serialize>(data: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(data)?)
    }

    /// A view over `value` attached to at most one parent.
    ///
    /// Supplying both an object parent and an array parent is an
    /// [`TreeError::InvariantViolation`].
    pub fn attached(
        value: Value,
        object_parent: Option<(ObjectView, String)>,
        array_parent: Option<(ArrayView, usize)>,
    ) -> Result<Self> {
        let link = ParentLink::from_parts(object_parent, array_parent)?;
        match value {
            Value::Object(fields) => Ok(Self::linked(fields, link)),
            other => Err(mismatch(ROOT.to_string(), Kind::Object, &other)),
        }
    }

    fn linked(fields: Map<String, Value>, link: Option<ParentLink>) -> Self {
        Self {
            node: Rc::new(RefCell::new(ObjectNode { fields, link })),
        }
    }

    /// Convert the current contents into a typed structure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    /// The link to the view this one was read from; `None` for roots.
    pub fn link(&self) -> Option<ParentLink> {
        self.node.borrow().link.clone()
    }

    /// Drop the parent link, turning this view into a root. Later writes stay
    /// local and the ancestor chain is no longer kept alive by this view.
    pub fn detach(&self) {
        self.node.borrow_mut().link = None;
    }

    /// True when both handles refer to the same view.
    pub fn ptr_eq(&self, other: &ObjectView) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// An independent root view with the same contents.
    pub fn deep_copy(&self) -> ObjectView {
        Self::from_map(self.node.borrow().fields.clone())
    }

    /// Where this view sits relative to its root.
    pub fn pointer(&self) -> JsonPointer {
        pointer::pointer_of(self.link())
    }

    /// Pointer to a (possibly not yet existing) field of this view.
    pub fn pointer_to(&self, name: &str) -> JsonPointer {
        self.pointer().child(name)
    }

    pub fn len(&self) -> usize {
        self.node.borrow().fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.borrow().fields.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.node.borrow().fields.contains_key(name)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.node.borrow().fields.keys().cloned().collect()
    }

    /// The raw child value, if present.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.node.borrow().fields.get(name).cloned()
    }

    fn require(&self, name: &str) -> Result<Value> {
        self.get(name).ok_or_else(|| TreeError::FieldNotFound {
            name: name.to_string(),
        })
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        extract_i64(&self.require(name)?, field_at(name))
    }

    pub fn get_i32(&self, name: &str) -> Result<i32> {
        extract_i32(&self.require(name)?, field_at(name))
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        extract_f64(&self.require(name)?, field_at(name))
    }

    pub fn get_str(&self, name: &str) -> Result<String> {
        extract_string(&self.require(name)?, field_at(name))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        extract_bool(&self.require(name)?, field_at(name))
    }

    /// Copy the object field `name` into a new view linked back to this one.
    pub fn get_object(&self, name: &str) -> Result<ObjectView> {
        match self.require(name)? {
            Value::Object(fields) => Ok(ObjectView::linked(
                fields,
                Some(ParentLink::Object {
                    parent: self.clone(),
                    name: name.to_string(),
                }),
            )),
            other => Err(mismatch(field_at(name), Kind::Object, &other)),
        }
    }

    /// Copy the array field `name` into a new view linked back to this one.
    pub fn get_array(&self, name: &str) -> Result<ArrayView> {
        match self.require(name)? {
            Value::Array(elements) => Ok(ArrayView::linked(
                elements,
                Some(ParentLink::Object {
                    parent: self.clone(),
                    name: name.to_string(),
                }),
            )),
            other => Err(mismatch(field_at(name), Kind::Array, &other)),
        }
    }

    /// Insert or replace a field, then write this view back to its parent.
    pub fn put(&self, name: impl Into<String>, value: impl Into<EditValue>) -> Result<()> {
        // Converted before borrowing: the value may be a snapshot of this view.
        let value = EditValue::into_value(value.into());
        self.node.borrow_mut().fields.insert(name.into(), value);
        self.propagate()
    }

    /// Same as [`ObjectView::put`].
    pub fn set(&self, name: impl Into<String>, value: impl Into<EditValue>) -> Result<()> {
        self.put(name, value)
    }

    pub fn put_null(&self, name: impl Into<String>) -> Result<()> {
        self.put(name, EditValue::Null)
    }

    /// Remove a field, keeping the order of the others. Propagates only when
    /// a field was actually removed.
    pub fn remove(&self, name: &str) -> Result<Option<Value>> {
        let removed = self.node.borrow_mut().fields.shift_remove(name);
        if removed.is_some() {
            self.propagate()?;
        }
        Ok(removed)
    }

    /// Read the node at `pointer`, relative to this view.
    pub fn get_by_pointer(&self, pointer: &str) -> Result<Option<Value>> {
        pointer::get_by_pointer(&self.to_value(), pointer)
    }

    /// Apply [`pointer::modify_by_pointer`] relative to this view, then write
    /// this view back to its parent.
    pub fn set_by_pointer(&self, pointer: &str, value: impl Into<EditValue>) -> Result<()> {
        let value: EditValue = value.into();
        {
            let mut node = self.node.borrow_mut();
            let mut document = Value::Object(std::mem::take(&mut node.fields));
            let outcome = pointer::modify_by_pointer(&mut document, pointer, value);
            if let Value::Object(fields) = document {
                node.fields = fields;
            }
            outcome?;
        }
        self.propagate()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.node.borrow().fields.clone())
    }

    pub fn to_json_string(&self, opts: &SerializeOptions) -> Result<String> {
        value::serialize(&self.to_value(), opts)
    }

    fn propagate(&self) -> Result<()> {
        propagate(self.link(), || self.to_value())
    }
}

impl fmt::Debug for ObjectView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectView")
            .field("pointer", &self.pointer().to_string())
            .field("fields", &self.node.borrow().fields)
            .finish()
    }
}

impl From<ObjectView> for EditValue {
    fn from(view: ObjectView) -> Self {
        EditValue::Tree(view.to_value())
    }
}

impl From<&ObjectView> for EditValue {
    fn from(view: &ObjectView) -> Self {
        EditValue::Tree(view.to_value())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ArrayView
// ─────────────────────────────────────────────────────────────────────────────

struct ArrayNode {
    elements: Vec<Value>,
    link: Option<ParentLink>,
}

/// A detached copy of an array node, optionally linked to the view it was
/// read from.
#[derive(Clone)]
pub struct ArrayView {
    node: Rc<RefCell<ArrayNode>>,
}

impl Default for ArrayView {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayView {
    /// An empty root array.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(elements: Vec<Value>) -> Self {
        Self::linked(elements, None)
    }

    /// A root view over an array value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(elements) => Ok(Self::from_vec(elements)),
            other => Err(mismatch(ROOT.to_string(), Kind::Array, &other)),
        }
    }

    /// Parse JSON text that must describe an array.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(value::parse(text)?)
    }

    /// A view over `value` attached to at most one parent.
    ///
    /// Supplying both an object parent and an array parent is an
    /// [`TreeError::InvariantViolation`].
    pub fn attached(
        value: Value,
        object_parent: Option<(ObjectView, String)>,
        array_parent: Option<(ArrayView, usize)>,
    ) -> Result<Self> {
        let link = ParentLink::from_parts(object_parent, array_parent)?;
        match value {
            Value::Array(elements) => Ok(Self::linked(elements, link)),
            other => Err(mismatch(ROOT.to_string(), Kind::Array, &other)),
        }
    }

    fn linked(elements: Vec<Value>, link: Option<ParentLink>) -> Self {
        Self {
            node: Rc::new(RefCell::new(ArrayNode { elements, link })),
        }
    }

    pub fn link(&self) -> Option<ParentLink> {
        self.node.borrow().link.clone()
    }

    /// Drop the parent link, turning this view into a root.
    pub fn detach(&self) {
        self.node.borrow_mut().link = None;
    }

    pub fn ptr_eq(&self, other: &ArrayView) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    pub fn deep_copy(&self) -> ArrayView {
        Self::from_vec(self.node.borrow().elements.clone())
    }

    pub fn pointer(&self) -> JsonPointer {
        pointer::pointer_of(self.link())
    }

    pub fn pointer_to(&self, index: usize) -> JsonPointer {
        self.pointer().child(index.to_string())
    }

    pub fn len(&self) -> usize {
        self.node.borrow().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.borrow().elements.is_empty()
    }

    /// Snapshot of all elements.
    pub fn values(&self) -> Vec<Value> {
        self.node.borrow().elements.clone()
    }

    /// The raw element, if `index` is in range.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.node.borrow().elements.get(index).cloned()
    }

    fn require(&self, index: usize) -> Result<Value> {
        let node = self.node.borrow();
        node.elements
            .get(index)
            .cloned()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: node.elements.len(),
            })
    }

    pub fn get_i64(&self, index: usize) -> Result<i64> {
        extract_i64(&self.require(index)?, index_at(index))
    }

    pub fn get_i32(&self, index: usize) -> Result<i32> {
        extract_i32(&self.require(index)?, index_at(index))
    }

    pub fn get_f64(&self, index: usize) -> Result<f64> {
        extract_f64(&self.require(index)?, index_at(index))
    }

    pub fn get_str(&self, index: usize) -> Result<String> {
        extract_string(&self.require(index)?, index_at(index))
    }

    pub fn get_bool(&self, index: usize) -> Result<bool> {
        extract_bool(&self.require(index)?, index_at(index))
    }

    /// Copy the object element at `index` into a new view linked back to this one.
    pub fn get_object(&self, index: usize) -> Result<ObjectView> {
        match self.require(index)? {
            Value::Object(fields) => Ok(ObjectView::linked(
                fields,
                Some(ParentLink::Array {
                    parent: self.clone(),
                    index,
                }),
            )),
            other => Err(mismatch(index_at(index), Kind::Object, &other)),
        }
    }

    /// Copy the array element at `index` into a new view linked back to this one.
    pub fn get_array(&self, index: usize) -> Result<ArrayView> {
        match self.require(index)? {
            Value::Array(elements) => Ok(ArrayView::linked(
                elements,
                Some(ParentLink::Array {
                    parent: self.clone(),
                    index,
                }),
            )),
            other => Err(mismatch(index_at(index), Kind::Array, &other)),
        }
    }

    /// Every element as a linked object view. Fails on the first element that
    /// is not an object.
    pub fn objects(&self) -> Result<Vec<ObjectView>> {
        (0..self.len()).map(|i| self.get_object(i)).collect()
    }

    /// Append an element, then write this view back to its parent.
    pub fn add(&self, value: impl Into<EditValue>) -> Result<()> {
        let value = EditValue::into_value(value.into());
        self.node.borrow_mut().elements.push(value);
        self.propagate()
    }

    /// Replace the element at `index`; requires `index < len`.
    pub fn set(&self, index: usize, value: impl Into<EditValue>) -> Result<()> {
        let value = EditValue::into_value(value.into());
        {
            let mut node = self.node.borrow_mut();
            let len = node.elements.len();
            let Some(slot) = node.elements.get_mut(index) else {
                return Err(TreeError::IndexOutOfRange { index, len });
            };
            *slot = value;
        }
        self.propagate()
    }

    /// Insert before `index`, shifting later elements; requires `index <= len`.
    pub fn insert(&self, index: usize, value: impl Into<EditValue>) -> Result<()> {
        let value = EditValue::into_value(value.into());
        {
            let mut node = self.node.borrow_mut();
            let len = node.elements.len();
            if index > len {
                return Err(TreeError::IndexOutOfRange { index, len });
            }
            node.elements.insert(index, value);
        }
        self.propagate()
    }

    /// Remove and return the element at `index`; requires `index < len`.
    pub fn remove(&self, index: usize) -> Result<Value> {
        let removed = {
            let mut node = self.node.borrow_mut();
            let len = node.elements.len();
            if index >= len {
                return Err(TreeError::IndexOutOfRange { index, len });
            }
            node.elements.remove(index)
        };
        self.propagate()?;
        Ok(removed)
    }

    /// Read the node at `pointer`, relative to this view.
    pub fn get_by_pointer(&self, pointer: &str) -> Result<Option<Value>> {
        pointer::get_by_pointer(&self.to_value(), pointer)
    }

    /// Apply [`pointer::modify_by_pointer`] relative to this view, then write
    /// this view back to its parent.
    pub fn set_by_pointer(&self, pointer: &str, value: impl Into<EditValue>) -> Result<()> {
        let value: EditValue = value.into();
        {
            let mut node = self.node.borrow_mut();
            let mut document = Value::Array(std::mem::take(&mut node.elements));
            let outcome = pointer::modify_by_pointer(&mut document, pointer, value);
            if let Value::Array(elements) = document {
                node.elements = elements;
            }
            outcome?;
        }
        self.propagate()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.node.borrow().elements.clone())
    }

    pub fn to_json_string(&self, opts: &SerializeOptions) -> Result<String> {
        value::serialize(&self.to_value(), opts)
    }

    fn propagate(&self) -> Result<()> {
        propagate(self.link(), || self.to_value())
    }
}

impl fmt::Debug for ArrayView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayView")
            .field("pointer", &self.pointer().to_string())
            .field("elements", &self.node.borrow().elements)
            .finish()
    }
}

impl From<ArrayView> for EditValue {
    fn from(view: ArrayView) -> Self {
        EditValue::Tree(view.to_value())
    }
}

impl From<&ArrayView> for EditValue {
    fn from(view: &ArrayView) -> Self {
        EditValue::Tree(view.to_value())
    }
}
