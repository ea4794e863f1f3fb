//! Parent links: how a view was reached from the view it was read from.
//!
//! A link is read by two consumers only: propagation, which routes writes
//! back to the parent, and pointer computation, which walks the chain of
//! links to the root.

use std::fmt;

use crate::error::{Result, TreeError};
use crate::view::{ArrayView, ObjectView};

/// The view a node was read from, plus the field name or index used.
///
/// The parent view is a shared handle, so holding a link keeps the whole
/// ancestor chain of views alive. Parents never point back down to the
/// children read from them.
#[derive(Clone)]
pub enum ParentLink {
    Object { parent: ObjectView, name: String },
    Array { parent: ArrayView, index: usize },
}

impl ParentLink {
    /// Build a link from separately supplied object and array halves.
    ///
    /// At most one half may be present; supplying both is an
    /// [`TreeError::InvariantViolation`].
    pub fn from_parts(
        object: Option<(ObjectView, String)>,
        array: Option<(ArrayView, usize)>,
    ) -> Result<Option<ParentLink>> {
        match (object, array) {
            (Some(_), Some(_)) => Err(TreeError::InvariantViolation(
                "a node cannot have both an object parent and an array parent".to_string(),
            )),
            (Some((parent, name)), None) => Ok(Some(ParentLink::Object { parent, name })),
            (None, Some((parent, index))) => Ok(Some(ParentLink::Array { parent, index })),
            (None, None) => Ok(None),
        }
    }

    /// Unescaped path segment this link contributes.
    pub fn segment(&self) -> String {
        match self {
            ParentLink::Object { name, .. } => name.clone(),
            ParentLink::Array { index, .. } => index.to_string(),
        }
    }

    /// The parent's own link, if the parent is not a root.
    pub fn parent_link(&self) -> Option<ParentLink> {
        match self {
            ParentLink::Object { parent, .. } => parent.link(),
            ParentLink::Array { parent, .. } => parent.link(),
        }
    }

    /// True when both links route into the very same parent view.
    pub fn same_parent(&self, other: &ParentLink) -> bool {
        match (self, other) {
            (ParentLink::Object { parent: a, .. }, ParentLink::Object { parent: b, .. }) => {
                a.ptr_eq(b)
            }
            (ParentLink::Array { parent: a, .. }, ParentLink::Array { parent: b, .. }) => {
                a.ptr_eq(b)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ParentLink {
    // The parent is summarised by its pointer; printing it in full would
    // dump the whole ancestor chain.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentLink::Object { parent, name } => f
                .debug_struct("Object")
                .field("parent", &parent.pointer().to_string())
                .field("name", name)
                .finish(),
            ParentLink::Array { parent, index } => f
                .debug_struct("Array")
                .field("parent", &parent.pointer().to_string())
                .field("index", index)
                .finish(),
        }
    }
}
