//! # doctree-core
//!
//! An addressable JSON document tree with write-back views and JSON Pointer
//! editing, used to read and edit a script project's `project.json`
//! descriptor before it is packaged.
//!
//! Navigating into a field or element gives a *detached view*: a private copy
//! of that subtree that remembers how it was reached. Mutating a view updates
//! the copy and writes it back up the chain of views to the root. Every view
//! can report its own JSON Pointer, and [`pointer::modify_by_pointer`] edits a
//! plain tree by pointer without going through views.
//!
//! ## Quick start
//!
//! ```rust
//! use doctree_core::{ObjectView, SerializeOptions};
//!
//! let root = ObjectView::parse(r#"{"a":{"list":[{"n":1}]}}"#).unwrap();
//! let item = root.get_object("a").unwrap().get_array("list").unwrap().get_object(0).unwrap();
//! item.put("n", 2).unwrap();
//!
//! assert_eq!(item.pointer().to_string(), "/a/list/0");
//! assert_eq!(
//!     root.to_json_string(&SerializeOptions::compact()).unwrap(),
//!     r#"{"a":{"list":[{"n":2}]}}"#
//! );
//! ```
//!
//! ## Building trees
//!
//! New documents are written with `serde_json::json!` and wrapped in a root
//! view; typed structures go through [`ObjectView::from_serialize`].
//!
//! ```rust
//! use doctree_core::{ArrayView, ObjectView};
//! use serde_json::json;
//!
//! let config = ObjectView::from_value(json!({"name": "demo", "tags": ["a"]})).unwrap();
//! let tags = ArrayView::from_value(json!(["b", {"k": 1}])).unwrap();
//! config.put("more", &tags).unwrap();
//! assert_eq!(config.get("more"), Some(json!(["b", {"k": 1}])));
//! ```
//!
//! ## Modules
//!
//! - [`value`]: parse / serialize the tree, per-call [`SerializeOptions`]
//! - [`types`]: [`Kind`] tags and the [`EditValue`] written by mutations
//! - [`view`]: [`ObjectView`] / [`ArrayView`]
//! - [`link`]: [`ParentLink`], how a view was reached
//! - [`pointer`]: pointer paths, resolution, and pointer-addressed edits
//! - [`descriptor`]: the `project.json` schema on top of the tree
//! - [`error`]: error types

pub mod descriptor;
pub mod error;
pub mod link;
pub mod pointer;
mod propagate;
pub mod types;
pub mod value;
pub mod view;

pub use descriptor::{DescriptorOverrides, LaunchConfig, NativeLib, Permission, ProjectDescriptor};
pub use error::TreeError;
pub use link::ParentLink;
pub use pointer::{get_by_pointer, modify_by_pointer, modify_json_by_pointer, JsonPointer};
pub use types::{coerce_text, EditValue, Kind};
pub use value::{parse, serialize, SerializeOptions};
pub use view::{ArrayView, ObjectView};
