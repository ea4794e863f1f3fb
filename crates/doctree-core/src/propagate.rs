//! Write-back of a mutated view into the views it was read from.
//!
//! Every view mutator first changes its own local copy, releases its borrow,
//! and then hands a snapshot of that copy to [`write_back`]. Writing into the
//! parent goes through the parent's own mutator, so the parent in turn writes
//! into its parent, until a view with no link is reached.
//!
//! The number of hops equals the number of navigation steps used to reach the
//! view from its root. A failing hop returns its error to the caller of the first mutator;
//! hops that already succeeded stay applied.

use serde_json::Value;

use crate::error::Result;
use crate::link::ParentLink;

/// Replace the child addressed by `link` in the parent view with `snapshot`,
/// continuing up the parent's own chain.
pub(crate) fn write_back(link: &ParentLink, snapshot: Value) -> Result<()> {
    match link {
        ParentLink::Object { parent, name } => {
            tracing::trace!(field = %name, "propagating write to object parent");
            parent.put(name.as_str(), snapshot)
        }
        ParentLink::Array { parent, index } => {
            tracing::trace!(index = *index, "propagating write to array parent");
            parent.set(*index, snapshot)
        }
    }
}

/// Write-back entry point shared by both view kinds: no link means the view
/// is a root and there is nothing to do.
pub(crate) fn propagate(link: Option<ParentLink>, snapshot: impl FnOnce() -> Value) -> Result<()> {
    match link {
        Some(link) => write_back(&link, snapshot()),
        None => Ok(()),
    }
}
