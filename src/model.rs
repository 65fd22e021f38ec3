use std::borrow::Cow;
use std::hash::Hash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of label slots available per [`TagKind`].
pub const TAG_SLOTS: u8 = 10;

/// Tag flavour; selects the chip color scheme.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Informational label (tags, branch names).
    Info,
    /// Alert label (bug ids, conflicts).
    Alert,
}

impl TagKind {
    /// Kinds in collection order.
    pub const ALL: [Self; 2] = [Self::Info, Self::Alert];
}

/// Field selector for [`TreeModel::data`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TreeRole {
    /// Plain text shown in the row.
    #[default]
    Display,
    /// Application-defined field the filter can compare against.
    Filter(u16),
    /// Auxiliary label slot, `slot < TAG_SLOTS`.
    Label { kind: TagKind, slot: u8 },
}

/// Read-only tree contract consumed by the filter and the tag painter.
///
/// A proper tree is expected (not a DAG):
/// - no cycles (recursive traversal is used directly);
/// - each node has exactly one parent;
/// - `row_key` is stable between frames and unique across the tree.
///
/// Colliding keys are not detected by the filter; two rows sharing a key share one
/// cached verdict. See [`check_unique_keys`](crate::check_unique_keys).
pub trait TreeModel {
    /// Structural node handle.
    type Id: Copy + Eq + Hash;
    /// Stable row identity used as the filter cache key.
    type Key: Clone + Eq + Hash;

    /// Returns the root node (or `None` if the tree is empty).
    fn root(&self) -> Option<Self::Id>;
    /// Returns the node's children in a deterministic order.
    fn children(&self, id: Self::Id) -> &[Self::Id];
    /// Returns `true` if the node exists in the model.
    fn contains(&self, id: Self::Id) -> bool;
    /// Returns the stable identity of a row.
    fn row_key(&self, id: Self::Id) -> Self::Key;
    /// Reads a field; `None` means the field is not set.
    fn data(&self, id: Self::Id, role: TreeRole) -> Option<Cow<'_, str>>;
    /// Returns an approximate size hint (not required to be exact).
    fn size_hint(&self) -> usize {
        0
    }
}
