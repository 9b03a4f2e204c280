//! Path edits recorded while routing.

use std::fmt;

use packet::PathEntry;

/// One edit applied to the path, in application order.
///
/// Indices refer to the path as it was when the edit was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum RoutingAction {
    /// A new entry was inserted at `index`.
    Insert { index: usize, entry: PathEntry },
    /// The entry at `index` was removed.
    Remove { index: usize, entry: PathEntry },
    /// The entry at `index` was replaced by a different address.
    Replace {
        index: usize,
        old: PathEntry,
        new: PathEntry,
    },
    /// The entry at `index` was marked used.
    Set { index: usize, entry: PathEntry },
    /// An alias hop count at `index` was decremented.
    Decrement {
        index: usize,
        old: PathEntry,
        new: PathEntry,
    },
    /// The entry at `from` was moved to `to`.
    Move {
        from: usize,
        to: usize,
        entry: PathEntry,
    },
}

impl RoutingAction {
    /// Path index the edit lands on.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Insert { index, .. }
            | Self::Remove { index, .. }
            | Self::Replace { index, .. }
            | Self::Set { index, .. }
            | Self::Decrement { index, .. } => *index,
            Self::Move { to, .. } => *to,
        }
    }
}

impl fmt::Display for RoutingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { index, entry } => write!(f, "insert {entry} at {index}"),
            Self::Remove { index, entry } => write!(f, "remove {entry} at {index}"),
            Self::Replace { index, old, new } => {
                write!(f, "replace {old} with {new} at {index}")
            }
            Self::Set { index, entry } => write!(f, "set {entry} at {index}"),
            Self::Decrement { index, old, new } => {
                write!(f, "decrement {old} to {new} at {index}")
            }
            Self::Move { from, to, entry } => write!(f, "move {entry} from {from} to {to}"),
        }
    }
}
