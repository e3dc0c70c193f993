use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable reference to a row inside one [`RowList`](super::RowList).
///
/// Handles are handed out by `add_row` and are never reused by the list that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(u64);

impl RowHandle {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// One description/cost pair as typed by the user.
///
/// Both fields are kept as text; `cost` may be empty or non-numeric while the
/// user is still editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCostRow {
    pub description: String,
    pub cost: String,
}

impl FixedCostRow {
    pub fn new(description: impl Into<String>, cost: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            cost: cost.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.description.is_empty() && self.cost.is_empty()
    }
}
