//! Update Batch Records
//!
//! Partial records handed to the persistence layer after a reorder.

use serde::{Deserialize, Serialize};
use super::layout::Column;

/// Where an item sits after an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Layout column
    Group(Column),
    /// Menu parent (None = root)
    ParentId(Option<String>),
}

/// Targeted field update: `{ id, order, group | parent_id }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: String,
    pub order: u32,
    #[serde(flatten)]
    pub placement: Placement,
}

impl OrderUpdate {
    pub fn in_column(id: impl Into<String>, order: u32, column: Column) -> Self {
        Self { id: id.into(), order, placement: Placement::Group(column) }
    }

    pub fn under_parent(id: impl Into<String>, order: u32, parent_id: Option<String>) -> Self {
        Self { id: id.into(), order, placement: Placement::ParentId(parent_id) }
    }
}

/// Which records a reorder reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Only items whose order or placement changed
    #[default]
    Minimal,
    /// Every item of every sibling set the operation touched
    TouchedGroups,
}
