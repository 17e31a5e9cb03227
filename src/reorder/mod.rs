//! Reorder Core
//!
//! Pure reconciliation of layout columns and the two-level menu tree.
//! Nothing here touches storage; operations mutate the owned state in place
//! and return the update batch to persist.

mod batch;
mod group;
mod layout;
mod menu;
mod tree;

use thiserror::Error;

use crate::domain::DomainError;

pub use batch::compute_batch;
pub use group::{find_group, find_group_mut, Ordered, OrderedGroup};
pub use layout::{LayoutBoard, LayoutMove};
pub use tree::{depth_violations, find_by_id, find_in_list, flatten, rebuild};

/// Structural faults. Invalid drag gestures never produce these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("Group not found: {0}")]
    GroupNotFound(String),
    #[error("Parent not found: {0}")]
    ParentNotFound(String),
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Menu depth exceeded by item {0}")]
    DepthExceeded(String),
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
}

impl From<ReorderError> for DomainError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::GroupNotFound(_) => DomainError::Internal(err.to_string()),
            ReorderError::ParentNotFound(_) | ReorderError::ItemNotFound(_) => {
                DomainError::NotFound(err.to_string())
            }
            ReorderError::DepthExceeded(_) => DomainError::InvalidInput(err.to_string()),
            ReorderError::DuplicateId(_) => DomainError::Conflict(err.to_string()),
        }
    }
}
