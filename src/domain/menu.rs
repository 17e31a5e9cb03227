//! Menu Item Entity
//!
//! Navigation menu entries. The hierarchy is two levels deep: root items and
//! their direct children.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Maximum menu depth (root = 1)
pub const MAX_MENU_DEPTH: usize = 2;

/// A navigation menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier
    pub id: String,
    /// Parent item ID (None = root level)
    pub parent_id: Option<String>,
    /// Position within siblings (dense, 0-based)
    pub order: u32,
    /// Text shown in the navigation bar
    pub label: String,
    /// Link target
    pub url: Option<String>,
}

impl MenuItem {
    /// Create a new root item
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            order: 0,
            label: label.into(),
            url: None,
        }
    }

    /// Create a new child item under a parent
    pub fn new_child(id: impl Into<String>, label: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::new(id, label)
        }
    }

    /// Check if this is a root item (no parent)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Entity for MenuItem {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// A menu item with its children attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub item: MenuItem,
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn leaf(item: MenuItem) -> Self {
        Self { item, children: Vec::new() }
    }
}

/// Whole menu, root items in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTree {
    pub roots: Vec<MenuNode>,
}
