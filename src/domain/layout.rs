//! Layout Widget Entity
//!
//! A widget placed in one of the fixed page-layout columns.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::widget::WidgetSettings;

/// Page-layout column. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    #[default]
    Main,
    Right,
}

impl Column {
    /// All columns in display order
    pub const ALL: [Column; 3] = [Column::Left, Column::Main, Column::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Left => "left",
            Column::Main => "main",
            Column::Right => "right",
        }
    }

}

impl std::str::FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Column::Left),
            "main" => Ok(Column::Main),
            "right" => Ok(Column::Right),
            _ => Err(format!("unknown column '{}'", s)),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A widget in the page layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Unique identifier
    pub id: String,
    /// Column the widget lives in
    #[serde(rename = "group")]
    pub column: Column,
    /// Position within the column (dense, 0-based)
    pub order: u32,
    /// Heading shown above the widget
    pub title: String,
    /// Widget kind and its settings
    pub widget: WidgetSettings,
}

impl LayoutItem {
    pub fn new(id: impl Into<String>, column: Column, widget: WidgetSettings) -> Self {
        Self {
            id: id.into(),
            column,
            order: 0,
            title: String::new(),
            widget,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Entity for LayoutItem {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}
