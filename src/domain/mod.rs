//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO I/O (serde for serialization only).

mod entity;
mod layout;
mod menu;
mod update;
mod widget;

pub use entity::{Entity, DomainError, DomainResult};
pub use layout::{Column, LayoutItem};
pub use menu::{MenuItem, MenuNode, MenuTree, MAX_MENU_DEPTH};
pub use update::{BatchPolicy, OrderUpdate, Placement};
pub use widget::{BoardListStyle, Slide, WidgetSettings};
