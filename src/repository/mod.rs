//! Repository Layer
//!
//! Data access abstractions and the SQLite persistence adapter.

mod traits;
mod db;
mod layout_repo;
mod menu_repo;

#[cfg(test)]
mod tests;

pub use traits::{BatchReport, LayoutStore, MenuStore, OrderStore, Repository};
pub use db::{init_db, DbState, SharedConnection};
pub use layout_repo::LayoutRepository;
pub use menu_repo::MenuRepository;
