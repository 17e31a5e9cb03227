//! CMS Reorder Backend
//!
//! Layered architecture:
//! - domain: Layout widgets, menu items and order updates
//! - reorder: Pure reconciliation of drags into order-update batches
//! - repository: Data access abstractions and SQLite implementations
//! - commands: Editors the admin console drives
//! - settings: File-based configuration

use std::path::PathBuf;
use std::sync::Arc;

pub mod commands;
pub mod domain;
pub mod reorder;
pub mod repository;
pub mod settings;

use commands::{LayoutEditor, MenuEditor};
use repository::{init_db, DbState, LayoutRepository, MenuRepository};
use settings::AppConfig;

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub db_path: PathBuf,
    pub layout: LayoutEditor<LayoutRepository>,
    pub menu: MenuEditor<MenuRepository>,
    pub config: AppConfig,
}

impl AppState {
    /// Open the database and load both editors from it
    pub async fn open(config: AppConfig) -> Result<Self, String> {
        let db_path = config.db_path.clone();
        if let Some(dir) = db_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        }

        let db_state = init_db(&db_path).await?;
        let layout = LayoutEditor::new(
            Arc::new(LayoutRepository::new(db_state.shared())),
            config.batch_policy,
        );
        let menu = MenuEditor::new(
            Arc::new(MenuRepository::new(db_state.shared())),
            config.batch_policy,
        );

        layout.reload().await.map_err(|e| format!("Failed to load layout: {}", e))?;
        menu.reload().await.map_err(|e| format!("Failed to load menu: {}", e))?;
        log::info!("App state ready ({:?} batches)", config.batch_policy);

        Ok(Self {
            db_state,
            db_path,
            layout,
            menu,
            config,
        })
    }
}

/// Install the rolling file logger described by `config`
pub fn init_logging(config: &AppConfig) -> Result<(), String> {
    rolling_logger::init_logger_with(
        config.log_dir.clone(),
        &config.app_name,
        config.log_max_bytes,
        config.log_buffer_lines,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, LayoutItem, MenuItem, WidgetSettings};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("data").join("site.db"),
            ..AppConfig::default()
        };

        {
            let state = AppState::open(config.clone()).await.unwrap();
            assert!(state.db_state.is_ready().await);
            state
                .layout
                .add_widget(LayoutItem::new("news", Column::Main, WidgetSettings::default()))
                .await
                .unwrap();
            state.menu.add_item(MenuItem::new("about", "About")).await.unwrap();
        }

        let state = AppState::open(config).await.unwrap();
        let board = state.layout.snapshot().await;
        assert_eq!(board.find("news").map(|w| w.column), Some(Column::Main));
        assert!(state.menu.snapshot().await.find("about").is_some());
    }
}
