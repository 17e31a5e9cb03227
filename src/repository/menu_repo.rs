//! Menu Item Repository
//!
//! SQLite-backed implementation of Repository<MenuItem> and OrderStore.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use crate::domain::{DomainError, DomainResult, MenuItem, OrderUpdate, Placement};
use super::db::{ready, write_error, SharedConnection};
use super::traits::{OrderStore, Repository};

const SELECT_MENU: &str = "SELECT id, parent_id, position, label, url FROM menu_items";

/// SQLite implementation of the menu repository
pub struct MenuRepository {
    conn: SharedConnection,
}

impl MenuRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        order: row.get(2)?,
        label: row.get(3)?,
        url: row.get(4)?,
    })
}

#[async_trait]
impl Repository<MenuItem> for MenuRepository {
    async fn create(&self, entity: &MenuItem) -> DomainResult<MenuItem> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        conn.execute(
            "INSERT INTO menu_items (id, parent_id, position, label, url, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entity.id,
                entity.parent_id,
                entity.order,
                entity.label,
                entity.url,
                chrono::Utc::now().timestamp_millis(),
            ],
        )
        .map_err(write_error)?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<MenuItem>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        conn.query_row(&format!("{} WHERE id = ?1", SELECT_MENU), params![id], row_to_item)
            .optional()
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn list(&self) -> DomainResult<Vec<MenuItem>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let mut stmt = conn
            .prepare(&format!(
                "{} ORDER BY parent_id NULLS FIRST, position ASC, id",
                SELECT_MENU
            ))
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let items = stmt
            .query_map([], row_to_item)
            .map_err(|e| DomainError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(items)
    }

    async fn update(&self, entity: &MenuItem) -> DomainResult<MenuItem> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let changed = conn
            .execute(
                "UPDATE menu_items
                 SET parent_id = ?1, position = ?2, label = ?3, url = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    entity.parent_id,
                    entity.order,
                    entity.label,
                    entity.url,
                    chrono::Utc::now().timestamp_millis(),
                    entity.id,
                ],
            )
            .map_err(write_error)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Menu item {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        // Manual cascade: children first
        conn.execute("DELETE FROM menu_items WHERE parent_id = ?1", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let changed = conn
            .execute("DELETE FROM menu_items WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Menu item {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MenuRepository {
    async fn apply_update(&self, update: &OrderUpdate) -> DomainResult<()> {
        let Placement::ParentId(parent_id) = &update.placement else {
            return Err(DomainError::InvalidInput(format!(
                "Menu update for {} has no parent reference",
                update.id
            )));
        };

        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let changed = conn
            .execute(
                "UPDATE menu_items SET parent_id = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    parent_id,
                    update.order,
                    chrono::Utc::now().timestamp_millis(),
                    update.id,
                ],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Menu item {} not found", update.id)));
        }
        Ok(())
    }
}
