//! Layout Widget Repository
//!
//! SQLite-backed implementation of Repository<LayoutItem> and OrderStore.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use crate::domain::{Column, DomainError, DomainResult, LayoutItem, OrderUpdate, Placement};
use super::db::{ready, write_error, SharedConnection};
use super::traits::{OrderStore, Repository};

const SELECT_WIDGETS: &str =
    "SELECT id, column_name, position, title, settings FROM layout_widgets";

/// SQLite implementation of the layout widget repository
pub struct LayoutRepository {
    conn: SharedConnection,
}

impl LayoutRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<LayoutItem> for LayoutRepository {
    async fn create(&self, entity: &LayoutItem) -> DomainResult<LayoutItem> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let settings = serde_json::to_string(&entity.widget)
            .map_err(|e| DomainError::InvalidInput(e.to_string()))?;

        conn.execute(
            "INSERT INTO layout_widgets (id, column_name, position, title, widget_type, settings, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entity.id,
                entity.column.as_str(),
                entity.order,
                entity.title,
                entity.widget.kind(),
                settings,
                chrono::Utc::now().timestamp_millis(),
            ],
        )
        .map_err(write_error)?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<LayoutItem>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let raw = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_WIDGETS),
                params![id],
                RawWidget::from_row,
            )
            .optional()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        raw.map(RawWidget::into_item).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<LayoutItem>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let mut stmt = conn
            .prepare(&format!("{} ORDER BY column_name, position, id", SELECT_WIDGETS))
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let rows = stmt
            .query_map([], RawWidget::from_row)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut items = Vec::new();
        for raw in rows {
            let raw = raw.map_err(|e| DomainError::Internal(e.to_string()))?;
            items.push(raw.into_item()?);
        }
        Ok(items)
    }

    async fn update(&self, entity: &LayoutItem) -> DomainResult<LayoutItem> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let settings = serde_json::to_string(&entity.widget)
            .map_err(|e| DomainError::InvalidInput(e.to_string()))?;

        let changed = conn
            .execute(
                "UPDATE layout_widgets
                 SET column_name = ?1, position = ?2, title = ?3, widget_type = ?4, settings = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    entity.column.as_str(),
                    entity.order,
                    entity.title,
                    entity.widget.kind(),
                    settings,
                    chrono::Utc::now().timestamp_millis(),
                    entity.id,
                ],
            )
            .map_err(write_error)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Widget {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let changed = conn
            .execute("DELETE FROM layout_widgets WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Widget {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for LayoutRepository {
    async fn apply_update(&self, update: &OrderUpdate) -> DomainResult<()> {
        let Placement::Group(column) = &update.placement else {
            return Err(DomainError::InvalidInput(format!(
                "Layout update for {} has no column",
                update.id
            )));
        };

        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let changed = conn
            .execute(
                "UPDATE layout_widgets SET column_name = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    column.as_str(),
                    update.order,
                    chrono::Utc::now().timestamp_millis(),
                    update.id,
                ],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Widget {} not found", update.id)));
        }
        Ok(())
    }
}

/// Row as stored, before column and settings are parsed
struct RawWidget {
    id: String,
    column: String,
    order: u32,
    title: String,
    settings: String,
}

impl RawWidget {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            column: row.get(1)?,
            order: row.get(2)?,
            title: row.get(3)?,
            settings: row.get(4)?,
        })
    }

    fn into_item(self) -> DomainResult<LayoutItem> {
        let column: Column = self
            .column
            .parse::<Column>()
            .map_err(|e| DomainError::Internal(format!("Widget {}: {}", self.id, e)))?;
        let widget = serde_json::from_str(&self.settings).map_err(|e| {
            DomainError::Internal(format!("Widget {} has invalid settings: {}", self.id, e))
        })?;

        Ok(LayoutItem {
            id: self.id,
            column,
            order: self.order,
            title: self.title,
            widget,
        })
    }
}
