//! Layout editor commands

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{BatchPolicy, DomainError, DomainResult, LayoutItem};
use crate::reorder::{LayoutBoard, LayoutMove};
use crate::repository::LayoutStore;
use super::{DragOutcome, Notice};

/// Owns the in-memory page layout and keeps it in step with storage
pub struct LayoutEditor<S> {
    store: Arc<S>,
    board: Mutex<LayoutBoard>,
    // Held while a batch is being written; drags arriving meanwhile are refused
    saving: Mutex<()>,
    policy: BatchPolicy,
}

impl<S: LayoutStore> LayoutEditor<S> {
    pub fn new(store: Arc<S>, policy: BatchPolicy) -> Self {
        Self {
            store,
            board: Mutex::new(LayoutBoard::default()),
            saving: Mutex::new(()),
            policy,
        }
    }

    /// Replace the in-memory board with what storage holds
    pub async fn reload(&self) -> DomainResult<()> {
        let items = self.store.list().await?;
        log::debug!("Reloaded {} layout widgets", items.len());
        *self.board.lock().await = LayoutBoard::from_items(items);
        Ok(())
    }

    pub async fn snapshot(&self) -> LayoutBoard {
        self.board.lock().await.clone()
    }

    /// Handle a finished drag between column slots
    pub async fn on_drag_end(&self, mv: LayoutMove) -> DomainResult<DragOutcome> {
        let Ok(_saving) = self.saving.try_lock() else {
            log::info!("Ignoring layout drag {:?}: previous save still running", mv);
            return Ok(DragOutcome::Busy);
        };

        let batch = self.board.lock().await.apply_move(mv, self.policy)?;
        if batch.is_empty() {
            return Ok(DragOutcome::Unchanged);
        }

        let report = self.store.apply_batch(&batch).await;
        self.reload().await?;
        Ok(DragOutcome::Persisted(Notice::from_report(&report, "Layout saved")))
    }

    /// Append a widget to the end of its column
    pub async fn add_widget(&self, mut item: LayoutItem) -> DomainResult<Notice> {
        let _saving = self.saving.lock().await;

        let record = self.board.lock().await.add_widget(item.clone())?;
        item.order = record.order;

        let notice = match self.store.create(&item).await {
            Ok(_) => Notice::success("Widget added"),
            Err(e) => {
                log::error!("Failed to add widget {}: {}", item.id, e);
                Notice::failure(vec![item.id.clone()])
            }
        };

        self.reload().await?;
        Ok(notice)
    }

    /// Delete a widget and close the gap in its column
    pub async fn remove_widget(&self, id: &str) -> DomainResult<Notice> {
        let _saving = self.saving.lock().await;

        let (removed, batch) = self
            .board
            .lock()
            .await
            .remove_widget(id, self.policy)
            .ok_or_else(|| DomainError::NotFound(format!("Widget {} not found", id)))?;

        if let Err(e) = self.store.delete(removed.id.clone()).await {
            log::error!("Failed to delete widget {}: {}", removed.id, e);
            self.reload().await?;
            return Ok(Notice::failure(vec![removed.id]));
        }

        let report = self.store.apply_batch(&batch).await;
        self.reload().await?;
        Ok(Notice::from_report(&report, "Widget removed"))
    }
}
