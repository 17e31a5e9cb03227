//! Menu editor commands

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{BatchPolicy, DomainError, DomainResult, MenuItem, MenuTree};
use crate::repository::MenuStore;
use super::{DragOutcome, Notice};

/// Owns the in-memory menu tree and keeps it in step with storage
pub struct MenuEditor<S> {
    store: Arc<S>,
    tree: Mutex<MenuTree>,
    saving: Mutex<()>,
    policy: BatchPolicy,
}

impl<S: MenuStore> MenuEditor<S> {
    pub fn new(store: Arc<S>, policy: BatchPolicy) -> Self {
        Self {
            store,
            tree: Mutex::new(MenuTree::default()),
            saving: Mutex::new(()),
            policy,
        }
    }

    pub async fn reload(&self) -> DomainResult<()> {
        let items = self.store.list().await?;
        log::debug!("Reloaded {} menu items", items.len());

        let (tree, repairs) = MenuTree::from_records_repaired(items);
        if !repairs.is_empty() {
            log::warn!("Writing back {} repaired menu records", repairs.len());
            let report = self.store.apply_batch(&repairs).await;
            if !report.is_success() {
                log::error!("Failed to repair menu items: {:?}", report.failed_ids());
            }
        }

        *self.tree.lock().await = tree;
        Ok(())
    }

    pub async fn snapshot(&self) -> MenuTree {
        self.tree.lock().await.clone()
    }

    /// Handle `dragged_id` dropped onto `target_id`
    pub async fn on_drag_end(&self, dragged_id: &str, target_id: &str) -> DomainResult<DragOutcome> {
        let Ok(_saving) = self.saving.try_lock() else {
            log::info!("Ignoring menu drag {} -> {}: previous save still running", dragged_id, target_id);
            return Ok(DragOutcome::Busy);
        };

        let batch = self.tree.lock().await.apply_move(dragged_id, target_id, self.policy);
        if batch.is_empty() {
            return Ok(DragOutcome::Unchanged);
        }

        let report = self.store.apply_batch(&batch).await;
        self.reload().await?;
        Ok(DragOutcome::Persisted(Notice::from_report(&report, "Menu order saved")))
    }

    /// Append a menu entry among its siblings
    pub async fn add_item(&self, mut item: MenuItem) -> DomainResult<Notice> {
        let _saving = self.saving.lock().await;

        let record = self.tree.lock().await.add_item(item.clone())?;
        item.order = record.order;

        let notice = match self.store.create(&item).await {
            Ok(_) => Notice::success("Menu item added"),
            Err(e) => {
                log::error!("Failed to add menu item {}: {}", item.id, e);
                Notice::failure(vec![item.id.clone()])
            }
        };

        self.reload().await?;
        Ok(notice)
    }

    /// Delete an entry and its children
    pub async fn remove_item(&self, id: &str) -> DomainResult<Notice> {
        let _saving = self.saving.lock().await;

        let (removed, batch) = self
            .tree
            .lock()
            .await
            .remove_item(id, self.policy)
            .ok_or_else(|| DomainError::NotFound(format!("Menu item {} not found", id)))?;
        log::debug!("Removing {} menu items under {}", removed.len(), id);

        if let Err(e) = self.store.delete(id.to_string()).await {
            log::error!("Failed to delete menu item {}: {}", id, e);
            self.reload().await?;
            return Ok(Notice::failure(vec![id.to_string()]));
        }

        let report = self.store.apply_batch(&batch).await;
        self.reload().await?;
        Ok(Notice::from_report(&report, "Menu item removed"))
    }

    /// Explicit parent change (None = move to root)
    pub async fn reparent(&self, id: &str, new_parent: Option<String>) -> DomainResult<Notice> {
        let _saving = self.saving.lock().await;

        let batch = self.tree.lock().await.reparent(id, new_parent, self.policy)?;
        if batch.is_empty() {
            return Ok(Notice::success("Menu unchanged"));
        }

        let report = self.store.apply_batch(&batch).await;
        self.reload().await?;
        Ok(Notice::from_report(&report, "Menu item moved"))
    }

    /// Edit label and link; order and parent are left alone
    pub async fn edit_item(&self, id: &str, label: String, url: Option<String>) -> DomainResult<Notice> {
        let _saving = self.saving.lock().await;

        let mut item = self
            .tree
            .lock()
            .await
            .find(id)
            .map(|node| node.item.clone())
            .ok_or_else(|| DomainError::NotFound(format!("Menu item {} not found", id)))?;
        item.label = label;
        item.url = url;

        let notice = match self.store.update(&item).await {
            Ok(_) => Notice::success("Menu item saved"),
            Err(e) => {
                log::error!("Failed to save menu item {}: {}", id, e);
                Notice::failure(vec![id.to_string()])
            }
        };

        self.reload().await?;
        Ok(notice)
    }
}
