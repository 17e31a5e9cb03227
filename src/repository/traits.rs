//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{DomainError, DomainResult, Entity, LayoutItem, MenuItem, OrderUpdate};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities, sorted by order within each sibling set
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Per-record outcome of a persisted batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub applied: Vec<String>,
    pub failed: Vec<(String, DomainError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<String> {
        self.failed.iter().map(|(id, _)| id.clone()).collect()
    }
}

/// Applies order/placement updates
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Targeted field update of one record
    async fn apply_update(&self, update: &OrderUpdate) -> DomainResult<()>;

    /// Apply updates one at a time, in batch order. No retries.
    async fn apply_batch(&self, batch: &[OrderUpdate]) -> BatchReport {
        let mut report = BatchReport::default();
        for update in batch {
            match self.apply_update(update).await {
                Ok(()) => report.applied.push(update.id.clone()),
                Err(e) => {
                    log::warn!("Order update for {} failed: {}", update.id, e);
                    report.failed.push((update.id.clone(), e));
                }
            }
        }
        report
    }
}

/// Everything the layout editor needs from storage
pub trait LayoutStore: Repository<LayoutItem> + OrderStore {}

impl<T: Repository<LayoutItem> + OrderStore> LayoutStore for T {}

/// Everything the menu editor needs from storage
pub trait MenuStore: Repository<MenuItem> + OrderStore {}

impl<T: Repository<MenuItem> + OrderStore> MenuStore for T {}
