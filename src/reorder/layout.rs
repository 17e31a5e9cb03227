//! Layout Column Reconciliation
//!
//! Widgets live in fixed columns. A drag moves one widget from
//! `(source, source_index)` to `(dest, dest_index)`; both touched columns are
//! renumbered so orders stay dense.

use serde::{Deserialize, Serialize};

use crate::domain::{BatchPolicy, Column, LayoutItem, OrderUpdate};
use super::batch::compute_batch;
use super::group::{find_group, find_group_mut, Ordered, OrderedGroup};
use super::ReorderError;

/// A finished drag gesture between column slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMove {
    pub source: Column,
    pub source_index: usize,
    pub dest: Column,
    pub dest_index: usize,
}

/// In-memory page layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBoard {
    columns: Vec<OrderedGroup<Column, LayoutItem>>,
}

impl Default for LayoutBoard {
    fn default() -> Self {
        Self::new(&Column::ALL)
    }
}

impl LayoutBoard {
    /// Empty board with the given columns
    pub fn new(columns: &[Column]) -> Self {
        Self {
            columns: columns.iter().map(|c| OrderedGroup::new(*c)).collect(),
        }
    }

    /// Board with every column, each sorted by stored order
    pub fn from_items(items: Vec<LayoutItem>) -> Self {
        let mut board = Self::default();
        for item in items {
            if let Some(group) = find_group_mut(&mut board.columns, &item.column) {
                group.items.push(item);
            }
        }
        for group in &mut board.columns {
            group.sort_by_order();
        }
        board
    }

    pub fn column(&self, column: Column) -> Option<&OrderedGroup<Column, LayoutItem>> {
        find_group(&self.columns, &column)
    }

    pub fn columns(&self) -> &[OrderedGroup<Column, LayoutItem>] {
        &self.columns
    }

    pub fn items(&self) -> impl Iterator<Item = &LayoutItem> {
        self.columns.iter().flat_map(|group| group.items.iter())
    }

    pub fn find(&self, id: &str) -> Option<&LayoutItem> {
        self.items().find(|item| item.id == id)
    }

    /// Apply a drag. Invalid gestures return an empty batch; a column the
    /// board does not have is a structural fault.
    pub fn apply_move(
        &mut self,
        mv: LayoutMove,
        policy: BatchPolicy,
    ) -> Result<Vec<OrderUpdate>, ReorderError> {
        if mv.source == mv.dest && mv.source_index == mv.dest_index {
            return Ok(Vec::new());
        }

        let source_len = self.group(mv.source)?.len();
        self.group(mv.dest)?;

        if mv.source_index >= source_len {
            log::debug!(
                "Ignoring drag from {}[{}], column has {} widgets",
                mv.source,
                mv.source_index,
                source_len
            );
            return Ok(Vec::new());
        }

        // Past-the-end indices append, so dropping the last widget beyond its
        // own column's end is a no-op too
        if mv.source == mv.dest && mv.dest_index.min(source_len - 1) == mv.source_index {
            return Ok(Vec::new());
        }

        let touched = if mv.source == mv.dest {
            vec![mv.source]
        } else {
            vec![mv.source, mv.dest]
        };
        let before = self.records_in(&touched);

        let mut item = self.group_mut(mv.source)?.remove_at(mv.source_index);
        if mv.source != mv.dest {
            item.column = mv.dest;
        }

        let dest = self.group_mut(mv.dest)?;
        let index = mv.dest_index.min(dest.len());
        dest.insert_at(index, item);

        for column in &touched {
            self.group_mut(*column)?.renumber();
        }

        let batch = compute_batch(&before, self.records_in(&touched), policy);
        log::debug!(
            "Moved widget {}[{}] -> {}[{}], {} updates",
            mv.source,
            mv.source_index,
            mv.dest,
            index,
            batch.len()
        );
        Ok(batch)
    }

    /// Append a widget to the end of its column
    pub fn add_widget(&mut self, mut item: LayoutItem) -> Result<OrderUpdate, ReorderError> {
        if self.find(&item.id).is_some() {
            return Err(ReorderError::DuplicateId(item.id));
        }

        let group = self.group_mut(item.column)?;
        item.order = group.len() as u32;
        let record = item.record();
        group.insert_at(group.len(), item);
        Ok(record)
    }

    /// Remove a widget and close the gap it leaves. `None` if unknown.
    pub fn remove_widget(
        &mut self,
        id: &str,
        policy: BatchPolicy,
    ) -> Option<(LayoutItem, Vec<OrderUpdate>)> {
        let group = self
            .columns
            .iter_mut()
            .find(|group| group.position_of(id).is_some())?;
        let index = group.position_of(id)?;

        let removed = group.remove_at(index);
        let before = group.records();
        group.renumber();
        let batch = compute_batch(&before, group.records(), policy);
        Some((removed, batch))
    }

    fn group(&self, column: Column) -> Result<&OrderedGroup<Column, LayoutItem>, ReorderError> {
        find_group(&self.columns, &column)
            .ok_or_else(|| ReorderError::GroupNotFound(column.to_string()))
    }

    fn group_mut(
        &mut self,
        column: Column,
    ) -> Result<&mut OrderedGroup<Column, LayoutItem>, ReorderError> {
        find_group_mut(&mut self.columns, &column)
            .ok_or_else(|| ReorderError::GroupNotFound(column.to_string()))
    }

    fn records_in(&self, columns: &[Column]) -> Vec<OrderUpdate> {
        columns
            .iter()
            .filter_map(|column| find_group(&self.columns, column))
            .flat_map(|group| group.records())
            .collect()
    }
}
