//! Ordered Groups
//!
//! A named bucket of items whose `order` field mirrors their position.

use crate::domain::{LayoutItem, MenuItem, OrderUpdate, Placement};

/// An item that carries a sibling-scoped order
pub trait Ordered {
    fn key(&self) -> &str;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
    fn placement(&self) -> Placement;

    /// Persistable view of the item's position
    fn record(&self) -> OrderUpdate {
        OrderUpdate {
            id: self.key().to_string(),
            order: self.order(),
            placement: self.placement(),
        }
    }
}

impl Ordered for LayoutItem {
    fn key(&self) -> &str {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn placement(&self) -> Placement {
        Placement::Group(self.column)
    }
}

impl Ordered for MenuItem {
    fn key(&self) -> &str {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn placement(&self) -> Placement {
        Placement::ParentId(self.parent_id.clone())
    }
}

/// Ordered sequence of items identified by `id`
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedGroup<K, T> {
    pub id: K,
    pub items: Vec<T>,
}

impl<K, T: Ordered> OrderedGroup<K, T> {
    pub fn new(id: K) -> Self {
        Self { id, items: Vec::new() }
    }

    pub fn with_items(id: K, items: Vec<T>) -> Self {
        Self { id, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove and return the item at `index`.
    ///
    /// Panics if `index >= len`; callers validate gestures first.
    pub fn remove_at(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// Insert at `index`; `index == len` appends.
    ///
    /// Panics if `index > len`.
    pub fn insert_at(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
    }

    /// Reassign `order = position` for every item
    pub fn renumber(&mut self) {
        for (position, item) in self.items.iter_mut().enumerate() {
            item.set_order(position as u32);
        }
    }

    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key() == key)
    }

    /// Stable sort by stored order, for rows read back from storage
    pub fn sort_by_order(&mut self) {
        self.items.sort_by_key(|item| item.order());
    }

    pub fn keys(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.key()).collect()
    }

    /// True when orders are exactly 0..len in sequence
    pub fn is_dense(&self) -> bool {
        self.items
            .iter()
            .enumerate()
            .all(|(position, item)| item.order() == position as u32)
    }

    pub fn records(&self) -> Vec<OrderUpdate> {
        self.items.iter().map(Ordered::record).collect()
    }
}

pub fn find_group<'a, K: PartialEq, T>(
    groups: &'a [OrderedGroup<K, T>],
    id: &K,
) -> Option<&'a OrderedGroup<K, T>> {
    groups.iter().find(|group| &group.id == id)
}

pub fn find_group_mut<'a, K: PartialEq, T>(
    groups: &'a mut [OrderedGroup<K, T>],
    id: &K,
) -> Option<&'a mut OrderedGroup<K, T>> {
    groups.iter_mut().find(|group| &group.id == id)
}
