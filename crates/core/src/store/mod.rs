//! In-memory record stores.
//!
//! Every store is an ordered sequence kept in insertion order. Lookups are
//! linear scans. Missing or duplicate entries never raise errors: `update`
//! and `delete` on an absent item leave the store untouched, and `create`
//! accepts duplicates.

/// Flight table and its route queries.
pub mod flights;
/// Reservation table and passenger projections.
pub mod reservations;

pub use flights::FlightStore;
pub use reservations::{ReservationStore, SeatLedger};

/// Ordered, unindexed collection with create/read/update/delete by value.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    items: Vec<T>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq> RecordStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn create(&mut self, item: T) {
        self.items.push(item);
    }

    /// All items in insertion order.
    pub fn read(&self) -> &[T] {
        &self.items
    }

    /// Mutable view over all items; edits are visible to every later read.
    pub fn read_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Replace the first item equal to `old` with `new`. No-op when absent.
    pub fn update(&mut self, old: &T, new: T) {
        if let Some(slot) = self.items.iter_mut().find(|item| *item == old) {
            *slot = new;
        }
    }

    /// Remove the first item equal to `item`. No-op when absent.
    pub fn delete(&mut self, item: &T) {
        if let Some(index) = self.items.iter().position(|candidate| candidate == item) {
            self.items.remove(index);
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for RecordStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_keeps_insertion_order_and_duplicates() {
        let mut store = RecordStore::new();
        store.create("b");
        store.create("a");
        store.create("b");
        assert_eq!(store.read(), &["b", "a", "b"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn update_replaces_first_match_only() {
        let mut store: RecordStore<i32> = [1, 2, 1].into_iter().collect();
        store.update(&1, 9);
        assert_eq!(store.read(), &[9, 2, 1]);
    }

    #[test]
    fn missing_items_are_silent_no_ops() {
        let mut store: RecordStore<i32> = [1, 2].into_iter().collect();
        store.update(&7, 8);
        store.delete(&7);
        assert_eq!(store.read(), &[1, 2]);
    }

    #[test]
    fn delete_removes_first_match_only() {
        let mut store: RecordStore<i32> = [4, 5, 4].into_iter().collect();
        store.delete(&4);
        assert_eq!(store.read(), &[5, 4]);
    }

    #[test]
    fn mutations_through_read_mut_are_visible() {
        let mut store: RecordStore<String> = ["warsaw".to_string()].into_iter().collect();
        store.read_mut()[0].make_ascii_uppercase();
        assert_eq!(store.read()[0], "WARSAW");
    }
}
