//! Core domain types for the movie and user record files.
//!
//! This module defines the records produced by the loaders and the
//! `RecordStore` that owns them. Indices never hold records directly;
//! they hold `RecordId` handles into a store.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a movie as it appears in the movie file (e.g. "ID00123")
pub type MovieId = String;

/// Email address of a user; doubles as the user's identifier
pub type Email = String;

// =============================================================================
// Records
// =============================================================================

/// A movie block from the movie file.
///
/// Immutable once loaded. List fields keep the order they were written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Release year exactly as written in the file
    pub release_year: String,
    pub directors: Vec<String>,
    pub actors: Vec<String>,
    pub genres: Vec<String>,
    pub rating: f32,
}

/// A user block from the user file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub full_name: String,
    pub email: Email,
    /// Movie identifiers in the order they were watched
    pub watch_history: Vec<MovieId>,
}

// =============================================================================
// RecordStore
// =============================================================================

/// Handle to a record inside a [`RecordStore`].
///
/// Two handles are equal exactly when they name the same record, so the
/// handle doubles as record identity.
///
/// Rust concept: a newtype around `usize` is `Copy` and costs nothing at
/// runtime, yet the compiler will not let it be mixed up with a plain
/// index or with a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(usize);

impl RecordId {
    /// Position of the record in load order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns every record of one kind, in the order they were loaded.
///
/// Records are only ever appended; a handle returned by `push` stays valid
/// for the life of the store.
///
/// Rust concepts:
/// - The store owns each `T` by value; indices borrow nothing and hold handles
/// - `get` returns `Option<&T>`, so a handle from another store is a miss,
///   not a panic
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Vec<T>,
}

impl<T> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Handle the next pushed record will receive
    pub(crate) fn next_id(&self) -> RecordId {
        RecordId(self.records.len())
    }

    /// Take ownership of `record` and return its handle
    pub fn push(&mut self, record: T) -> RecordId {
        let id = RecordId(self.records.len());
        self.records.push(record);
        id
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with their handles, in load order
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &T)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (RecordId(index), record))
    }
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_stable_handles() {
        let mut store = RecordStore::new();
        let first = store.push("first".to_string());
        let second = store.push("second".to_string());

        assert_ne!(first, second);
        assert_eq!(store.get(first).map(String::as_str), Some("first"));
        assert_eq!(store.get(second).map(String::as_str), Some("second"));
        assert_eq!(second.index(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_iter_in_load_order() {
        let mut store = RecordStore::with_capacity(3);
        for name in ["a", "b", "c"] {
            store.push(name);
        }

        let collected: Vec<(usize, &str)> = store
            .iter()
            .map(|(id, name)| (id.index(), *name))
            .collect();
        assert_eq!(collected, vec![(0, "a"), (1, "b"), (2, "c")]);
    }

    #[test]
    fn test_foreign_handle_misses() {
        let mut big = RecordStore::new();
        big.push(1);
        let handle = big.push(2);

        let small: RecordStore<i32> = RecordStore::new();
        assert!(small.get(handle).is_none());
        assert!(small.is_empty());
    }
}
