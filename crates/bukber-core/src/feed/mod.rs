//! Live list reconciliation
//!
//! A [`Feed`] is the bounded, newest-first, de-duplicated list of entries
//! shown to guests. It is built once from a bulk snapshot
//! ([`Feed::initialize`]) and then advanced one realtime insert at a time
//! ([`Feed::apply_insert`]).
//!
//! # Ordering
//!
//! The snapshot is ordered by `created_at` descending. After that, arrival
//! order is trusted as recency: every newly observed entry goes to index 0
//! regardless of its own timestamp. Entries from the snapshot keep their
//! relative order until they are evicted from the tail.
//!
//! # Ownership
//!
//! Reconciliation consumes the current feed and returns the next one. The
//! holder replaces its value on each step, so the algorithm never needs a
//! lock; callers receiving inserts from more than one thread must funnel
//! them through a single writer (see [`crate::live::LiveFeed`]).

mod entry;
pub mod format;

pub use entry::{Attendance, Entry, EntryDetails, NewEntry};

use tracing::debug;

use crate::types::EntryId;

/// Number of entries kept when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded, ordered, de-duplicated list of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    entries: Vec<Entry>,
    capacity: usize,
}

impl Feed {
    /// An empty feed holding at most `capacity` entries
    pub fn empty(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Build the initial feed from a bulk snapshot.
    ///
    /// The snapshot is re-sorted by `created_at` descending (stable, so rows
    /// with equal timestamps keep the collaborator's order), later copies of
    /// an id are dropped, and the result is truncated to `capacity`.
    pub fn initialize(mut fetched: Vec<Entry>, capacity: usize) -> Self {
        fetched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut entries: Vec<Entry> = Vec::with_capacity(fetched.len().min(capacity));
        for entry in fetched {
            if entries.len() == capacity {
                break;
            }
            if entries.iter().any(|e| e.id == entry.id) {
                debug!(id = %entry.id, "Dropping duplicate row from snapshot");
                continue;
            }
            entries.push(entry);
        }

        Self { entries, capacity }
    }

    /// Reconcile one newly observed entry into the feed.
    ///
    /// Redelivery of an id already present is a no-op. Otherwise the entry
    /// becomes the head and the tail is evicted down to capacity.
    pub fn apply_insert(mut self, incoming: Entry) -> Self {
        if self.contains(&incoming.id) {
            debug!(id = %incoming.id, "Suppressing duplicate insert");
            return self;
        }

        self.entries.insert(0, incoming);
        if self.entries.len() > self.capacity {
            self.entries.truncate(self.capacity);
        }
        self
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Most recently observed entry
    pub fn head(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::empty(DEFAULT_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a Feed {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
