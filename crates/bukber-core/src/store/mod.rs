//! Database collaborator interfaces
//!
//! The guestbook never talks to a database directly. It depends on three
//! capabilities, split across two traits:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  EntryStore                                                      │
//! │  ├── fetch_recent(limit)  -> newest-first snapshot               │
//! │  └── insert(NewEntry)     -> stored Entry (id + created_at set)  │
//! │                                                                  │
//! │  InsertStream                                                    │
//! │  └── subscribe_inserts(callback) -> Subscription                 │
//! │      └── one typed callback per insert, delivered sequentially   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`MemoryStore`] implements both in-process and backs the CLI session
//! and the tests.

mod memory;

pub use memory::{MemoryStore, StoreFaults};

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::info;

use crate::error::BukberResult;
use crate::feed::{Entry, NewEntry};

/// Callback invoked once per inserted entry
pub type InsertCallback = Box<dyn Fn(Entry) + Send + Sync + 'static>;

/// Bulk fetch and write access to an entry table
pub trait EntryStore: Send + Sync {
    /// Fetch at most `limit` entries, newest first
    fn fetch_recent(&self, limit: usize) -> impl Future<Output = BukberResult<Vec<Entry>>> + Send;

    /// Store a validated submission; the store assigns id and `created_at`
    fn insert(&self, draft: NewEntry) -> impl Future<Output = BukberResult<Entry>> + Send;
}

/// Realtime insert notifications for an entry table
pub trait InsertStream: Send + Sync {
    /// Register `on_insert` for every subsequent insert.
    ///
    /// Notifications are delivered one at a time, in the order the store
    /// emits them, until the returned [`Subscription`] is released.
    fn subscribe_inserts(&self, on_insert: InsertCallback) -> BukberResult<Subscription>;
}

/// Handle to an active insert subscription.
///
/// Dropping the handle releases the subscription.
#[derive(Debug)]
pub struct Subscription {
    table: String,
    task: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn new(table: impl Into<String>, task: JoinHandle<()>) -> Self {
        Self {
            table: table.into(),
            task,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether notifications are still being delivered
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Release the subscription
    pub fn unsubscribe(self) {
        info!(table = %self.table, "Releasing insert subscription");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
