//! In-process entry store with a broadcast insert stream

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::{EntryStore, InsertCallback, InsertStream, Subscription};
use crate::error::{BukberError, BukberResult};
use crate::feed::{Entry, NewEntry};
use crate::types::EntryId;

/// Default capacity for the insert broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Failures to inject into a [`MemoryStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreFaults {
    pub fail_fetch: bool,
    pub fail_subscribe: bool,
    pub fail_insert: bool,
}

#[derive(Debug)]
struct Inner {
    table: String,
    rows: Mutex<Vec<Entry>>,
    faults: Mutex<StoreFaults>,
    events: broadcast::Sender<Entry>,
}

/// An entry table held in memory.
///
/// Inserts are stamped with a ULID and the current time and broadcast to
/// every subscriber. Clones share the same table.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self::with_rows(table, Vec::new())
    }

    /// Create a table that already holds `rows`. No notifications are sent
    /// for them.
    pub fn with_rows(table: impl Into<String>, rows: Vec<Entry>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                table: table.into(),
                rows: Mutex::new(rows),
                faults: Mutex::new(StoreFaults::default()),
                events,
            }),
        }
    }

    /// Create a table from a JSON array of rows, such as a database export.
    ///
    /// Every row must decode with [`Entry::from_payload`]; the first one
    /// that does not is reported with its index.
    pub fn from_json_file(table: impl Into<String>, path: &Path) -> BukberResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let payloads: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

        let rows = payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| {
                Entry::from_payload(payload).map_err(|e| match e {
                    BukberError::MalformedEntry(reason) => {
                        BukberError::MalformedEntry(format!("row {}: {}", i, reason))
                    }
                    other => other,
                })
            })
            .collect::<BukberResult<Vec<_>>>()?;

        let table = table.into();
        debug!(%table, count = rows.len(), path = %path.display(), "Loaded rows from file");
        Ok(Self::with_rows(table, rows))
    }

    pub fn table(&self) -> &str {
        &self.inner.table
    }

    pub fn set_faults(&self, faults: StoreFaults) {
        *self.inner.faults.lock() = faults;
    }

    /// Stored rows in insertion order
    pub fn rows(&self) -> Vec<Entry> {
        self.inner.rows.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.rows.lock().is_empty()
    }

    /// Broadcast `entry` without storing it, as a realtime channel does when
    /// it redelivers a notification. Returns the number of subscribers
    /// reached.
    pub fn publish(&self, entry: Entry) -> usize {
        self.inner.events.send(entry).unwrap_or(0)
    }

    fn faults(&self) -> StoreFaults {
        *self.inner.faults.lock()
    }
}

impl EntryStore for MemoryStore {
    async fn fetch_recent(&self, limit: usize) -> BukberResult<Vec<Entry>> {
        if self.faults().fail_fetch {
            return Err(BukberError::FetchFailed(format!(
                "table {} is unavailable",
                self.inner.table
            )));
        }

        let mut rows = self.rows();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        debug!(table = %self.inner.table, count = rows.len(), limit, "Fetched recent entries");
        Ok(rows)
    }

    async fn insert(&self, draft: NewEntry) -> BukberResult<Entry> {
        if self.faults().fail_insert {
            return Err(BukberError::WriteFailed(format!(
                "table {} rejected the insert",
                self.inner.table
            )));
        }

        let entry = draft.into_entry(EntryId::generate(), Utc::now());
        self.inner.rows.lock().push(entry.clone());
        let receivers = self.inner.events.send(entry.clone()).unwrap_or(0);
        info!(table = %self.inner.table, id = %entry.id, receivers, "Inserted entry");
        Ok(entry)
    }
}

impl InsertStream for MemoryStore {
    fn subscribe_inserts(&self, on_insert: InsertCallback) -> BukberResult<Subscription> {
        if self.faults().fail_subscribe {
            return Err(BukberError::SubscribeFailed(format!(
                "realtime channel for {} refused the subscription",
                self.inner.table
            )));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| BukberError::SubscribeFailed(e.to_string()))?;

        // Register before spawning so no insert after this call is missed
        let mut events = self.inner.events.subscribe();
        let table = self.inner.table.clone();
        let task = runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(entry) => on_insert(entry),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%table, skipped, "Insert subscriber lagged, notifications dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!(%table, "Insert channel closed");
                        break;
                    }
                }
            }
        });

        info!(table = %self.inner.table, "Subscribed to inserts");
        Ok(Subscription::new(self.inner.table.clone(), task))
    }
}
