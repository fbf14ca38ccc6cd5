//! Live guestbook session
//!
//! [`LiveFeed`] wires the database collaborators to the reconciler for the
//! lifetime of one view:
//!
//! ```text
//!  InsertStream ──callback──▶ mpsc queue ──▶ worker task ──▶ watch<Feed>
//!                                              ▲  apply_insert()
//!  EntryStore::fetch_recent ──▶ Feed::initialize ┘
//! ```
//!
//! The subscription is opened before the snapshot is fetched, so an insert
//! racing the fetch is queued rather than lost. If the same entry shows up in
//! both, the reconciler's duplicate check drops the queued copy. The worker
//! is the only writer of the feed.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::BukberError;
use crate::feed::{Entry, Feed};
use crate::store::{EntryStore, InsertCallback, InsertStream, Subscription};

/// A feed kept current from a store's insert stream
#[derive(Debug)]
pub struct LiveFeed {
    feed: watch::Receiver<Feed>,
    fetch_error: Option<BukberError>,
    subscribe_error: Option<BukberError>,
    subscription: Option<Subscription>,
    worker: JoinHandle<()>,
}

impl LiveFeed {
    /// Open a live feed holding at most `capacity` entries.
    ///
    /// Never fails: a failed fetch degrades to an empty feed and a failed
    /// subscription leaves the feed at its snapshot. Both errors are kept and
    /// exposed through [`fetch_error`](Self::fetch_error) and
    /// [`subscribe_error`](Self::subscribe_error).
    ///
    /// Must be called from within a tokio runtime.
    pub async fn open<S>(store: &S, capacity: usize) -> Self
    where
        S: EntryStore + InsertStream,
    {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel::<Entry>();
        let on_insert: InsertCallback = Box::new(move |entry| {
            if queue_tx.send(entry).is_err() {
                debug!("Live feed closed, dropping insert");
            }
        });

        let (subscription, subscribe_error) = match store.subscribe_inserts(on_insert) {
            Ok(subscription) => (Some(subscription), None),
            Err(e) => {
                warn!(error = %e, "Live updates unavailable");
                (None, Some(e))
            }
        };

        let (fetched, fetch_error) = match store.fetch_recent(capacity).await {
            Ok(rows) => (rows, None),
            Err(e) => {
                warn!(error = %e, "Initial fetch failed, starting with an empty feed");
                (Vec::new(), Some(e))
            }
        };

        let initial = Feed::initialize(fetched, capacity);
        info!(
            entries = initial.len(),
            capacity,
            live = subscription.is_some(),
            "Opened live feed"
        );

        let (feed_tx, feed) = watch::channel(initial);
        let worker = tokio::spawn(Self::apply_inserts(queue_rx, feed_tx));

        Self {
            feed,
            fetch_error,
            subscribe_error,
            subscription,
            worker,
        }
    }

    async fn apply_inserts(mut queue: mpsc::UnboundedReceiver<Entry>, feed: watch::Sender<Feed>) {
        while let Some(entry) = queue.recv().await {
            feed.send_if_modified(|current| {
                if current.contains(&entry.id) {
                    debug!(id = %entry.id, "Suppressing redelivered entry");
                    return false;
                }
                *current = std::mem::take(current).apply_insert(entry);
                true
            });
        }
        debug!("Insert queue closed");
    }

    /// Current feed
    pub fn snapshot(&self) -> Feed {
        self.feed.borrow().clone()
    }

    /// Receiver notified whenever the feed changes
    pub fn watch(&self) -> watch::Receiver<Feed> {
        self.feed.clone()
    }

    /// Whether inserts are still being delivered
    pub fn is_live(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    pub fn fetch_error(&self) -> Option<&BukberError> {
        self.fetch_error.as_ref()
    }

    pub fn subscribe_error(&self) -> Option<&BukberError> {
        self.subscribe_error.as_ref()
    }

    /// Release the subscription and stop applying inserts
    pub fn close(mut self) {
        info!("Closing live feed");
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.subscription.take();
        self.worker.abort();
    }
}
