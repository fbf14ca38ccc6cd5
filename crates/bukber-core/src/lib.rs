//! Bukber Core Library
//!
//! Countdown and live guestbook engine for a Ramadan iftar invitation.
//!
//! ## Overview
//!
//! Two small, independent state machines sit behind the invitation page:
//!
//! - **Countdown**: drift-free days/hours/minutes/seconds remaining until the
//!   event starts, frozen at zero once it does ([`countdown`]).
//! - **Live feed**: one bulk snapshot of guestbook entries merged with a
//!   realtime insert stream into a bounded, newest-first, de-duplicated
//!   [`Feed`] ([`feed`], [`live`]).
//!
//! The database is an external collaborator reached through the traits in
//! [`store`]; [`MemoryStore`] is an in-process implementation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bukber_core::{LiveFeed, MemoryStore, SubmissionDesk, WishForm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new("wishes");
//!     let live = LiveFeed::open(&store, 20).await;
//!
//!     let mut desk = SubmissionDesk::new(WishForm::new("Aisyah", "Semoga berkah"));
//!     desk.submit(&store).await?;
//!
//!     let mut feed = live.watch();
//!     feed.changed().await?;
//!     for entry in feed.borrow().iter() {
//!         println!("{}: {}", entry.name, entry.message().unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod countdown;
pub mod error;
pub mod event;
pub mod feed;
pub mod live;
pub mod store;
pub mod submission;
pub mod types;

// Re-exports
pub use config::BukberConfig;
pub use countdown::{
    compute_remaining, Clock, Countdown, CountdownState, CountdownTicker, ManualClock,
    SystemClock, TimeRemaining,
};
pub use error::{BukberError, BukberResult};
pub use event::EventDetails;
pub use feed::{Attendance, Entry, EntryDetails, Feed, NewEntry};
pub use live::LiveFeed;
pub use store::{EntryStore, InsertCallback, InsertStream, MemoryStore, StoreFaults, Subscription};
pub use submission::{Form, RegistrationForm, RsvpForm, SubmissionDesk, WishForm};
pub use types::EntryId;
