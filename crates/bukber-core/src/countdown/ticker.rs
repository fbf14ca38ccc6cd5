//! Owned, cancelable countdown sampling task

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::{Clock, Countdown, CountdownState};

/// Default sampling cadence
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// A running countdown.
///
/// Samples the countdown on a fixed cadence and publishes every change
/// through a watch channel. The background task stops after publishing
/// [`CountdownState::Expired`], when [`cancel`](Self::cancel) is called, or
/// when the ticker is dropped.
///
/// Must be created from within a tokio runtime.
///
/// # Example
///
/// ```ignore
/// let ticker = CountdownTicker::spawn(Countdown::new(target), SystemClock, DEFAULT_TICK);
/// let mut states = ticker.subscribe();
/// while states.changed().await.is_ok() {
///     println!("{}", *states.borrow());
/// }
/// ```
pub struct CountdownTicker {
    countdown: Countdown,
    state: watch::Receiver<CountdownState>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    pub fn spawn<C: Clock>(countdown: Countdown, clock: C, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let initial = countdown.sample(clock.now());
        let (tx, state) = watch::channel(initial);

        debug!(target_at = %countdown.target(), ?period, %initial, "Starting countdown ticker");
        let task = tokio::spawn(Self::run(countdown, clock, period, tx));

        Self {
            countdown,
            state,
            task,
        }
    }

    async fn run<C: Clock>(
        countdown: Countdown,
        clock: C,
        period: Duration,
        tx: watch::Sender<CountdownState>,
    ) {
        if tx.borrow().is_expired() {
            debug!("Countdown target already reached");
            return;
        }

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the initial sample covers it.
        interval.tick().await;

        loop {
            interval.tick().await;
            let sampled = countdown.sample(clock.now());
            tx.send_if_modified(|current| {
                if *current == sampled {
                    false
                } else {
                    *current = sampled;
                    true
                }
            });

            if sampled.is_expired() {
                info!(target_at = %countdown.target(), "Countdown reached target");
                break;
            }
        }
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Latest published state
    pub fn state(&self) -> CountdownState {
        *self.state.borrow()
    }

    /// Receiver notified on every published change
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.clone()
    }

    /// Whether the sampling task has stopped
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the countdown to expire.
    ///
    /// Returns `false` if the ticker stopped without expiring (cancelled).
    pub async fn wait_expired(&self) -> bool {
        let mut state = self.state.clone();
        let expired = state.wait_for(CountdownState::is_expired).await.is_ok();
        expired
    }

    /// Stop sampling
    pub fn cancel(self) {
        info!(target_at = %self.countdown.target(), "Cancelling countdown ticker");
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
