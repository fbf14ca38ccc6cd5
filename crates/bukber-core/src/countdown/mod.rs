//! Countdown engine
//!
//! Derives the time remaining until a fixed target instant. Every sample is
//! recomputed from the absolute difference `target - now`; nothing is ever
//! decremented between samples, so repeated sampling cannot drift.
//!
//! ```text
//! ┌──────────────┐   now()   ┌────────────────┐  watch   ┌──────────────┐
//! │ Clock        │ ────────▶ │ CountdownTicker│ ───────▶ │ presentation │
//! │ (System/     │           │  interval task │          │  (receiver)  │
//! │  Manual)     │           │  compute_...() │          └──────────────┘
//! └──────────────┘           └────────────────┘
//! ```
//!
//! The ticker is the only stateful piece and it is an owned handle: it stops
//! after publishing [`CountdownState::Expired`], on [`CountdownTicker::cancel`],
//! or when dropped.

mod clock;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ticker::{CountdownTicker, DEFAULT_TICK};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// Decomposition of a non-negative duration into display units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: u64,
    /// 0-23
    pub hours: u8,
    /// 0-59
    pub minutes: u8,
    /// 0-59
    pub seconds: u8,
}

impl TimeRemaining {
    /// The saturated zero value
    pub const ZERO: TimeRemaining = TimeRemaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decompose a millisecond difference. Negative input saturates to zero.
    pub fn from_millis(diff_ms: i64) -> Self {
        let diff_ms = diff_ms.max(0);
        Self {
            days: (diff_ms / MS_PER_DAY) as u64,
            hours: ((diff_ms / MS_PER_HOUR) % 24) as u8,
            minutes: ((diff_ms / MS_PER_MINUTE) % 60) as u8,
            seconds: ((diff_ms / MS_PER_SECOND) % 60) as u8,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Labelled units in display order, as shown under the hero title.
    pub fn units(&self) -> [(&'static str, u64); 4] {
        [
            ("Days", self.days),
            ("Hours", u64::from(self.hours)),
            ("Mins", u64::from(self.minutes)),
            ("Secs", u64::from(self.seconds)),
        ]
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Result of sampling a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownState {
    /// Target not reached yet
    Running(TimeRemaining),
    /// Target reached or passed; sampling should stop
    Expired,
}

impl CountdownState {
    pub fn is_expired(&self) -> bool {
        matches!(self, CountdownState::Expired)
    }

    /// Remaining time, `TimeRemaining::ZERO` once expired
    pub fn remaining(&self) -> TimeRemaining {
        match self {
            CountdownState::Running(remaining) => *remaining,
            CountdownState::Expired => TimeRemaining::ZERO,
        }
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownState::Running(remaining) => write!(f, "{}", remaining),
            CountdownState::Expired => write!(f, "Expired"),
        }
    }
}

/// Compute the remaining time from `now` until `target`.
///
/// Returns [`CountdownState::Expired`] when `target - now <= 0`.
pub fn compute_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> CountdownState {
    let diff_ms = (target - now).num_milliseconds();
    if diff_ms <= 0 {
        return CountdownState::Expired;
    }
    CountdownState::Running(TimeRemaining::from_millis(diff_ms))
}

/// A countdown towards a fixed target instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target: DateTime<Utc>,
}

impl Countdown {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    pub fn sample(&self, now: DateTime<Utc>) -> CountdownState {
        compute_remaining(self.target, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 23, h, m, s).unwrap()
    }

    #[test]
    fn test_thirty_seconds_left() {
        let state = compute_remaining(at(17, 0, 0), at(16, 59, 30));
        assert_eq!(
            state,
            CountdownState::Running(TimeRemaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 30
            })
        );
        assert!(!state.is_expired());
    }

    #[test]
    fn test_exact_target_is_expired() {
        let state = compute_remaining(at(17, 0, 0), at(17, 0, 0));
        assert!(state.is_expired());
        assert_eq!(state.remaining(), TimeRemaining::ZERO);
    }

    #[test]
    fn test_already_past_target_is_expired() {
        let state = compute_remaining(at(17, 0, 0), at(18, 0, 0));
        assert_eq!(state, CountdownState::Expired);
    }

    #[test]
    fn test_multi_day_decomposition() {
        let target = at(17, 0, 0);
        let now = target - (Duration::days(28) + Duration::hours(5) + Duration::minutes(7) + Duration::seconds(9));
        let remaining = compute_remaining(target, now).remaining();
        assert_eq!(remaining.days, 28);
        assert_eq!(remaining.hours, 5);
        assert_eq!(remaining.minutes, 7);
        assert_eq!(remaining.seconds, 9);
    }

    #[test]
    fn test_sub_second_remainder_floors() {
        let target = at(17, 0, 0);
        let now = target - Duration::milliseconds(1_999);
        assert_eq!(compute_remaining(target, now).remaining().seconds, 1);

        // Less than a second left still counts as running
        let now = target - Duration::milliseconds(250);
        let state = compute_remaining(target, now);
        assert!(!state.is_expired());
        assert!(state.remaining().is_zero());
    }

    #[test]
    fn test_from_millis_saturates_negative() {
        assert_eq!(TimeRemaining::from_millis(-5_000), TimeRemaining::ZERO);
    }

    #[test]
    fn test_display_pads_fields() {
        let remaining = TimeRemaining {
            days: 3,
            hours: 4,
            minutes: 5,
            seconds: 6,
        };
        assert_eq!(remaining.to_string(), "3d 04h 05m 06s");
        assert_eq!(CountdownState::Expired.to_string(), "Expired");
    }

    #[test]
    fn test_units_order() {
        let remaining = TimeRemaining::from_millis(MS_PER_DAY + MS_PER_HOUR * 2 + MS_PER_MINUTE * 3 + 4_000);
        let labels: Vec<_> = remaining.units().iter().map(|(l, v)| format!("{l}={v}")).collect();
        assert_eq!(labels, vec!["Days=1", "Hours=2", "Mins=3", "Secs=4"]);
    }

    #[test]
    fn test_countdown_samples_fixed_target() {
        let countdown = Countdown::new(at(17, 0, 0));
        assert_eq!(countdown.target(), at(17, 0, 0));
        assert_eq!(countdown.sample(at(16, 0, 0)).remaining().hours, 1);
        assert!(countdown.sample(at(17, 0, 1)).is_expired());
    }
}
