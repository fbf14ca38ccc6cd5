//! Display helpers for feed entries

use chrono::{DateTime, FixedOffset, Utc};

/// Avatar letter for a guest: uppercased first character, `'?'` when blank.
pub fn avatar_initial(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

/// Wall-clock `HH:MM` label in the event's UTC offset
pub fn clock_label(created_at: DateTime<Utc>, offset: FixedOffset) -> String {
    created_at.with_timezone(&offset).format("%H:%M").to_string()
}

/// Coarse relative age in the invitation's language: "Baru saja",
/// "5 menit lalu", "2 jam lalu", "Kemarin", "3 hari lalu".
///
/// Entries stamped in the future (clock skew between clients) read as
/// "Baru saja".
pub fn relative_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_secs = (now - created_at).num_seconds();

    if diff_secs < 60 {
        "Baru saja".to_string()
    } else if diff_secs < 3600 {
        format!("{} menit lalu", diff_secs / 60)
    } else if diff_secs < 86400 {
        format!("{} jam lalu", diff_secs / 3600)
    } else if diff_secs < 172800 {
        "Kemarin".to_string()
    } else {
        format!("{} hari lalu", diff_secs / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_avatar_initial() {
        assert_eq!(avatar_initial("aisyah"), 'A');
        assert_eq!(avatar_initial("  budi"), 'B');
        assert_eq!(avatar_initial("   "), '?');
        assert_eq!(avatar_initial(""), '?');
    }

    #[test]
    fn test_clock_label_uses_event_offset() {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let created_at = Utc.with_ymd_and_hms(2026, 3, 23, 10, 5, 0).unwrap();
        assert_eq!(clock_label(created_at, wib), "17:05");
    }

    #[test]
    fn test_relative_label_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 3, 23, 12, 0, 0).unwrap();
        assert_eq!(relative_label(now - Duration::seconds(10), now), "Baru saja");
        assert_eq!(relative_label(now + Duration::seconds(30), now), "Baru saja");
        assert_eq!(relative_label(now - Duration::minutes(5), now), "5 menit lalu");
        assert_eq!(relative_label(now - Duration::hours(2), now), "2 jam lalu");
        assert_eq!(relative_label(now - Duration::hours(30), now), "Kemarin");
        assert_eq!(relative_label(now - Duration::days(3), now), "3 hari lalu");
    }
}
