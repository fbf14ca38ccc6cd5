//! Event details shown on the invitation

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::Countdown;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

const HARI: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];

const BULAN: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// When and where the gathering takes place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(default = "default_title")]
    pub title: String,
    /// Start time in the venue's local offset
    #[serde(default = "default_starts_at")]
    pub starts_at: DateTime<FixedOffset>,
    #[serde(default = "default_venue")]
    pub venue: String,
    #[serde(default = "default_address")]
    pub address: Option<String>,
    #[serde(default = "default_dress_code")]
    pub dress_code: Option<String>,
}

impl Default for EventDetails {
    fn default() -> Self {
        Self {
            title: default_title(),
            starts_at: default_starts_at(),
            venue: default_venue(),
            address: default_address(),
            dress_code: default_dress_code(),
        }
    }
}

impl EventDetails {
    /// Countdown towards the start of the event
    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.starts_at.with_timezone(&Utc))
    }

    /// Map search link for the venue.
    ///
    /// Punctuation is dropped and words are joined with `+`, so
    /// `Umatis Resto, BSD City` searches for `Umatis+Resto+BSD+City`.
    pub fn maps_url(&self) -> String {
        let query: Vec<String> = self
            .venue
            .split_whitespace()
            .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
            .filter(|word| !word.is_empty())
            .map(|word| encode_query_word(&word))
            .collect();
        format!("{}{}", MAPS_SEARCH_URL, query.join("+"))
    }

    /// e.g. `Senin, 23 Februari 2026`
    pub fn date_label(&self) -> String {
        let day = HARI[self.starts_at.weekday().num_days_from_monday() as usize];
        let month = BULAN[self.starts_at.month0() as usize];
        format!(
            "{}, {} {} {}",
            day,
            self.starts_at.day(),
            month,
            self.starts_at.year()
        )
    }

    /// e.g. `Senin, 23 Februari 2026 17:00 WIB`
    pub fn schedule_label(&self) -> String {
        let time = self.starts_at.format("%H:%M");
        match zone_label(self.starts_at.offset()) {
            Some(zone) => format!("{} {} {}", self.date_label(), time, zone),
            None => format!("{} {} (UTC{})", self.date_label(), time, self.starts_at.format("%:z")),
        }
    }
}

/// Indonesian time zone abbreviation for an offset
fn zone_label(offset: &FixedOffset) -> Option<&'static str> {
    match offset.local_minus_utc() {
        25_200 => Some("WIB"),
        28_800 => Some("WITA"),
        32_400 => Some("WIT"),
        _ => None,
    }
}

fn encode_query_word(word: &str) -> String {
    let mut encoded = String::with_capacity(word.len());
    for byte in word.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn default_title() -> String {
    "Buka Puasa Bersama".to_string()
}

fn default_venue() -> String {
    "Umatis Resto, BSD City".to_string()
}

fn default_address() -> Option<String> {
    Some("Kavling Taman Kota Barat Lot No.II.6".to_string())
}

fn default_dress_code() -> Option<String> {
    Some("Baju Muslim (Koko/Gamis)".to_string())
}

/// 23 February 2026, 17:00 WIB (UTC+7)
fn default_starts_at() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(7 * 3600)
        .and_then(|wib| wib.with_ymd_and_hms(2026, 2, 23, 17, 0, 0).single())
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_event() {
        let event = EventDetails::default();
        assert_eq!(event.title, "Buka Puasa Bersama");
        assert_eq!(event.starts_at.to_rfc3339(), "2026-02-23T17:00:00+07:00");
        assert_eq!(
            event.countdown().target(),
            Utc.with_ymd_and_hms(2026, 2, 23, 10, 0, 0).unwrap()
        );
        assert_eq!(event.dress_code.as_deref(), Some("Baju Muslim (Koko/Gamis)"));
        assert_eq!(
            event.address.as_deref(),
            Some("Kavling Taman Kota Barat Lot No.II.6")
        );
    }

    #[test]
    fn test_maps_url_drops_punctuation() {
        let event = EventDetails::default();
        assert_eq!(
            event.maps_url(),
            "https://www.google.com/maps/search/?api=1&query=Umatis+Resto+BSD+City"
        );
    }

    #[test]
    fn test_maps_url_encodes_non_ascii() {
        let event = EventDetails {
            venue: "Café  Kota - Tua".to_string(),
            ..EventDetails::default()
        };
        assert_eq!(
            event.maps_url(),
            "https://www.google.com/maps/search/?api=1&query=Caf%C3%A9+Kota+Tua"
        );
    }

    #[test]
    fn test_schedule_label() {
        let event = EventDetails::default();
        assert_eq!(event.date_label(), "Senin, 23 Februari 2026");
        assert_eq!(event.schedule_label(), "Senin, 23 Februari 2026 17:00 WIB");
    }

    #[test]
    fn test_schedule_label_other_offset() {
        let event = EventDetails {
            starts_at: "2026-03-01T18:30:00+01:00".parse().unwrap(),
            ..EventDetails::default()
        };
        assert_eq!(event.schedule_label(), "Minggu, 1 Maret 2026 18:30 (UTC+01:00)");
    }
}
