//! Guestbook entry types
//!
//! An [`Entry`] generalizes the three record kinds the invitation collects:
//! guestbook wishes, RSVPs with a guest count, and attendance registrations
//! carrying a numeric national id (NIK).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BukberError, BukberResult};
use crate::types::EntryId;

/// Whether an RSVP guest will attend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attendance {
    #[serde(rename = "Hadir")]
    Attending,
    #[serde(rename = "Tidak Hadir")]
    NotAttending,
}

impl Default for Attendance {
    fn default() -> Self {
        Attendance::Attending
    }
}

impl std::fmt::Display for Attendance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attendance::Attending => write!(f, "Hadir"),
            Attendance::NotAttending => write!(f, "Tidak Hadir"),
        }
    }
}

/// Variant-specific fields of an entry.
///
/// Rows carry no type tag; the variant is inferred from the fields present.
/// Variants are tried in declaration order, so the ones with more required
/// fields come first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDetails {
    /// An RSVP with party size (`rsvps` table)
    Rsvp { guests: u32, status: Attendance },
    /// An attendance registration keyed by national id (`rsvp` table)
    Registration { nik: String, attendance: bool },
    /// A guestbook wish ("Doa & Ucapan", `wishes` table)
    Wish { message: String },
}

/// A guestbook record as delivered by the database.
///
/// Identity is the `id` alone; two entries with the same id are the same
/// logical record even if other fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl Entry {
    /// Decode an entry from an untyped payload (bulk fetch row or realtime
    /// notification body).
    ///
    /// Rows without a usable `id` are rejected here so they never reach the
    /// reconciler. Numeric ids are accepted and kept as their decimal form.
    pub fn from_payload(mut payload: serde_json::Value) -> BukberResult<Self> {
        let object = payload
            .as_object_mut()
            .ok_or_else(|| BukberError::MalformedEntry("payload is not an object".to_string()))?;

        let id = match object.get("id") {
            Some(serde_json::Value::String(s)) => EntryId::parse(s)?,
            Some(serde_json::Value::Number(n)) => match n.as_u64() {
                Some(serial) => EntryId::from(serial),
                None => return Err(BukberError::MalformedEntry(format!("unsupported id {}", n))),
            },
            Some(other) => return Err(BukberError::MalformedEntry(format!("unsupported id {}", other))),
            None => return Err(BukberError::MalformedEntry("missing id".to_string())),
        };
        object.insert("id".to_string(), serde_json::Value::String(id.as_str().to_string()));

        serde_json::from_value(payload).map_err(|e| BukberError::MalformedEntry(e.to_string()))
    }

    /// Wish text, if this is a wish
    pub fn message(&self) -> Option<&str> {
        match &self.details {
            EntryDetails::Wish { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_wish(&self) -> bool {
        matches!(self.details, EntryDetails::Wish { .. })
    }
}

/// A validated submission waiting for the write collaborator to assign an
/// id and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl NewEntry {
    /// Materialize into an [`Entry`] with the backend-assigned fields
    pub fn into_entry(self, id: EntryId, created_at: DateTime<Utc>) -> Entry {
        Entry {
            id,
            name: self.name,
            created_at,
            details: self.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_wish_with_numeric_id() {
        let entry = Entry::from_payload(json!({
            "id": 17,
            "name": "Aisyah",
            "message": "Semoga berkah",
            "created_at": "2026-03-23T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(entry.id.as_str(), "17");
        assert_eq!(entry.name, "Aisyah");
        assert_eq!(entry.message(), Some("Semoga berkah"));
        assert!(entry.is_wish());
    }

    #[test]
    fn test_from_payload_rsvp() {
        let entry = Entry::from_payload(json!({
            "id": "01J0000000000000000000000A",
            "name": "Budi",
            "guests": 3,
            "status": "Tidak Hadir",
            "created_at": "2026-03-20T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(
            entry.details,
            EntryDetails::Rsvp {
                guests: 3,
                status: Attendance::NotAttending
            }
        );
        assert_eq!(entry.message(), None);
    }

    #[test]
    fn test_from_payload_wishes_row() {
        let entry = Entry::from_payload(json!({
            "id": 3,
            "name": "Aisyah",
            "message": "Semoga berkah",
            "created_at": "2026-02-20T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(
            entry.details,
            EntryDetails::Wish {
                message: "Semoga berkah".to_string()
            }
        );
    }

    #[test]
    fn test_from_payload_registration_row() {
        let entry = Entry::from_payload(json!({
            "id": 4,
            "name": "Citra",
            "nik": "3171",
            "attendance": true,
            "created_at": "2026-02-20T10:05:00Z"
        }))
        .unwrap();

        assert_eq!(
            entry.details,
            EntryDetails::Registration {
                nik: "3171".to_string(),
                attendance: true
            }
        );
        assert!(!entry.is_wish());
    }

    #[test]
    fn test_from_payload_rejects_unknown_shape() {
        let result = Entry::from_payload(json!({
            "id": 5,
            "name": "Dewi",
            "guests": 2,
            "created_at": "2026-02-20T10:05:00Z"
        }));
        assert!(matches!(result, Err(BukberError::MalformedEntry(_))));
    }

    #[test]
    fn test_serialized_row_has_no_tag() {
        let entry = NewEntry {
            name: "Budi".to_string(),
            details: EntryDetails::Rsvp {
                guests: 2,
                status: Attendance::Attending,
            },
        }
        .into_entry(EntryId::from(9), "2026-02-20T10:00:00Z".parse().unwrap());

        let row = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            row,
            json!({
                "id": "9",
                "name": "Budi",
                "created_at": "2026-02-20T10:00:00Z",
                "guests": 2,
                "status": "Hadir"
            })
        );
        assert_eq!(Entry::from_payload(row).unwrap(), entry);
    }

    #[test]
    fn test_from_payload_rejects_missing_id() {
        let result = Entry::from_payload(json!({
            "name": "Nobody",
            "message": "hi",
            "created_at": "2026-03-23T09:30:00Z"
        }));
        assert!(matches!(result, Err(BukberError::MalformedEntry(_))));
    }

    #[test]
    fn test_from_payload_rejects_blank_id_and_non_object() {
        let blank = Entry::from_payload(json!({
            "id": "  ",
            "name": "Nobody",
            "message": "hi",
            "created_at": "2026-03-23T09:30:00Z"
        }));
        assert!(matches!(blank, Err(BukberError::MalformedEntry(_))));
        assert!(matches!(
            Entry::from_payload(json!([1, 2, 3])),
            Err(BukberError::MalformedEntry(_))
        ));
    }

    #[test]
    fn test_from_payload_rejects_missing_created_at() {
        let result = Entry::from_payload(json!({
            "id": 1,
            "name": "Aisyah",
            "message": "hi"
        }));
        assert!(matches!(result, Err(BukberError::MalformedEntry(_))));
    }

    #[test]
    fn test_attendance_labels() {
        assert_eq!(Attendance::default(), Attendance::Attending);
        assert_eq!(Attendance::NotAttending.to_string(), "Tidak Hadir");
        assert_eq!(
            serde_json::to_string(&Attendance::Attending).unwrap(),
            "\"Hadir\""
        );
    }

    #[test]
    fn test_new_entry_into_entry() {
        let draft = NewEntry {
            name: "Citra".to_string(),
            details: EntryDetails::Registration {
                nik: "3171000000000001".to_string(),
                attendance: true,
            },
        };
        let created_at = "2026-03-01T00:00:00Z".parse().unwrap();
        let entry = draft.clone().into_entry(EntryId::from(5), created_at);
        assert_eq!(entry.name, draft.name);
        assert_eq!(entry.details, draft.details);
        assert_eq!(entry.created_at, created_at);
    }
}
