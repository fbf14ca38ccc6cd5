//! Guest submissions
//!
//! Each form validates locally before anything reaches the write
//! collaborator. A [`SubmissionDesk`] owns one form and submits it through
//! `&mut self`, so a desk can never have two writes in flight.
//!
//! Submissions are not inserted into the feed locally. The store echoes the
//! stored entry on its insert stream, and that echo is the only path into
//! the [`Feed`](crate::feed::Feed).

use tracing::{info, warn};

use crate::error::{BukberError, BukberResult};
use crate::feed::{Attendance, Entry, EntryDetails, NewEntry};
use crate::store::EntryStore;

/// Minimum name length on the RSVP and registration forms
pub const MIN_NAME_CHARS: usize = 2;

/// A guest-facing form
pub trait Form {
    /// Validate the current input into a submission
    fn validate(&self) -> BukberResult<NewEntry>;

    /// Clear whatever should not survive a successful submission
    fn reset_after_submit(&mut self);
}

fn require_filled(field: &'static str, value: &str) -> BukberResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BukberError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn require_name(value: &str) -> BukberResult<String> {
    let name = require_filled("name", value)?;
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(BukberError::validation(
            "name",
            format!("must be at least {} characters", MIN_NAME_CHARS),
        ));
    }
    Ok(name)
}

/// Guestbook wish form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishForm {
    pub name: String,
    pub message: String,
}

impl WishForm {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl Form for WishForm {
    fn validate(&self) -> BukberResult<NewEntry> {
        let name = require_filled("name", &self.name)?;
        let message = require_filled("message", &self.message)?;
        Ok(NewEntry {
            name,
            details: EntryDetails::Wish { message },
        })
    }

    /// Keeps the name so the guest can send another wish
    fn reset_after_submit(&mut self) {
        self.message.clear();
    }
}

/// RSVP form with party size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpForm {
    pub name: String,
    /// Signed so that out-of-range input can be reported instead of wrapped
    pub guests: i64,
    pub status: Attendance,
}

impl Default for RsvpForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            guests: 1,
            status: Attendance::Attending,
        }
    }
}

impl Form for RsvpForm {
    fn validate(&self) -> BukberResult<NewEntry> {
        let name = require_name(&self.name)?;
        if self.guests < 1 {
            return Err(BukberError::validation("guests", "must be at least 1"));
        }
        let guests = u32::try_from(self.guests)
            .map_err(|_| BukberError::validation("guests", "is too large"))?;
        Ok(NewEntry {
            name,
            details: EntryDetails::Rsvp {
                guests,
                status: self.status,
            },
        })
    }

    fn reset_after_submit(&mut self) {
        *self = Self::default();
    }
}

/// Attendance registration keyed by national id number (NIK)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub nik: String,
}

impl Form for RegistrationForm {
    fn validate(&self) -> BukberResult<NewEntry> {
        let name = require_name(&self.name)?;
        let nik = require_filled("nik", &self.nik)?;
        if !nik.chars().all(|c| c.is_ascii_digit()) {
            return Err(BukberError::validation("nik", "must be a number"));
        }
        Ok(NewEntry {
            name,
            details: EntryDetails::Registration {
                nik,
                attendance: true,
            },
        })
    }

    fn reset_after_submit(&mut self) {
        *self = Self::default();
    }
}

/// Owns a form and submits it to a store
#[derive(Debug, Clone, Default)]
pub struct SubmissionDesk<F> {
    form: F,
}

impl<F: Form> SubmissionDesk<F> {
    pub fn new(form: F) -> Self {
        Self { form }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Validate and write the current form.
    ///
    /// On success the form is reset and the stored entry returned. On any
    /// failure the input is left exactly as it was so the guest can retry;
    /// validation failures never reach the store.
    pub async fn submit<S: EntryStore>(&mut self, store: &S) -> BukberResult<Entry> {
        let draft = self.form.validate()?;

        match store.insert(draft).await {
            Ok(entry) => {
                info!(id = %entry.id, "Submission stored");
                self.form.reset_after_submit();
                Ok(entry)
            }
            Err(e) => {
                warn!(error = %e, "Submission failed, keeping form input");
                Err(e)
            }
        }
    }
}
