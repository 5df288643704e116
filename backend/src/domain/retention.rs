//! Data retention policy for stored submissions.
//!
//! Submissions expire after a configured number of calendar months. The
//! cutoff is computed with calendar-aware month arithmetic and handed to
//! the store as a plain timestamp bound, never interpolated into a query.

use std::fmt;

use chrono::{DateTime, Months, Utc};

/// Retention window applied when none is configured.
pub const DEFAULT_RETENTION_MONTHS: u32 = 6;

/// Errors returned when constructing a [`RetentionWindow`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetentionWindowError {
    /// A window of zero months would expire every record immediately.
    #[error("retention window must be at least one month")]
    Zero,
}

/// Number of whole months a submission is retained before becoming
/// eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionWindow(u32);

impl RetentionWindow {
    /// Construct a window of `months` months.
    ///
    /// # Errors
    /// Returns [`RetentionWindowError::Zero`] for a zero-month window.
    pub fn new(months: u32) -> Result<Self, RetentionWindowError> {
        if months == 0 {
            return Err(RetentionWindowError::Zero);
        }
        Ok(Self(months))
    }

    /// The window length in months.
    pub fn months(self) -> u32 {
        self.0
    }

    /// Calendar-aware deletion cutoff: everything submitted strictly before
    /// this instant is eligible.
    ///
    /// Month subtraction follows calendar semantics (subtracting six months
    /// from 31 August lands on 29 February or 28 February as the calendar
    /// dictates), not a fixed number of days.
    pub fn cutoff_from(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.0))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self(DEFAULT_RETENTION_MONTHS)
    }
}

impl fmt::Display for RetentionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} months", self.0)
    }
}

/// Pure retention policy: decides eligibility given a window and "now".
#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionPolicy {
    window: RetentionWindow,
}

impl RetentionPolicy {
    /// Policy with the given window.
    pub fn new(window: RetentionWindow) -> Self {
        Self { window }
    }

    /// The configured window.
    pub fn window(&self) -> RetentionWindow {
        self.window
    }

    /// Whether a record submitted at `submitted_at` has outlived the window
    /// as of `now`.
    pub fn is_expired(&self, submitted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        submitted_at < self.window.cutoff_from(now)
    }
}
