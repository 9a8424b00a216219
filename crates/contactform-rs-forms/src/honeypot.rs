//! Time- and presence-based spam heuristic.
//!
//! Every protected form carries two hidden fields: a decoy that humans
//! never see and therefore leave empty, and a timestamp recording when the
//! form was rendered. A submission is treated as spam when either field is
//! missing, when the decoy was filled in, or when it arrives within the
//! minimum delay of the render.
//!
//! The checks run in a fixed order and the first failure wins:
//!
//! 1. no payload at all -> [`SpamReason::MissingPayload`]
//! 2. either honeypot key absent -> [`SpamReason::TamperedPayload`]
//! 3. decoy non-empty (or null) -> [`SpamReason::HoneypotTriggered`]
//! 4. elapsed time `<=` minimum delay -> [`SpamReason::SubmittedTooFast`]

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use contactform_rs_core::settings::HoneypotSettings;

use crate::field::Field;
use crate::form::Payload;

/// Why a submission was classified as spam.
///
/// The reason is for logs and tests only. Users always see the single
/// generic spam message from the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpamReason {
    /// The form was validated without any submitted data.
    #[error("submitted data is missing")]
    MissingPayload,
    /// A honeypot key was removed, or the timestamp is not a timestamp.
    #[error("submitted data was tampered with")]
    TamperedPayload,
    /// The decoy field was filled in.
    #[error("honeypot field was filled in")]
    HoneypotTriggered,
    /// The form was submitted too soon after it was rendered.
    #[error("submitted too soon after render")]
    SubmittedTooFast,
}

impl SpamReason {
    /// A short, stable code for structured logs.
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingPayload => "missing_payload",
            Self::TamperedPayload => "tampered_payload",
            Self::HoneypotTriggered => "honeypot_triggered",
            Self::SubmittedTooFast => "submitted_too_fast",
        }
    }
}

/// Rule 4 in isolation: passes only when strictly more than `min_delay`
/// has elapsed between `rendered_at` and `now`.
pub fn check_elapsed(
    rendered_at: DateTime<Utc>,
    now: DateTime<Utc>,
    min_delay: Duration,
) -> Result<(), SpamReason> {
    let elapsed = now.signed_duration_since(rendered_at);
    match chrono::Duration::from_std(min_delay) {
        Ok(min) if elapsed > min => Ok(()),
        _ => Err(SpamReason::SubmittedTooFast),
    }
}

/// The honeypot field pair and its threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoneypotGuard {
    decoy_field: String,
    timestamp_field: String,
    min_delay: Duration,
}

impl Default for HoneypotGuard {
    fn default() -> Self {
        Self::from_settings(&HoneypotSettings::default())
    }
}

impl HoneypotGuard {
    /// Creates a guard with the given field names and the default 3 second delay.
    pub fn new(decoy_field: impl Into<String>, timestamp_field: impl Into<String>) -> Self {
        Self {
            decoy_field: decoy_field.into(),
            timestamp_field: timestamp_field.into(),
            min_delay: HoneypotSettings::default().min_delay(),
        }
    }

    /// Creates a guard from settings.
    pub fn from_settings(settings: &HoneypotSettings) -> Self {
        Self {
            decoy_field: settings.decoy_field.clone(),
            timestamp_field: settings.timestamp_field.clone(),
            min_delay: settings.min_delay(),
        }
    }

    /// Sets the minimum delay.
    #[must_use]
    pub const fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Returns the decoy field name.
    pub fn decoy_field(&self) -> &str {
        &self.decoy_field
    }

    /// Returns the timestamp field name.
    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    /// Returns the minimum delay.
    pub const fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Returns `true` if `name` is one of the two honeypot fields.
    pub fn owns(&self, name: &str) -> bool {
        name == self.decoy_field || name == self.timestamp_field
    }

    /// The two hidden fields, the timestamp stamped with `rendered_at`.
    pub fn fields(&self, rendered_at: DateTime<Utc>) -> [Field; 2] {
        [
            Field::hidden(self.decoy_field.clone(), None),
            Field::hidden(
                self.timestamp_field.clone(),
                Some(rendered_at.timestamp().to_string()),
            ),
        ]
    }

    /// Copies only the honeypot entries out of a submitted payload.
    ///
    /// Keys keep their presence and their null-ness so [`check`](Self::check)
    /// sees exactly what was submitted.
    pub fn extract(&self, payload: &Payload) -> Payload {
        payload
            .iter()
            .filter(|(key, _)| self.owns(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Runs the ordered honeypot checks against a submission received at `now`.
    pub fn check(&self, payload: Option<&Payload>, now: DateTime<Utc>) -> Result<(), SpamReason> {
        let payload = payload.ok_or(SpamReason::MissingPayload)?;

        let (Some(decoy), Some(stamp)) = (
            payload.get(&self.decoy_field),
            payload.get(&self.timestamp_field),
        ) else {
            return Err(SpamReason::TamperedPayload);
        };

        if decoy.as_deref().map_or(true, |value| !value.is_empty()) {
            return Err(SpamReason::HoneypotTriggered);
        }

        let rendered_at = stamp
            .as_deref()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(SpamReason::TamperedPayload)?;

        check_elapsed(rendered_at, now, self.min_delay)
    }
}
