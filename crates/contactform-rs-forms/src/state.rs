//! The submission lifecycle.
//!
//! ```text
//! Invalid --evaluate(ok)--> Valid --delivered--> Sent
//!    ^                        |
//!    +---evaluate(errors)-----+--delivery_failed--> Rejected
//! ```
//!
//! `Sent` and `Rejected` are terminal. External signals (a reload after a
//! redirect) may enter either terminal state from anywhere.

use std::fmt;

use serde::{Deserialize, Serialize};

use contactform_rs_core::{FormsError, FormsResult};

/// Where a form is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    /// Untested, or tested with errors.
    #[default]
    Invalid,
    /// Validated without errors, awaiting delivery.
    Valid,
    /// Delivered.
    Sent,
    /// Delivery failed.
    Rejected,
}

/// An outcome reported from outside the current request, such as the
/// `?success` query string after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalSignal {
    /// The submission was delivered.
    Success,
    /// The submission was rejected.
    Rejected,
}

impl SubmissionState {
    /// Returns the lowercase state name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Valid => "valid",
            Self::Sent => "sent",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` for `Sent` and `Rejected`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Sent | Self::Rejected)
    }

    /// Decides between `Valid` and `Invalid` after validation.
    ///
    /// Terminal states are returned unchanged: a rejected form never
    /// becomes valid again on its own.
    #[must_use]
    pub const fn evaluate(self, has_errors: bool) -> Self {
        match self {
            Self::Sent | Self::Rejected => self,
            Self::Invalid | Self::Valid if has_errors => Self::Invalid,
            Self::Invalid | Self::Valid => Self::Valid,
        }
    }

    /// The transport accepted the message.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::InvalidTransition`] unless the state is `Valid`.
    pub fn delivered(self) -> FormsResult<Self> {
        self.from_valid(Self::Sent)
    }

    /// The transport refused the message.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::InvalidTransition`] unless the state is `Valid`.
    pub fn delivery_failed(self) -> FormsResult<Self> {
        self.from_valid(Self::Rejected)
    }

    /// Applies an external signal. Allowed from every state.
    #[must_use]
    pub const fn signal(self, signal: ExternalSignal) -> Self {
        match signal {
            ExternalSignal::Success => Self::Sent,
            ExternalSignal::Rejected => Self::Rejected,
        }
    }

    fn from_valid(self, to: Self) -> FormsResult<Self> {
        if self == Self::Valid {
            Ok(to)
        } else {
            Err(FormsError::InvalidTransition {
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
