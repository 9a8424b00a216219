//! Core error types for contactform-rs.
//!
//! [`FormsError`] covers the hard failures of the system: contract
//! violations while declaring a form, illegal lifecycle transitions,
//! configuration problems, and I/O. Validation failures and spam verdicts
//! are deliberately absent here; they are recorded as data on the form and
//! surfaced through its query methods.

use thiserror::Error;

/// The primary error type for contactform-rs.
///
/// Each variant maps to an HTTP status code via [`FormsError::status_code`]
/// so the HTTP adapter can turn any failure into a response.
#[derive(Error, Debug)]
pub enum FormsError {
    // ── Declaration ──────────────────────────────────────────────────

    /// A field that requires a name resolved to an empty one.
    #[error("Input needs a name (kind: {0})")]
    MissingName(String),

    /// Two fields in one form resolved to the same name.
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    // ── Lifecycle ────────────────────────────────────────────────────

    /// A lifecycle transition was requested from a state that forbids it.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// The state the form was in.
        from: String,
        /// The state that was requested.
        to: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Mail ─────────────────────────────────────────────────────────

    /// A mail backend could not be prepared.
    #[error("Mail error: {0}")]
    MailError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormsError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `InvalidTransition` -> 409
    /// - `MailError` -> 502
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 409,
            Self::MailError(_) => 502,
            Self::MissingName(_)
            | Self::DuplicateField(_)
            | Self::ConfigurationError(_)
            | Self::IoError(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, FormsError>`.
pub type FormsResult<T> = Result<T, FormsError>;
