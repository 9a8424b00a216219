//! # contactform-rs
//!
//! Contact and lead forms with server-side validation, a honeypot spam
//! check, and a tracked submission lifecycle.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `contactform-rs` to get everything, or depend on
//! individual crates for finer-grained control.

/// Settings, settings loading, logging, and error types.
pub use contactform_rs_core as core;

/// Fields, honeypot guard, validation, and the form lifecycle.
pub use contactform_rs_forms as forms;

/// Console, file, and in-memory mail backends.
#[cfg(feature = "mail")]
pub use contactform_rs_mail as mail;

/// Payload parsing, responses, and the axum router.
#[cfg(feature = "http")]
pub use contactform_rs_http as http;

/// Third-party crates re-exported for convenience.
pub use axum;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The items most applications need.
pub mod prelude {
    pub use contactform_rs_core::{FormsError, FormsResult, Settings};
    pub use contactform_rs_forms::{
        Field, FieldKind, FieldSpec, Form, MailError, MailMessage, MailTransport, Payload,
        SubmissionState,
    };

    #[cfg(feature = "mail")]
    pub use contactform_rs_mail::{get_transport, ConsoleBackend, FileBackend, InMemoryBackend};

    #[cfg(feature = "http")]
    pub use contactform_rs_http::{router, ContactState};
}
