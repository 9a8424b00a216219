//! # contactform-rs-http
//!
//! The HTTP side of a contact form: urlencoded payload parsing, the choice
//! between a redirect and a JSON reply, and an axum [`Router`](axum::Router)
//! serving the form.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use contactform_rs_core::Settings;
//! use contactform_rs_http::{router, ContactState};
//! use contactform_rs_mail::ConsoleBackend;
//!
//! # async fn run() -> std::io::Result<()> {
//! let state = ContactState::new(Settings::default(), Arc::new(ConsoleBackend));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, router(state)).await
//! # }
//! ```

pub mod handler;
pub mod querydict;
pub mod response;

pub use handler::{contact_form, process_submission, router, ContactState, FormFactory};
pub use querydict::QueryDict;
pub use response::{HttpError, SubmissionResponse};
