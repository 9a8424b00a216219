//! The contact page endpoints.
//!
//! `GET` renders a fresh form. A `?success` or `?rejected` flag in the
//! query string, left there by an earlier redirect, puts the form straight
//! into the matching terminal state.
//!
//! `POST` merges the urlencoded body, validates, and delivers a valid form
//! through the configured transport. Asynchronous submissions (an `ajax`
//! body key, or `X-Requested-With: XMLHttpRequest`) receive JSON: `200`
//! with the submitted values plus `successful`, or `400` with the error
//! map. Regular submissions are redirected to `?success` or `?rejected`,
//! or receive the re-rendered form with `400` when invalid.

use std::fmt;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::Router;
use http::{HeaderMap, StatusCode};
use tower_http::trace::TraceLayer;

use contactform_rs_core::logging::submission_span;
use contactform_rs_core::{FormsResult, Settings};
use contactform_rs_forms::{
    Clock, ExternalSignal, Form, MailTransport, Payload, SubmissionState, SystemClock,
};

use crate::querydict::QueryDict;
use crate::response::{HttpError, SubmissionResponse};

/// Body key that marks an asynchronous submission.
pub const AJAX_KEY: &str = "ajax";

/// Key added to the JSON body of a successful asynchronous submission.
pub const SUCCESSFUL_KEY: &str = "successful";

/// Builds a fresh form for each request.
pub type FormFactory = Arc<dyn Fn(&Settings) -> FormsResult<Form> + Send + Sync>;

/// Shared state for the contact endpoints.
#[derive(Clone)]
pub struct ContactState {
    settings: Arc<Settings>,
    transport: Arc<dyn MailTransport>,
    clock: Arc<dyn Clock>,
    factory: FormFactory,
    path: String,
}

impl fmt::Debug for ContactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactState")
            .field("settings", &self.settings)
            .field("clock", &self.clock)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ContactState {
    /// Creates state serving [`contact_form`] at `/`.
    pub fn new(settings: Settings, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
            clock: Arc::new(SystemClock),
            factory: Arc::new(contact_form),
            path: "/".to_string(),
        }
    }

    /// Replaces the clock used for honeypot stamps and checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the form declaration.
    #[must_use]
    pub fn with_form<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Settings) -> FormsResult<Form> + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    /// Serves the form at `path` instead of `/`.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the path the form is served at.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Builds a fresh form stamped by this state's clock.
    pub fn form(&self) -> FormsResult<Form> {
        Ok((self.factory)(&self.settings)?.with_clock(Arc::clone(&self.clock)))
    }
}

/// The default declaration: required name, email, and message, and a
/// submit button.
pub fn contact_form(settings: &Settings) -> FormsResult<Form> {
    Form::post("")
        .with_settings(settings)
        .name(true)?
        .email(true)?
        .message(true)?
        .submit("Send")
}

/// Builds the router serving `GET` and `POST` at the state's path.
pub fn router(state: ContactState) -> Router {
    let path = state.path.clone();
    Router::new()
        .route(&path, get(show).post(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn show(
    State(state): State<ContactState>,
    RawQuery(query): RawQuery,
) -> Result<SubmissionResponse, HttpError> {
    let mut form = state.form()?;
    let query = QueryDict::parse(query.as_deref().unwrap_or_default());
    if let Some(signal) = signal_from_query(&query) {
        tracing::debug!(?signal, "Applying outcome from query string");
        form.signal(signal);
    }
    Ok(SubmissionResponse::page(render_page(&form)))
}

async fn submit(
    State(state): State<ContactState>,
    headers: HeaderMap,
    body: String,
) -> Result<SubmissionResponse, HttpError> {
    let query = QueryDict::parse(&body);
    let ajax = query.contains_key(AJAX_KEY) || is_xhr(&headers);
    let mut payload = query.to_payload();
    payload.remove(AJAX_KEY);

    let span = submission_span(&uuid::Uuid::new_v4().to_string());
    let response = span.in_scope(|| process_submission(&state, &payload, ajax))?;
    Ok(response)
}

/// Runs one submission end to end and chooses the response.
///
/// # Errors
///
/// Fails only when the form cannot be built or a lifecycle transition is
/// refused; validation and delivery failures are part of the response.
pub fn process_submission(
    state: &ContactState,
    payload: &Payload,
    ajax: bool,
) -> FormsResult<SubmissionResponse> {
    let mut form = state.form()?;
    form.merge(payload).validate();

    let submitted = submitted_values(&form);
    if form.is_valid() {
        form.deliver(state.transport.as_ref(), &state.settings.mail)?;
    }

    tracing::info!(state = %form.state(), ajax, "Submission processed");
    Ok(respond(&form, submitted, ajax, &state.path))
}

/// Maps a processed form to a response.
pub fn respond(
    form: &Form,
    submitted: serde_json::Map<String, serde_json::Value>,
    ajax: bool,
    path: &str,
) -> SubmissionResponse {
    if ajax {
        return match form.success_message() {
            Some(success) => {
                let mut body = submitted;
                body.insert(SUCCESSFUL_KEY.to_string(), success.into());
                SubmissionResponse::Json {
                    status: StatusCode::OK,
                    body: body.into(),
                }
            }
            None => SubmissionResponse::Json {
                status: StatusCode::BAD_REQUEST,
                body: serde_json::to_value(form.errors()).unwrap_or_default(),
            },
        };
    }

    match form.state() {
        SubmissionState::Sent => SubmissionResponse::Redirect(format!("{path}?success")),
        SubmissionState::Rejected => SubmissionResponse::Redirect(format!("{path}?rejected")),
        SubmissionState::Invalid | SubmissionState::Valid => SubmissionResponse::Page {
            status: StatusCode::BAD_REQUEST,
            html: render_page(form),
        },
    }
}

fn submitted_values(form: &Form) -> serde_json::Map<String, serde_json::Value> {
    form.values()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.into()))
        .collect()
}

fn signal_from_query(query: &QueryDict) -> Option<ExternalSignal> {
    if query.contains_key("success") {
        Some(ExternalSignal::Success)
    } else if query.contains_key("rejected") {
        Some(ExternalSignal::Rejected)
    } else {
        None
    }
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
}

fn render_page(form: &Form) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Contact</title></head><body>{}</body></html>",
        form.render()
    )
}
