//! The form aggregate.
//!
//! A [`Form`] owns its fields in render order, the honeypot guard, the
//! lifecycle state, and any form-level errors. Callers drive it through
//! a fixed sequence:
//!
//! ```text
//! declare fields -> merge(payload) -> validate() -> deliver(transport)
//! ```
//!
//! and then query it for rendering or a JSON response.
//!
//! # Examples
//!
//! ```
//! use contactform_rs_forms::{Form, Payload, SubmissionState};
//!
//! let mut form = Form::post("/contact")
//!     .without_honeypot()
//!     .name(true)?
//!     .email(true)?
//!     .message(true)?
//!     .submit("Send")?;
//!
//! let payload: Payload = [("name", "Ann"), ("email", "bad"), ("message", "hi")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), Some(v.to_string())))
//!     .collect();
//! form.merge(&payload).validate();
//!
//! assert_eq!(form.state(), SubmissionState::Invalid);
//! assert!(form.has_error("email"));
//! # Ok::<(), contactform_rs_core::FormsError>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use contactform_rs_core::settings::{MailSettings, MessageSettings};
use contactform_rs_core::{FormsError, FormsResult, Settings};

use crate::clock::{Clock, SystemClock};
use crate::field::{Field, FieldKind, FieldSpec};
use crate::honeypot::{HoneypotGuard, SpamReason};
use crate::state::{ExternalSignal, SubmissionState};
use crate::transport::{MailMessage, MailTransport};
use crate::validation::{self, ErrorMap, FORM_KEY, MAILER_KEY};
use crate::widgets;

/// Submitted data: field name to value. A key may be present with a null
/// value, which is distinct from the key being absent.
pub type Payload = HashMap<String, Option<String>>;

/// The HTTP method a form submits with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    #[default]
    Post,
}

impl HttpMethod {
    /// Returns the lowercase method name used in the `method` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact form and its submission lifecycle.
#[derive(Debug, Clone)]
pub struct Form {
    method: HttpMethod,
    action: String,
    fields: Vec<Field>,
    honeypot: Option<HoneypotGuard>,
    clock: Arc<dyn Clock>,
    messages: MessageSettings,
    debug: bool,
    state: SubmissionState,
    validated: bool,
    evidence: Option<Payload>,
    spam: Option<SpamReason>,
    added_errors: ErrorMap,
}

impl Form {
    /// Creates an empty form protected by the default honeypot.
    pub fn new(method: HttpMethod, action: impl Into<String>) -> Self {
        let mut form = Self {
            method,
            action: action.into(),
            fields: Vec::new(),
            honeypot: Some(HoneypotGuard::default()),
            clock: Arc::new(SystemClock),
            messages: MessageSettings::default(),
            debug: false,
            state: SubmissionState::default(),
            validated: false,
            evidence: None,
            spam: None,
            added_errors: ErrorMap::new(),
        };
        form.install_honeypot();
        form
    }

    /// Creates a `GET` form.
    pub fn get(action: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, action)
    }

    /// Creates a `POST` form.
    pub fn post(action: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, action)
    }

    /// Sets the `action` URL. An empty action is omitted when rendering.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Applies messages, debug mode, and honeypot configuration.
    #[must_use]
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.messages = settings.messages.clone();
        self.debug = settings.debug;
        self.remove_honeypot_fields();
        self.honeypot = settings
            .honeypot
            .enabled
            .then(|| HoneypotGuard::from_settings(&settings.honeypot));
        self.install_honeypot();
        self
    }

    /// Replaces the clock and re-stamps the honeypot timestamp.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.remove_honeypot_fields();
        self.install_honeypot();
        self
    }

    /// Replaces the honeypot guard.
    #[must_use]
    pub fn with_honeypot(mut self, guard: HoneypotGuard) -> Self {
        self.remove_honeypot_fields();
        self.honeypot = Some(guard);
        self.install_honeypot();
        self
    }

    /// Drops the honeypot fields and skips the spam check.
    #[must_use]
    pub fn without_honeypot(mut self) -> Self {
        self.remove_honeypot_fields();
        self.honeypot = None;
        self
    }

    /// Adds a form-level error under `"form"`.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.add_error(FORM_KEY, message);
        self
    }

    // ── Declaration ──────────────────────────────────────────────────

    /// Resolves a spec and appends the field.
    ///
    /// # Errors
    ///
    /// [`FormsError::MissingName`] when the declaration resolves no name, and
    /// [`FormsError::DuplicateField`] when the name is already taken.
    pub fn declare(&mut self, spec: FieldSpec) -> FormsResult<&Field> {
        let field = Field::new(spec)?;
        if let Some(name) = field.name() {
            if self.field_named(name).is_some() {
                return Err(FormsError::DuplicateField(name.to_string()));
            }
        }
        let index = self.fields.len();
        self.fields.push(field);
        Ok(&self.fields[index])
    }

    /// Builder form of [`declare`](Self::declare).
    pub fn field(mut self, spec: FieldSpec) -> FormsResult<Self> {
        self.declare(spec)?;
        Ok(self)
    }

    /// Appends a text input.
    pub fn text(self, name: impl Into<String>) -> FormsResult<Self> {
        self.field(FieldSpec::new(FieldKind::Text).name(name))
    }

    /// Appends a textarea.
    pub fn textarea(self, name: impl Into<String>) -> FormsResult<Self> {
        self.field(FieldSpec::new(FieldKind::Textarea).name(name))
    }

    /// Appends a plain button with the given text.
    pub fn button(self, label: impl Into<String>) -> FormsResult<Self> {
        self.field(FieldSpec::new(FieldKind::Button).label(label))
    }

    /// Appends a reset button with the given text.
    pub fn reset(self, label: impl Into<String>) -> FormsResult<Self> {
        self.field(FieldSpec::new(FieldKind::Reset).label(label))
    }

    /// Appends a submit button with the given text.
    pub fn submit(self, label: impl Into<String>) -> FormsResult<Self> {
        self.field(FieldSpec::new(FieldKind::Submit).label(label))
    }

    /// Appends the `name` preset.
    pub fn name(self, required: bool) -> FormsResult<Self> {
        self.field(FieldSpec::person_name().required(required))
    }

    /// Appends the `email` preset.
    pub fn email(self, required: bool) -> FormsResult<Self> {
        self.field(FieldSpec::email_address().required(required))
    }

    /// Appends the `message` preset.
    pub fn message(self, required: bool) -> FormsResult<Self> {
        self.field(FieldSpec::message().required(required))
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Copies submitted values onto same-named fields.
    ///
    /// Unknown keys and null values are ignored. Only the honeypot entries
    /// are kept for the spam check; the payload itself is not retained.
    /// A terminal form ignores the call.
    pub fn merge(&mut self, payload: &Payload) -> &mut Self {
        if self.is_terminal() {
            return self;
        }
        for field in &mut self.fields {
            let value = field
                .name()
                .and_then(|name| payload.get(name))
                .and_then(Option::as_deref);
            if let Some(value) = value {
                field.set_value(value);
            }
        }
        self.evidence = self.honeypot.as_ref().map(|guard| guard.extract(payload));
        self
    }

    /// Runs the honeypot check, then field rules, then [`evaluate`](Self::evaluate).
    ///
    /// A spam verdict clears field errors and skips the field rules.
    /// A terminal form ignores the call.
    pub fn validate(&mut self) -> &mut Self {
        if self.is_terminal() {
            return self;
        }

        self.spam = self.honeypot.as_ref().and_then(|guard| {
            guard
                .check(self.evidence.as_ref(), self.clock.now())
                .err()
        });

        if let Some(reason) = self.spam {
            tracing::warn!(reason = reason.code(), "Submission classified as spam");
            validation::clear_field_errors(&mut self.fields);
        } else {
            validation::validate_fields(&mut self.fields);
        }

        self.validated = true;
        self.evaluate();
        self
    }

    /// Moves between `Valid` and `Invalid` based on the current errors.
    ///
    /// A form that was never validated stays `Invalid`. Terminal states
    /// are left alone.
    pub fn evaluate(&mut self) -> SubmissionState {
        let has_errors = !self.validated || self.has_errors();
        self.state = self.state.evaluate(has_errors);
        tracing::debug!(state = %self.state, "Form evaluated");
        self.state
    }

    /// Sends a valid form through `transport`.
    ///
    /// On success the form becomes `Sent` and drops its fields. On failure
    /// it becomes `Rejected`, records the failure under `"mailer"`, and
    /// disables itself. Both outcomes return `Ok`; the result is read back
    /// through [`state`](Self::state) and [`error_message`](Self::error_message).
    ///
    /// # Errors
    ///
    /// [`FormsError::InvalidTransition`] if the form is not `Valid`.
    pub fn deliver(
        &mut self,
        transport: &dyn MailTransport,
        mail: &MailSettings,
    ) -> FormsResult<()> {
        if self.state != SubmissionState::Valid {
            return Err(FormsError::InvalidTransition {
                from: self.state.to_string(),
                to: SubmissionState::Sent.to_string(),
            });
        }

        let message = MailMessage::compose(self, mail);
        match transport.send(&message) {
            Ok(()) => {
                self.state = self.state.delivered()?;
                self.fields.clear();
                tracing::info!(recipient = %message.recipient, "Contact message delivered");
            }
            Err(err) => {
                self.state = self.state.delivery_failed()?;
                tracing::error!(code = ?err.code, error = %err, "Mail transport failed");
                let text = if self.debug {
                    err.message
                } else if let Some(code) = err.code {
                    format!("{code}: {}", self.messages.mailer_failed)
                } else {
                    self.messages.mailer_failed.clone()
                };
                self.add_error(MAILER_KEY, text);
                self.disable_all();
            }
        }
        Ok(())
    }

    /// Enters `Sent` from any state and drops every field.
    pub fn success(&mut self) -> &mut Self {
        self.state = self.state.signal(ExternalSignal::Success);
        self.fields.clear();
        self
    }

    /// Enters `Rejected` from any state, disables every field, and
    /// removes submit buttons.
    pub fn reject(&mut self) -> &mut Self {
        self.state = self.state.signal(ExternalSignal::Rejected);
        self.disable_all();
        self
    }

    /// Applies an external signal, as [`success`](Self::success) or
    /// [`reject`](Self::reject).
    pub fn signal(&mut self, signal: ExternalSignal) -> &mut Self {
        match signal {
            ExternalSignal::Success => self.success(),
            ExternalSignal::Rejected => self.reject(),
        }
    }

    // ── Errors ───────────────────────────────────────────────────────

    /// Rebuilds and returns the error map.
    pub fn errors(&self) -> ErrorMap {
        validation::collect_errors(
            self.state,
            &self.fields,
            self.spam,
            &self.added_errors,
            &self.messages,
        )
    }

    /// Returns `true` if any error is present.
    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Returns `true` if an error is present under `key`.
    pub fn has_error(&self, key: &str) -> bool {
        self.errors().contains_key(key)
    }

    /// Adds or replaces an error under `key`.
    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.added_errors.insert(key.into(), message.into());
    }

    /// The single form-level message: the mailer failure when rejected,
    /// else the `"form"` error, else an empty string.
    pub fn error_message(&self) -> String {
        let mut errors = self.errors();
        if self.state == SubmissionState::Rejected {
            if let Some(mailer) = errors.remove(MAILER_KEY) {
                return mailer;
            }
        }
        errors.remove(FORM_KEY).unwrap_or_default()
    }

    /// The success notice, once sent.
    pub fn success_message(&self) -> Option<&str> {
        (self.state == SubmissionState::Sent).then_some(self.messages.success.as_str())
    }

    /// The internal spam verdict from the last validation.
    pub const fn spam_reason(&self) -> Option<SpamReason> {
        self.spam
    }

    // ── State ────────────────────────────────────────────────────────

    /// Returns the lifecycle state.
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Returns `true` when the state is `Valid`.
    pub fn is_valid(&self) -> bool {
        self.state == SubmissionState::Valid
    }

    /// Returns `true` when the state is `Sent` or `Rejected`.
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Returns the fields in render order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == Some(name))
    }

    /// Returns the current value of a named field.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field_named(name).and_then(Field::value)
    }

    /// Returns the submitted values of every named, non-honeypot field.
    pub fn values(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter(|f| !self.is_honeypot_field(f))
            .filter_map(|f| Some((f.name()?, f.value()?)))
            .collect()
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the action URL.
    pub fn action_url(&self) -> &str {
        &self.action
    }

    /// Returns the honeypot guard, if enabled.
    pub const fn honeypot(&self) -> Option<&HoneypotGuard> {
        self.honeypot.as_ref()
    }

    /// Returns whether mailer failures expose the transport's message.
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Renders the form as HTML.
    pub fn render(&self) -> String {
        widgets::render_form(self)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn install_honeypot(&mut self) {
        if let Some(guard) = &self.honeypot {
            let mut fields = Vec::from(guard.fields(self.clock.now()));
            fields.append(&mut self.fields);
            self.fields = fields;
        }
    }

    fn remove_honeypot_fields(&mut self) {
        if let Some(guard) = self.honeypot.clone() {
            self.fields.retain(|f| {
                !(f.kind() == FieldKind::Hidden && f.name().is_some_and(|n| guard.owns(n)))
            });
        }
    }

    fn is_honeypot_field(&self, field: &Field) -> bool {
        field.kind() == FieldKind::Hidden
            && self
                .honeypot
                .as_ref()
                .zip(field.name())
                .is_some_and(|(guard, name)| guard.owns(name))
    }

    fn disable_all(&mut self) {
        self.fields.retain(|f| f.kind() != FieldKind::Submit);
        for field in &mut self.fields {
            field.disable();
        }
    }
}
