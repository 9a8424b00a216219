//! Integration tests for the submission lifecycle.
//!
//! These tests drive a contact form through the public API only:
//! 1. Declaration and rendering
//! 2. Honeypot and field validation
//! 3. Delivery through a transport and the resulting terminal states

use std::sync::{Arc, Mutex};

use contactform_rs_core::settings::MailSettings;
use contactform_rs_core::Settings;
use contactform_rs_forms::{
    ExternalSignal, FieldKind, FieldSpec, FixedClock, Form, MailError, MailMessage, MailTransport, Payload,
    SpamReason, SubmissionState,
};

// ============================================================================
// Shared helpers
// ============================================================================

const RENDERED_AT: i64 = 1_720_000_000;

/// Records messages, or fails every send with the configured error.
#[derive(Default)]
struct StubTransport {
    outbox: Mutex<Vec<MailMessage>>,
    failure: Option<MailError>,
}

impl StubTransport {
    fn failing(error: MailError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    fn sent(&self) -> usize {
        self.outbox.lock().unwrap().len()
    }
}

impl MailTransport for StubTransport {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => {
                self.outbox.lock().unwrap().push(message.clone());
                Ok(())
            }
        }
    }
}

/// The name/email/message form, with the server clock `elapsed` seconds
/// past the render time.
fn contact_form(settings: &Settings, elapsed: i64) -> Form {
    Form::post("/contact")
        .with_settings(settings)
        .name(true)
        .unwrap()
        .email(true)
        .unwrap()
        .message(true)
        .unwrap()
        .submit("Send")
        .unwrap()
        .with_clock(Arc::new(FixedClock::at_timestamp(RENDERED_AT + elapsed)))
}

fn submission(decoy: &str, fields: &[(&str, &str)]) -> Payload {
    let mut payload: Payload = fields
        .iter()
        .map(|(k, v)| ((*k).to_string(), Some((*v).to_string())))
        .collect();
    payload.insert("my_name".into(), Some(decoy.into()));
    payload.insert("request".into(), Some(RENDERED_AT.to_string()));
    payload
}

fn good_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Ann"),
        ("email", "ann@example.com"),
        ("message", "Hello, I would like a quote."),
    ]
}

// ============================================================================
// 1. Declaration and rendering
// ============================================================================

#[test]
fn test_declared_fields_keep_order() {
    let form = contact_form(&Settings::default(), 0);
    let kinds: Vec<_> = form.fields().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FieldKind::Hidden,
            FieldKind::Hidden,
            FieldKind::Text,
            FieldKind::Email,
            FieldKind::Textarea,
            FieldKind::Submit,
        ]
    );
}

#[test]
fn test_fresh_form_renders_hooks() {
    let html = contact_form(&Settings::default(), 0).render();
    assert!(html.contains("data-form>"));
    assert!(html.contains(r#"data-input-error="name""#));
    assert!(html.contains(r#"data-input-error="form""#));
    assert!(html.contains(r#"autocomplete="email""#));
    assert!(!html.contains("data-form-success"));
}

// ============================================================================
// 2. Validation
// ============================================================================

#[test]
fn test_invalid_email_is_the_only_error() {
    let mut form = contact_form(&Settings::default(), 5);
    form.merge(&submission(
        "",
        &[("name", "Ann"), ("email", "bad"), ("message", "hi")],
    ))
    .validate();

    let errors = form.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["email"], "Email must be a valid email.");
    assert_eq!(form.state(), SubmissionState::Invalid);
}

#[test]
fn test_spam_short_circuits_field_rules() {
    let mut form = contact_form(&Settings::default(), 5);
    form.merge(&submission("spammer", &[("name", "Ann")])).validate();

    assert_eq!(form.state(), SubmissionState::Invalid);
    assert_eq!(form.spam_reason(), Some(SpamReason::HoneypotTriggered));
    assert!(form.has_error("form"));
    assert!(!form.has_error("message"));
    assert_eq!(form.error_message(), "Something went wrong");
}

#[test]
fn test_missing_honeypot_keys_are_tampering() {
    let mut form = contact_form(&Settings::default(), 0);
    let payload: Payload = good_fields()
        .into_iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect();
    form.merge(&payload).validate();
    assert_eq!(form.spam_reason(), Some(SpamReason::TamperedPayload));
}

#[test]
fn test_configured_delay_applies() {
    let mut settings = Settings::default();
    settings.honeypot.min_delay_secs = 30;
    let mut form = contact_form(&settings, 10);
    form.merge(&submission("", &good_fields())).validate();
    assert_eq!(form.spam_reason(), Some(SpamReason::SubmittedTooFast));
}

#[test]
fn test_correction_makes_form_valid() {
    let mut form = contact_form(&Settings::default(), 5);
    form.merge(&submission("", &[("name", "Ann")])).validate();
    assert!(form.has_error("email"));
    assert!(form.has_error("message"));

    form.merge(&submission("", &good_fields())).validate();
    assert!(form.is_valid());
    assert!(form.errors().is_empty());
}

#[test]
fn test_optional_empty_fields_still_checked() {
    let mut form = Form::post("/contact")
        .without_honeypot()
        .field(FieldSpec::new(FieldKind::Email).name("email"))
        .unwrap()
        .field(FieldSpec::new(FieldKind::Text).name("code").min_length(5))
        .unwrap();

    let payload: Payload = [("email", ""), ("code", "")]
        .iter()
        .map(|(k, v)| ((*k).to_string(), Some((*v).to_string())))
        .collect();
    form.merge(&payload).validate();

    assert_eq!(form.state(), SubmissionState::Invalid);
    assert!(form.has_error("email"));
    assert!(form.has_error("code"));
}

// ============================================================================
// 3. Delivery
// ============================================================================

#[test]
fn test_delivery_success() {
    let mut form = contact_form(&Settings::default(), 5);
    form.merge(&submission("", &good_fields())).validate();

    let transport = StubTransport::default();
    form.deliver(&transport, &MailSettings::default()).unwrap();

    assert_eq!(transport.sent(), 1);
    assert_eq!(form.state(), SubmissionState::Sent);
    assert!(form.fields().is_empty());
    assert!(form.is_terminal());
    assert_eq!(form.error_message(), "");
    assert!(form.render().contains("data-form-success"));

    form.merge(&submission("", &good_fields()));
    assert!(form.fields().is_empty());
}

#[test]
fn test_delivery_failure_in_debug() {
    let settings = Settings {
        debug: true,
        ..Settings::default()
    };
    let mut form = contact_form(&settings, 5);
    form.merge(&submission("", &good_fields())).validate();

    let transport = StubTransport::failing(MailError::new("quota exceeded"));
    form.deliver(&transport, &settings.mail).unwrap();

    assert_eq!(form.state(), SubmissionState::Rejected);
    assert_eq!(form.error_message(), "quota exceeded");
    assert!(form.fields().iter().all(|f| f.is_disabled()));
    assert!(form
        .fields()
        .iter()
        .all(|f| f.kind() != FieldKind::Submit));
}

#[test]
fn test_delivery_failure_in_production() {
    let settings = Settings {
        debug: false,
        ..Settings::default()
    };
    let mut form = contact_form(&settings, 5);
    form.merge(&submission("", &good_fields())).validate();

    let transport = StubTransport::failing(MailError::new("quota exceeded"));
    form.deliver(&transport, &settings.mail).unwrap();

    assert_eq!(
        form.error_message(),
        "Sorry, mailer failed to send your message."
    );
}

#[test]
fn test_invalid_form_cannot_be_delivered() {
    let mut form = contact_form(&Settings::default(), 5);
    form.merge(&submission("", &[])).validate();
    let transport = StubTransport::default();
    assert!(form.deliver(&transport, &MailSettings::default()).is_err());
    assert_eq!(transport.sent(), 0);
}

#[test]
fn test_reload_after_redirect_signals() {
    let mut form = contact_form(&Settings::default(), 0);
    form.signal(ExternalSignal::Success);
    assert_eq!(form.success_message(), Some("Thank you for your message"));

    let mut form = contact_form(&Settings::default(), 0);
    form.signal(ExternalSignal::Rejected);
    assert!(form.is_terminal());
    assert!(form.render().contains("disabled"));
}
