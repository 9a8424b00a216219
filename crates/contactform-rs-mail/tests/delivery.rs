//! Integration tests: forms delivered through the real backends.

use std::sync::Arc;

use contactform_rs_core::settings::MailSettings;
use contactform_rs_forms::{Form, MailError, Payload, SubmissionState};
use contactform_rs_mail::{FileBackend, InMemoryBackend};

fn valid_form() -> Form {
    let mut form = Form::post("/")
        .without_honeypot()
        .name(true)
        .unwrap()
        .email(true)
        .unwrap()
        .message(true)
        .unwrap();
    let payload: Payload = [
        ("name", "Ann"),
        ("email", "ann@example.com"),
        ("message", "Please call me back."),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Some(v.to_string())))
    .collect();
    form.merge(&payload).validate();
    assert!(form.is_valid());
    form
}

fn mail_settings() -> MailSettings {
    MailSettings {
        to: "sales@example.com".into(),
        to_name: "Sales".into(),
        from: "web@example.com".into(),
        from_name: "Example Ltd".into(),
        ..MailSettings::default()
    }
}

#[test]
fn test_in_memory_delivery_composes_message() {
    let backend = InMemoryBackend::new();
    let mut form = valid_form();
    form.deliver(&backend, &mail_settings()).unwrap();

    assert_eq!(form.state(), SubmissionState::Sent);
    let messages = backend.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].subject, "Contact Example Ltd from Ann");
    assert_eq!(messages[0].recipient.to_string(), "Sales <sales@example.com>");
    assert_eq!(messages[0].body, "Please call me back.");
}

#[test]
fn test_failing_backend_rejects_form() {
    let backend = InMemoryBackend::failing(MailError::new("rate limited").with_code(429));
    let mut form = valid_form();
    form.deliver(&backend, &mail_settings()).unwrap();

    assert_eq!(form.state(), SubmissionState::Rejected);
    assert_eq!(
        form.error_message(),
        "429: Sorry, mailer failed to send your message."
    );
}

#[test]
fn test_file_delivery_through_shared_transport() {
    let dir = tempfile::tempdir().unwrap();
    let transport: Arc<dyn contactform_rs_forms::MailTransport> =
        Arc::new(FileBackend::new(dir.path()));

    let mut form = valid_form();
    form.deliver(transport.as_ref(), &mail_settings()).unwrap();
    assert_eq!(form.state(), SubmissionState::Sent);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
