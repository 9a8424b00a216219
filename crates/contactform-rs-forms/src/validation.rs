//! Validation pipeline for form submissions.
//!
//! Field rules run independently per field and stop at the first failing
//! rule, so each field carries at most one message:
//!
//! 1. required and empty -> `"<Label> is required."`
//! 2. email kind and malformed -> `"<Label> must be a valid email."`
//! 3. longer than `max_length` -> `"<Label> must not exceed N characters"`
//! 4. shorter than `min_length` -> `"<Label> must not be less than N characters"`
//!
//! Hidden fields are exempt. A missing value is checked as the empty
//! string, so an optional email field left empty still fails rule 2 and an
//! empty value is shorter than any positive `min_length`. Lengths count
//! characters, not bytes.
//!
//! The honeypot check and the short-circuit around it live on
//! [`Form::validate`](crate::form::Form::validate); this module owns the
//! per-field rules and the error map rebuild.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use contactform_rs_core::settings::MessageSettings;

use crate::field::{Field, FieldKind};
use crate::honeypot::SpamReason;
use crate::state::SubmissionState;

/// Error messages keyed by field name, plus the reserved keys
/// [`FORM_KEY`] and [`MAILER_KEY`].
pub type ErrorMap = BTreeMap<String, String>;

/// Key for form-level errors such as spam verdicts.
pub const FORM_KEY: &str = "form";

/// Key for mail transport failures.
pub const MAILER_KEY: &str = "mailer";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$")
        .expect("valid regex")
});

/// Returns `true` if `value` is shaped like an email address.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value) && !value.contains("..")
}

/// Evaluates one field's rules and returns the first failure, if any.
pub fn field_error(field: &Field) -> Option<String> {
    if field.kind() == FieldKind::Hidden {
        return None;
    }

    let label = field.display_label();

    let value = field.value().unwrap_or_default();
    if field.is_required() && value.is_empty() {
        return Some(format!("{label} is required."));
    }

    if field.kind() == FieldKind::Email && !is_valid_email(value) {
        return Some(format!("{label} must be a valid email."));
    }

    let length = value.chars().count();
    if let Some(max) = field.max_length() {
        if length > max {
            return Some(format!("{label} must not exceed {max} characters"));
        }
    }
    if let Some(min) = field.min_length() {
        if length < min {
            return Some(format!("{label} must not be less than {min} characters"));
        }
    }

    None
}

/// Runs every field's rules and stores the outcome on the field, clearing
/// errors from earlier runs.
pub fn validate_fields(fields: &mut [Field]) {
    for field in fields {
        let error = field_error(field);
        field.set_error(error);
    }
}

/// Clears every field error without evaluating rules.
pub fn clear_field_errors(fields: &mut [Field]) {
    for field in fields {
        field.set_error(None);
    }
}

/// Rebuilds the error map from scratch.
///
/// Later sources overwrite earlier ones under the same key:
///
/// 1. a synthetic [`MAILER_KEY`] entry when the form is rejected
/// 2. every named field carrying an error
/// 3. the generic spam message under [`FORM_KEY`] when a spam verdict stands
/// 4. explicitly added errors
///
/// The function only reads its inputs, so calling it twice without
/// re-validating yields identical maps.
pub fn collect_errors(
    state: SubmissionState,
    fields: &[Field],
    spam: Option<SpamReason>,
    added: &ErrorMap,
    messages: &MessageSettings,
) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if state == SubmissionState::Rejected {
        errors.insert(MAILER_KEY.to_string(), messages.mailer_failed.clone());
    }

    for field in fields {
        if let (Some(name), Some(error)) = (field.name(), field.error()) {
            errors.insert(name.to_string(), error.to_string());
        }
    }

    if spam.is_some() {
        errors.insert(FORM_KEY.to_string(), messages.spam.clone());
    }

    errors.extend(added.iter().map(|(k, v)| (k.clone(), v.clone())));
    errors
}
