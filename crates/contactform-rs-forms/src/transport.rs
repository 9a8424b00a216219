//! The mail transport seam.
//!
//! A form only ever sees [`MailTransport`]: it composes a [`MailMessage`]
//! from its own field values and reacts to the success or failure the
//! transport reports. Concrete backends live in `contactform-rs-mail`.

use std::fmt;

use thiserror::Error;

use contactform_rs_core::settings::MailSettings;

use crate::form::Form;

/// An address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// The email address.
    pub address: String,
    /// The display name.
    pub name: Option<String>,
}

impl Mailbox {
    /// Creates a mailbox. An empty name is treated as no name.
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            address: address.into(),
            name: (!name.is_empty()).then_some(name),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// A composed contact message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// The sender.
    pub from: Mailbox,
    /// Where contact messages go.
    pub recipient: Mailbox,
    /// The subject line.
    pub subject: String,
    /// The plain text body.
    pub body: String,
    /// The visitor, if they left an address.
    pub reply_to: Option<Mailbox>,
}

impl MailMessage {
    /// Builds the message for a submitted contact form.
    ///
    /// Reads the `name`, `email`, and `message` fields. The subject is
    /// `"Contact <from_name> from <name>"`, the body is the message, and
    /// replies go to the visitor's email under their name.
    pub fn compose(form: &Form, mail: &MailSettings) -> Self {
        let name = form.value("name").unwrap_or_default();
        let email = form.value("email").unwrap_or_default();

        Self {
            from: Mailbox::new(mail.from.clone(), mail.from_name.clone()),
            recipient: Mailbox::new(mail.to.clone(), mail.to_name.clone()),
            subject: format!("Contact {} from {name}", mail.from_name),
            body: form.value("message").unwrap_or_default().to_string(),
            reply_to: (!email.is_empty()).then(|| Mailbox::new(email, name)),
        }
    }

    /// Formats the message as readable header lines and a body.
    pub fn format_message(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();
        let _ = writeln!(output, "From: {}", self.from);
        let _ = writeln!(output, "To: {}", self.recipient);
        if let Some(reply_to) = &self.reply_to {
            let _ = writeln!(output, "Reply-To: {reply_to}");
        }
        let _ = writeln!(output, "Subject: {}", self.subject);
        let _ = writeln!(output, "\n{}", self.body);
        output
    }
}

/// A delivery failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MailError {
    /// A provider status code, when the provider supplies one.
    pub code: Option<u16>,
    /// The provider's message.
    pub message: String,
}

impl MailError {
    /// Creates an error without a code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Attaches a provider status code.
    #[must_use]
    pub const fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }
}

/// Delivers composed messages.
///
/// Sending is synchronous from the form's point of view. Timeouts and
/// retries belong to the implementation.
pub trait MailTransport: Send + Sync {
    /// Sends one message.
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}
