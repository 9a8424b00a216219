//! Settings for contactform-rs.
//!
//! [`Settings`] holds everything a deployment tunes: debug mode, logging,
//! the honeypot thresholds, user-facing messages, and the mail envelope.
//! Unlike a process-wide settings singleton, a `Settings` value is always
//! passed explicitly to the code that needs it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Honeypot spam-check configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoneypotSettings {
    /// Whether new forms get the honeypot pair by default.
    pub enabled: bool,
    /// Name of the decoy field that must arrive empty.
    pub decoy_field: String,
    /// Name of the field carrying the render timestamp (Unix seconds).
    pub timestamp_field: String,
    /// Minimum number of seconds between render and submission.
    pub min_delay_secs: u64,
}

impl HoneypotSettings {
    /// Returns the minimum delay as a [`Duration`].
    pub const fn min_delay(&self) -> Duration {
        Duration::from_secs(self.min_delay_secs)
    }
}

impl Default for HoneypotSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            decoy_field: "my_name".to_string(),
            timestamp_field: "request".to_string(),
            min_delay_secs: 3,
        }
    }
}

/// User-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSettings {
    /// Shown for every spam verdict, whatever the underlying reason.
    pub spam: String,
    /// Shown once the message has been delivered.
    pub success: String,
    /// Shown when the mail transport failed outside debug mode.
    pub mailer_failed: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            spam: "Something went wrong".to_string(),
            success: "Thank you for your message".to_string(),
            mailer_failed: "Sorry, mailer failed to send your message.".to_string(),
        }
    }
}

/// Outbound mail configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    /// The mail backend: `"console"`, `"file"`, or `"memory"`.
    pub backend: String,
    /// Directory used by the file backend.
    pub file_path: Option<PathBuf>,
    /// Recipient address for submitted messages.
    pub to: String,
    /// Recipient display name.
    pub to_name: String,
    /// Sender address.
    pub from: String,
    /// Sender display name, also used in the subject line.
    pub from_name: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            backend: "console".to_string(),
            file_path: None,
            to: "webmaster@localhost".to_string(),
            to_name: String::new(),
            from: "noreply@localhost".to_string(),
            from_name: "Contact Form".to_string(),
        }
    }
}

/// The complete set of settings.
///
/// # Examples
///
/// ```
/// use contactform_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.honeypot.min_delay_secs, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. In debug mode mail failures show the
    /// transport's own message.
    pub debug: bool,
    /// Deployment environment name (e.g. "development", "production").
    pub environment: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Forms ────────────────────────────────────────────────────────

    /// Honeypot configuration.
    pub honeypot: HoneypotSettings,
    /// User-facing messages.
    pub messages: MessageSettings,

    // ── Mail ─────────────────────────────────────────────────────────

    /// Outbound mail configuration.
    pub mail: MailSettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Settings {
    /// Returns `true` when running in the production environment.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            honeypot: HoneypotSettings::default(),
            messages: MessageSettings::default(),
            mail: MailSettings::default(),
            extra: HashMap::new(),
        }
    }
}
