//! # contactform-rs-mail
//!
//! Concrete [`MailTransport`] backends and the factory that picks one from
//! settings.
//!
//! ## Backends
//!
//! - [`ConsoleBackend`] - Prints messages to stdout (for development)
//! - [`FileBackend`] - Writes each message to a `.eml` file (for development)
//! - [`InMemoryBackend`] - Collects messages in memory (for testing)

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contactform_rs_core::settings::MailSettings;
use contactform_rs_core::{FormsError, FormsResult};
use contactform_rs_forms::transport::{MailError, MailMessage, MailTransport};

/// A backend that prints messages to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBackend;

impl MailTransport for ConsoleBackend {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let separator = "-".repeat(60);
        println!("{separator}");
        print!("{}", message.format_message());
        println!("{separator}");
        tracing::debug!(subject = %message.subject, "Email printed to console");
        Ok(())
    }
}

/// A backend that writes each message to its own file in a directory.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl FileBackend {
    /// Creates a backend that writes into `dir`, creating it on first send.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Returns the target directory.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl MailTransport for FileBackend {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| MailError::new(e.to_string()))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%f");
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("{timestamp}_{seq}.eml"));

        std::fs::write(&path, message.format_message())
            .map_err(|e| MailError::new(e.to_string()))?;

        tracing::debug!("Email written to {}", path.display());
        Ok(())
    }
}

/// A backend that keeps messages in memory for inspection.
///
/// Clones share the same outbox. A backend built with
/// [`failing`](Self::failing) refuses every message instead.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    messages: Arc<Mutex<Vec<MailMessage>>>,
    failure: Option<MailError>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose every send fails with `error`.
    pub fn failing(error: MailError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Returns a copy of all accepted messages.
    pub fn messages(&self) -> Vec<MailMessage> {
        self.outbox().clone()
    }

    /// Returns the number of accepted messages.
    pub fn message_count(&self) -> usize {
        self.outbox().len()
    }

    /// Clears all stored messages.
    pub fn clear(&self) {
        self.outbox().clear();
    }

    fn outbox(&self) -> MutexGuard<'_, Vec<MailMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MailTransport for InMemoryBackend {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.outbox().push(message.clone());
        Ok(())
    }
}

/// Builds the backend named by `mail.backend`.
///
/// Accepts `"console"`, `"file"` (requires `file_path`), and `"memory"`.
///
/// # Errors
///
/// [`FormsError::ConfigurationError`] for an unknown backend or a file
/// backend without `file_path`, and [`FormsError::MailError`] when the file
/// backend's directory cannot be created.
pub fn get_transport(mail: &MailSettings) -> FormsResult<Arc<dyn MailTransport>> {
    match mail.backend.to_ascii_lowercase().as_str() {
        "console" => Ok(Arc::new(ConsoleBackend)),
        "file" => {
            let dir = mail.file_path.clone().ok_or_else(|| {
                FormsError::ConfigurationError("mail.file_path is required for the file backend".into())
            })?;
            std::fs::create_dir_all(&dir).map_err(|e| {
                FormsError::MailError(format!("cannot prepare outbox {}: {e}", dir.display()))
            })?;
            Ok(Arc::new(FileBackend::new(dir)))
        }
        "memory" | "locmem" => Ok(Arc::new(InMemoryBackend::new())),
        other => Err(FormsError::ConfigurationError(format!(
            "Unknown mail backend: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactform_rs_forms::transport::Mailbox;

    fn sample_message() -> MailMessage {
        MailMessage {
            from: Mailbox::new("noreply@example.com", "Acme"),
            recipient: Mailbox::new("owner@example.com", ""),
            subject: "Contact Acme from Ann".to_string(),
            body: "Hello".to_string(),
            reply_to: Some(Mailbox::new("ann@example.com", "Ann")),
        }
    }

    #[test]
    fn test_console_backend_send() {
        assert!(ConsoleBackend.send(&sample_message()).is_ok());
    }

    #[test]
    fn test_in_memory_backend_collects() {
        let backend = InMemoryBackend::new();
        backend.send(&sample_message()).unwrap();
        backend.send(&sample_message()).unwrap();
        assert_eq!(backend.message_count(), 2);
        assert_eq!(backend.messages()[0].subject, "Contact Acme from Ann");

        backend.clear();
        assert_eq!(backend.message_count(), 0);
    }

    #[test]
    fn test_in_memory_clones_share_outbox() {
        let backend = InMemoryBackend::new();
        let clone = backend.clone();
        clone.send(&sample_message()).unwrap();
        assert_eq!(backend.message_count(), 1);
    }

    #[test]
    fn test_in_memory_failing() {
        let backend = InMemoryBackend::failing(MailError::new("down").with_code(503));
        let err = backend.send(&sample_message()).unwrap_err();
        assert_eq!(err.code, Some(503));
        assert_eq!(backend.message_count(), 0);
    }

    #[test]
    fn test_file_backend_writes_one_file_per_message() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("outbox"));
        backend.send(&sample_message()).unwrap();
        backend.send(&sample_message()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(backend.dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|p| p.extension().is_some_and(|ext| ext == "eml")));

        let content = std::fs::read_to_string(&entries[0]).unwrap();
        assert!(content.contains("Subject: Contact Acme from Ann"));
        assert!(content.contains("Reply-To: Ann <ann@example.com>"));
    }

    #[test]
    fn test_file_backend_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        let backend = FileBackend::new(&blocker);
        assert!(backend.send(&sample_message()).is_err());
    }

    #[test]
    fn test_get_transport_unwritable_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        let file = MailSettings {
            backend: "file".into(),
            file_path: Some(blocker.join("outbox")),
            ..MailSettings::default()
        };
        let err = get_transport(&file).err().unwrap();
        assert!(matches!(err, FormsError::MailError(_)));
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_get_transport() {
        assert!(get_transport(&MailSettings::default()).is_ok());

        let memory = MailSettings {
            backend: "Memory".into(),
            ..MailSettings::default()
        };
        assert!(get_transport(&memory).is_ok());

        let file = MailSettings {
            backend: "file".into(),
            ..MailSettings::default()
        };
        assert!(matches!(
            get_transport(&file),
            Err(FormsError::ConfigurationError(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let file = MailSettings {
            backend: "file".into(),
            file_path: Some(dir.path().join("outbox")),
            ..MailSettings::default()
        };
        assert!(get_transport(&file).is_ok());
        assert!(dir.path().join("outbox").is_dir());

        let unknown = MailSettings {
            backend: "carrier-pigeon".into(),
            ..MailSettings::default()
        };
        let err = get_transport(&unknown).err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
    }
}
