//! # contactform-rs-core
//!
//! Core types shared by every contactform-rs crate: the error enum, the
//! settings struct and its loaders, and tracing setup.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings with defaults for honeypot, messages, and mail
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FormsError, FormsResult};
pub use settings::Settings;
