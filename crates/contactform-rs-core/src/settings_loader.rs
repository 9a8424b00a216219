//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file, deep-merged over the defaults.
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `CONTACTFORM_DEBUG` | `debug` |
//! | `CONTACTFORM_ENVIRONMENT` | `environment` |
//! | `CONTACTFORM_LOG_LEVEL` | `log_level` |
//! | `CONTACTFORM_HONEYPOT_MIN_DELAY` | `honeypot.min_delay_secs` |
//! | `CONTACTFORM_MAIL_BACKEND` | `mail.backend` |
//! | `CONTACTFORM_MAIL_FILE_PATH` | `mail.file_path` |
//! | `CONTACTFORM_MAIL_TO` | `mail.to` |
//! | `CONTACTFORM_MAIL_TO_NAME` | `mail.to_name` |
//! | `CONTACTFORM_MAIL_FROM` | `mail.from` |
//! | `CONTACTFORM_MAIL_FROM_NAME` | `mail.from_name` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use contactform_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("contact.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::FormsError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any key missing from the TOML keeps its default value, including keys
/// inside nested tables such as `[honeypot]`.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormsError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormsError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `CONTACTFORM_*` environment variable overrides to a settings struct.
///
/// Unparseable numeric values are ignored and leave the setting unchanged.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("CONTACTFORM_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("CONTACTFORM_ENVIRONMENT") {
        settings.environment = val;
    }

    if let Ok(val) = std::env::var("CONTACTFORM_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("CONTACTFORM_HONEYPOT_MIN_DELAY") {
        if let Ok(secs) = val.parse::<u64>() {
            settings.honeypot.min_delay_secs = secs;
        }
    }

    if let Ok(val) = std::env::var("CONTACTFORM_MAIL_BACKEND") {
        settings.mail.backend = val;
    }

    if let Ok(val) = std::env::var("CONTACTFORM_MAIL_FILE_PATH") {
        settings.mail.file_path = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("CONTACTFORM_MAIL_TO") {
        settings.mail.to = val;
    }

    if let Ok(val) = std::env::var("CONTACTFORM_MAIL_TO_NAME") {
        settings.mail.to_name = val;
    }

    if let Ok(val) = std::env::var("CONTACTFORM_MAIL_FROM") {
        settings.mail.from = val;
    }

    if let Ok(val) = std::env::var("CONTACTFORM_MAIL_FROM_NAME") {
        settings.mail.from_name = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, FormsError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormsError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, FormsError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormsError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FormsError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = true
            environment = "production"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(settings.debug);
        assert!(settings.is_production());
        // Defaults preserved
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.honeypot.decoy_field, "my_name");
    }

    #[test]
    fn test_from_toml_str_nested_table_keeps_defaults() {
        let toml = r#"
            [honeypot]
            min_delay_secs = 10
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.honeypot.min_delay_secs, 10);
        assert!(settings.honeypot.enabled);
        assert_eq!(settings.honeypot.timestamp_field, "request");
    }

    #[test]
    fn test_from_toml_str_mail() {
        let toml = r#"
            [mail]
            backend = "file"
            file_path = "/tmp/mail"
            to = "owner@example.com"
            from_name = "Acme"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.mail.backend, "file");
        assert_eq!(settings.mail.file_path, Some(PathBuf::from("/tmp/mail")));
        assert_eq!(settings.mail.to, "owner@example.com");
        assert_eq!(settings.mail.from_name, "Acme");
        assert_eq!(settings.mail.from, "noreply@localhost");
    }

    #[test]
    fn test_from_toml_str_messages() {
        let toml = r#"
            [messages]
            success = "Thanks!"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.messages.success, "Thanks!");
        assert_eq!(settings.messages.spam, "Something went wrong");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(!settings.debug);
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("this is not [valid toml");
        assert!(matches!(result, Err(FormsError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"maybe\"");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{"debug": true, "mail": {"to": "sales@example.com"}}"#;
        let settings = from_json_str(json).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.mail.to, "sales@example.com");
        assert_eq!(settings.mail.backend, "console");
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert!(!settings.debug);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contact.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contact.json");
        std::fs::write(&path, r#"{"environment": "staging"}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.environment, "staging");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/contact.toml");
        assert!(matches!(result, Err(FormsError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_json_file_missing() {
        assert!(from_json_file("/nonexistent/path/contact.json").is_err());
    }

    // ── Environment variable overrides ──────────────────────────────
    //
    // Each test owns its variables so parallel tests never observe each
    // other's overrides.

    #[test]
    fn test_apply_env_overrides_debug() {
        let mut settings = Settings::default();
        std::env::set_var("CONTACTFORM_DEBUG", "false");
        apply_env_overrides(&mut settings);
        assert!(!settings.debug);
        std::env::set_var("CONTACTFORM_DEBUG", "1");
        apply_env_overrides(&mut settings);
        assert!(settings.debug);
        std::env::remove_var("CONTACTFORM_DEBUG");
    }

    #[test]
    fn test_apply_env_overrides_min_delay() {
        let mut settings = Settings::default();
        std::env::set_var("CONTACTFORM_HONEYPOT_MIN_DELAY", "7");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.honeypot.min_delay_secs, 7);

        std::env::set_var("CONTACTFORM_HONEYPOT_MIN_DELAY", "soon");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.honeypot.min_delay_secs, 7);
        std::env::remove_var("CONTACTFORM_HONEYPOT_MIN_DELAY");
    }

    #[test]
    fn test_apply_env_overrides_mail() {
        let mut settings = Settings::default();
        std::env::set_var("CONTACTFORM_MAIL_TO", "env@example.com");
        std::env::set_var("CONTACTFORM_MAIL_FILE_PATH", "/var/mail/contact");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.mail.to, "env@example.com");
        assert_eq!(
            settings.mail.file_path,
            Some(PathBuf::from("/var/mail/contact"))
        );
        std::env::remove_var("CONTACTFORM_MAIL_TO");
        std::env::remove_var("CONTACTFORM_MAIL_FILE_PATH");
    }

    #[test]
    fn test_toml_with_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contact_env.toml");
        std::fs::write(&path, "[mail]\nfrom_name = \"Toml Name\"\n").unwrap();

        std::env::set_var("CONTACTFORM_MAIL_FROM_NAME", "Env Name");
        let settings = from_toml_file_with_env(&path).unwrap();
        assert_eq!(settings.mail.from_name, "Env Name");
        std::env::remove_var("CONTACTFORM_MAIL_FROM_NAME");
    }

    // ── merge_json helper ───────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_merge_json_array_override() {
        let base = serde_json::json!({"list": [1, 2, 3]});
        let over = serde_json::json!({"list": [4, 5]});
        let merged = merge_json(base, over);
        assert_eq!(merged["list"], serde_json::json!([4, 5]));
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["nested"]["key"], "value");
    }
}
