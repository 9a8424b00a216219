//! # contactform-rs Contact Page Demo
//!
//! Serves a single contact form with the full submission pipeline:
//!
//! - **Settings**: loaded from a TOML or JSON file, then `CONTACTFORM_*` env vars
//! - **Logging**: pretty output in debug mode, JSON otherwise
//! - **Mail**: the backend named in `[mail]` (console, file, or memory)
//! - **HTTP**: `GET` renders the form, `POST` validates and delivers it
//!
//! ## Running
//!
//! ```bash
//! cargo run --package contact-demo -- --config demos/contact/contact.toml
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use contactform_rs_core::logging::setup_logging;
use contactform_rs_core::{settings_loader, FormsError, FormsResult, Settings};
use contactform_rs_http::{router, ContactState};
use contactform_rs_mail::get_transport;

/// Serve a contact form.
#[derive(Debug, Parser)]
#[command(name = "contact-demo", version, about)]
struct Args {
    /// Settings file (`.toml` or `.json`). Defaults plus env vars when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    addr: String,

    /// URL path the form is served at.
    #[arg(long, default_value = "/")]
    path: String,
}

fn load_settings(config: Option<&Path>) -> FormsResult<Settings> {
    match config {
        Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
            settings_loader::from_json_file_with_env(path)
        }
        Some(path) => settings_loader::from_toml_file_with_env(path),
        None => Ok(settings_loader::from_env()),
    }
}

#[tokio::main]
async fn main() -> FormsResult<()> {
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    setup_logging(&settings);
    tracing::info!(
        environment = %settings.environment,
        debug = settings.debug,
        backend = %settings.mail.backend,
        "Contact demo configured"
    );

    let transport = get_transport(&settings.mail)?;
    let state = ContactState::new(settings, transport).with_path(args.path.clone());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to bind to {}: {e}", args.addr)))?;
    tracing::info!("Serving contact form at http://{}{}", args.addr, args.path);

    axum::serve(listener, app).await?;
    Ok(())
}
