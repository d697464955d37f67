//! CLI module for threadpeek.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - The preview, compose and post commands
//!
//! # Usage
//!
//! ```ignore
//! use threadpeek::cli::{connect_from_env, parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! match run_cli_command(command, connect_from_env).await {
//!     Ok(output) => print!("{}", output),
//!     Err(e) => {
//!         eprintln!("{}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use std::path::Path;
use std::sync::Arc;

use crate::adapters::ReqwestHttpClient;
use crate::compose::compose;
use crate::config::PeekConfig;
use crate::entry::EntryClient;
use crate::error::{PeekError, PeekResult};
use crate::models::DayEntry;
use crate::preview::{render_error, render_thread, ICON_READY};
use crate::publish::Publisher;
use crate::resolver::ImageResolver;
use crate::session::{PreviewSession, SessionState};
use crate::traits::HttpClient;

/// Configuration and HTTP client for the commands that reach the network.
pub type Connection = (PeekConfig, Arc<dyn HttpClient>);

/// Run a CLI command and return the text to print on stdout.
///
/// `connect` is only called for `preview` and `post`, so the offline commands
/// work whatever state the environment is in.
pub async fn run_cli_command<F>(command: CliCommand, connect: F) -> PeekResult<String>
where
    F: FnOnce() -> PeekResult<Connection>,
{
    match command {
        CliCommand::Version => Ok(format!("{}\n", version_line())),
        CliCommand::Help => Ok(format!("{}\n", USAGE)),
        CliCommand::Invalid(reason) => Err(PeekError::Usage(reason)),
        CliCommand::Compose { path } => compose_file(&path),
        CliCommand::Preview { day } => {
            let (config, client) = connect()?;
            preview_day(day, &config, client).await
        }
        CliCommand::Post { text } => {
            let (config, client) = connect()?;
            post_text(&text, &config, client).await
        }
    }
}

/// Read `THREADPEEK_*` and build the production HTTP client.
pub fn connect_from_env() -> PeekResult<Connection> {
    let config = PeekConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    let client = http_client(&config)?;
    Ok((config, client))
}

/// Production HTTP client honouring the configured request timeout.
pub fn http_client(config: &PeekConfig) -> PeekResult<Arc<dyn HttpClient>> {
    let client = ReqwestHttpClient::with_timeout(config.request_timeout)?;
    Ok(Arc::new(client))
}

/// Fetch, compose and fully resolve the thread for `day`.
///
/// Entry fetch failures are returned unchanged so the caller can print them
/// verbatim. Image failures stay inside the rendered preview.
pub async fn preview_day(
    day: u32,
    config: &PeekConfig,
    client: Arc<dyn HttpClient>,
) -> PeekResult<String> {
    config.validate()?;

    let entries = EntryClient::new(Arc::clone(&client), config.entry_api_base.clone());
    let resolver = ImageResolver::new(client, config.image_proxy_base.clone());
    let mut session = PreviewSession::new(entries, resolver);
    let heading = format!("DAY {}", day);

    session.select_day(day).await;
    match std::mem::take(session.state_mut()) {
        SessionState::Loaded(mut thread) => {
            let states = thread.settle_all().await;
            Ok(render_thread(
                &heading,
                &thread.entry.meta,
                &thread.units,
                &states,
            ))
        }
        SessionState::Failed { error, .. } => Err(error.into()),
        SessionState::Idle | SessionState::Loading { .. } => {
            Ok(render_error(&heading, "No entry loaded"))
        }
    }
}

/// Compose an entry stored in a local JSON file. No network access.
pub fn compose_file(path: &Path) -> PeekResult<String> {
    let raw = std::fs::read(path).map_err(|source| PeekError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entry =
        DayEntry::from_response_body(&raw).map_err(|source| PeekError::InvalidEntryFile {
            path: path.to_path_buf(),
            source,
        })?;

    let units = compose(Some(&entry));
    let heading = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(render_thread(&heading, &entry.meta, &units, &[]))
}

/// Publish a single text post.
pub async fn post_text(
    text: &str,
    config: &PeekConfig,
    client: Arc<dyn HttpClient>,
) -> PeekResult<String> {
    let publisher = Publisher::new(
        client,
        config.posting_endpoint.clone(),
        config.bearer_token.clone(),
    );
    let receipt = publisher.post_text(text).await?;
    Ok(match receipt.id {
        Some(id) => format!("{} Posted ({})\n", ICON_READY, id),
        None => format!("{} Posted\n", ICON_READY),
    })
}
