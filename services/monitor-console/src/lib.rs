//! Monitor console - administration client for the recruit monitor server
//!
//! Logs in with the administrator password, loads and saves the server's
//! monitor/notification configuration, and polls its status endpoint.

pub mod api;
pub mod authenticator;
pub mod config;
pub mod console;
pub mod envelope;
pub mod error;
pub mod form;
pub mod io;
pub mod notice;
pub mod poller;
pub mod prompt;
pub mod session;
pub mod shell;
pub mod synchronizer;

pub use config::{load_config, Config};
pub use console::{Console, ConsoleState};
pub use error::{ConsoleError, Result};

use std::sync::Arc;

use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::notice::TerminalNotices;
use crate::prompt::TerminalPrompt;

/// Run the interactive console with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http = Arc::new(ReqwestHttpClient::with_timeout(
        config.server.request_timeout(),
    )?);
    let cancel = CancellationToken::new();

    let console = Console::new(
        &config,
        http,
        Arc::new(TerminalPrompt::default()),
        Arc::new(TerminalNotices),
        cancel.clone(),
    );

    tracing::info!("Connecting to {}", config.server.base_url);
    let poll_handle = console.start().await?;

    // Installed after login so Ctrl-C during the password prompt still exits
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
        }
        cancel_for_signal.cancel();
    });

    let input = BufReader::new(tokio::io::stdin());
    let result = shell::run_shell(&console, input, tokio::io::stdout(), cancel.clone()).await;

    cancel.cancel();
    poll_handle.shutdown().await;
    tracing::info!("Console stopped");

    result
}
