use std::process::ExitCode;

use bracewise::driver::{self, Host, HostMessage};
use bracewise::{discover_settings, Document, Editor, TextBuffer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("bracewise: cannot read current directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (settings, root) = match discover_settings(&cwd) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("bracewise: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr; stdout carries state summaries.
    tracing_subscriber::fmt()
        .with_max_level(settings.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = match settings.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(root = %root.display(), "bracewise started");

    let (message_tx, message_rx) = mpsc::channel(64);
    let (summary_tx, mut summary_rx) = mpsc::channel(64);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HostMessage>(&line) {
                Ok(message) => {
                    if message_tx.send(message).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, line = %line, "ignoring malformed message"),
            }
        }
        debug!("stdin closed");
    });

    let writer = tokio::spawn(async move {
        while let Some(summary) = summary_rx.recv().await {
            match serde_json::to_string(&summary) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!(error = %e, "failed to encode summary"),
            }
        }
    });

    let host = Host::new(Editor::new(config), TextBuffer::new());
    let host = driver::run(host, message_rx, summary_tx).await;
    debug!(length = host.buffer.text().chars().count(), "driver stopped");

    reader.abort();
    if let Err(e) = writer.await {
        warn!(error = %e, "summary writer failed");
    }
    ExitCode::SUCCESS
}
