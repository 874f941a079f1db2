mod app;
mod client;
mod config;
mod error;
mod local_state;
mod session_store;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // Log to a file: ratatui owns the terminal for the whole run.
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
