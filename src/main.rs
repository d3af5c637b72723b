use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use inkpot::api::auth::AuthContext;
use inkpot::client::ApiClient;
use inkpot::commands::{self, App};
use inkpot::config::{Cli, Config};
use inkpot::session::{SessionState, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Rehydrate the session from disk; no network call happens here.
    let store = Arc::new(SessionStore::open(&data_dir));
    let client = Arc::new(ApiClient::new(&config.api, store.clone())?);
    let auth = AuthContext::new(client.clone(), store.clone());

    // The shell observes the session so a forced teardown is reported
    // explicitly instead of being buried in transport errors.
    let session_events = store.subscribe();

    let app = App {
        client,
        store: store.clone(),
        auth,
    };
    let result = commands::run(&app, cli.command).await;

    if *session_events.borrow() == SessionState::Invalidated {
        eprintln!("Session expired, please log in again.");
    }

    result
}
