use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use adboard_api::auth::SupabaseAuth;
use adboard_api::config::{AppConfig, Environment};
use adboard_api::database::PgStore;
use adboard_api::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "adboard-api", version, about = "Ad performance dashboard API server")]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (overrides ADBOARD_API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let environment = Environment::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(environment.default_log_filter())),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        "Starting adboard-api in {:?} mode (guard {:?}, delete policy {:?})",
        config.environment,
        config.guard.mode,
        config.connections.delete_missing
    );

    let store = PgStore::connect_lazy(&config.store).context("failed to create database pool")?;
    let auth = SupabaseAuth::new(&config.store.url, config.store.anon_key.clone());
    let port = args.port.unwrap_or(config.api.port);

    let state = AppState::new(config, Arc::new(auth), Arc::new(store.clone()), Arc::new(store.clone()));
    let app = adboard_api::app(state);

    let bind_addr = format!("{}:{}", args.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("adboard-api listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
