use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use salon::config::AppConfig;
use salon::handlers;
use salon::services::sessions::spawn_pruner;
use salon::services::sink::LogSink;
use salon::services::wizard::SystemClock;
use salon::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!(
        business = %config.business_name,
        submit_delay_ms = config.submit_delay_ms,
        session_ttl_minutes = config.session_ttl_minutes,
        max_sessions = config.max_sessions,
        "reservations are recorded to the log"
    );
    let sink = LogSink::new(config.business_name.clone());

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(SystemClock),
        Arc::new(sink),
    ));

    spawn_pruner(state.clone(), Duration::from_secs(60));

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
