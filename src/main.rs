use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use agenda::config::AppConfig;
use agenda::handlers;
use agenda::services::scheduling::webhook::WebhookBackend;
use agenda::services::scheduling::SchedulingBackend;
use agenda::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let backend: Arc<dyn SchedulingBackend> = match config.request_timeout {
        Some(timeout) => {
            tracing::info!(
                url = %config.webhook_url,
                timeout_secs = timeout.as_secs(),
                "using scheduling webhook"
            );
            Arc::new(WebhookBackend::with_timeout(config.webhook_url.clone(), timeout)?)
        }
        None => {
            tracing::info!(url = %config.webhook_url, "using scheduling webhook (no timeout)");
            Arc::new(WebhookBackend::new(config.webhook_url.clone()))
        }
    };

    let state = Arc::new(AppState::new(config, backend));
    let addr = format!("0.0.0.0:{}", state.config.port);
    let app = handlers::router(state);

    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
