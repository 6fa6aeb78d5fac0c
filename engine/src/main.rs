// Engine main entry point
use engine::config::settings::EngineSettings;
use engine::services::{router, SignalEngine};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; variables may come from the real environment.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting FX signal engine...");

    let settings = EngineSettings::from_env();
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    if settings.model_api_key.is_none() {
        tracing::warn!(
            "GOOGLE_API_KEY is not set; signal requests will fail until it is configured"
        );
    }
    match &settings.csv_data_dir {
        Some(dir) => info!(dir = %dir.display(), "Using CSV market data"),
        None => info!("Using Alpha Vantage market data"),
    }
    info!(
        min_confidence = settings.min_confidence,
        model = %settings.model,
        "Signal gate configured"
    );

    let engine = Arc::new(SignalEngine::from_settings(settings)?);
    let app = router(engine).layer(TraceLayer::new_for_http());

    info!("Engine listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping engine");
}
