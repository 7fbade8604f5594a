use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::prelude::*;

use scambait::{AppState, Config, GeminiClient, router};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Held for the life of the process so buffered file logs get flushed.
    let _guard = init_logging(&config);

    info!("🚀 Starting scambait...");
    info!("Model: {} via {}", config.gemini.model, config.gemini.api_base);

    let client = match GeminiClient::new(&config.gemini) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Gemini client: {e}");
            std::process::exit(1);
        }
    };
    let app = router(AppState::new(Arc::new(client)));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };
    info!("Listening on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }
    info!("Shut down");
}

fn init_logging(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        );

    let Some(ref log_dir) = config.log_dir else {
        tracing_subscriber::registry().with(stdout_layer).init();
        return None;
    };

    std::fs::create_dir_all(log_dir).ok();
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("scambait.log"))
    {
        Ok(file) => file,
        Err(e) => {
            tracing_subscriber::registry().with(stdout_layer).init();
            error!("Failed to open log file in {}: {e}", log_dir.display());
            return None;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    Some(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received, shutting down");
}
