// ABOUTME: HTTP server bootstrap for Scansheet
// ABOUTME: Logging setup, middleware stack, optional static client, and graceful shutdown

use axum::http::{header::CONTENT_TYPE, Method};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use scansheet_api::{create_api_router, DbState};

use crate::config::{Config, ConfigError};

pub const DEFAULT_LOG_FILTER: &str = "scansheet=info,tower_http=info";

/// Install the global tracing subscriber, honoring `RUST_LOG`
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second init (tests, repeated runs in one process) is not an error
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Build the full application: API routes, CORS, request tracing, and the
/// static client when one is configured
pub fn build_app(state: DbState, config: &Config) -> Result<Router, ConfigError> {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin_header()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let mut app = create_api_router(state);

    if let Some(dir) = config.validated_static_dir()? {
        info!("Serving client from {}", dir.display());
        // Unknown paths fall back to index.html for client-side routing
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}

/// Open the database and serve until Ctrl+C or SIGTERM
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("Opening database at {}", config.database_path.display());
    let state = DbState::init(&config.pool_settings()).await?;

    let app = build_app(state.clone(), &config)?;

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Scansheet listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.pool.close().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
