use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use souq_db::models::dealership::DealershipFilter;
use souq_db::repositories::DealershipRepo;
use souq_events::{AnalyticsForwarder, EventBus, MeasurementProtocolSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use souq_api::config::ServerConfig;
use souq_api::realtime::RealtimeRouter;
use souq_api::router::build_app_router;
use souq_api::state::AppState;
use souq_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "souq_api=debug,souq_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = souq_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    souq_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    souq_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus and realtime push ---
    let event_bus = Arc::new(EventBus::default());

    let seed = match DealershipRepo::list(&pool, &DealershipFilter::default()).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "Could not seed realtime dealership cache");
            Vec::new()
        }
    };
    let realtime = RealtimeRouter::new(Arc::clone(&ws_manager)).with_dealerships(seed);
    tracing::info!(
        dealerships = realtime.dealerships().len(),
        "Realtime dealership cache seeded"
    );
    let realtime_handle = tokio::spawn(realtime.run(event_bus.subscribe()));

    // --- Analytics ---
    let analytics = match config.analytics.clone() {
        Some(measurement) => match MeasurementProtocolSink::new(measurement) {
            Ok(sink) => {
                tracing::info!("Analytics forwarding enabled");
                AnalyticsForwarder::new(Arc::new(sink))
            }
            Err(e) => {
                tracing::error!(error = %e, "Analytics client failed to build, forwarding disabled");
                AnalyticsForwarder::disabled()
            }
        },
        None => {
            tracing::info!("Analytics not configured, forwarding disabled");
            AnalyticsForwarder::disabled()
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        analytics,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last sender closes the channel and ends the realtime loop.
    drop(event_bus);
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, realtime_handle).await.is_err() {
        tracing::warn!("Realtime router did not stop in time");
    }

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
