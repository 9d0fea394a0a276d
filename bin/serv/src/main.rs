use std::net::SocketAddr;

use axum::{Router, routing::get};
use opo_api::{ApiConfig, ApiState, metrics, middleware as api_middleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    opo_api::tracing::init_tracing(config.env);

    let metrics_handle = metrics::init_metrics()?;

    if config.run_migrations && opo_db::create_database_if_missing(&config.database_url).await? {
        tracing::info!("Created missing database");
    }
    let pool = opo_db::create_pool(&config.database_url, config.database_max_connections).await?;
    if config.run_migrations {
        opo_db::migrate(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let state = ApiState::new(&config, pool.clone())?;

    let job_handles = opo_api::jobs::start_background_jobs(pool, config.history_retention_days);
    tracing::info!(jobs = job_handles.len(), "Background jobs started");

    // Scraped by Prometheus, kept out of the /api tree
    let metrics_app = Router::new()
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = opo_api::router::router()
        .merge(metrics_app)
        .with_state(state);
    let app = api_middleware::apply_http_layers(app, config.parsed_allowed_origins(), config.env);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        environment = ?config.env,
        generator = ?config.generator_provider,
        "OpoQuiz API listening"
    );

    // The rate limiter falls back to the peer address when no proxy header is set
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    for handle in job_handles {
        handle.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
