//! Background jobs for periodic maintenance tasks.
//!
//! The question history only needs the last few entries per user and topic,
//! and abandoned test sessions would otherwise stay open forever.

use std::time::Duration;

use opo_db::repositories::{question as question_repo, session as session_repo};
use sqlx::PgPool;
use tokio::time::interval;

use crate::metrics;

/// Start all background jobs
///
/// Returns a vector of join handles that can be aborted on shutdown
pub fn start_background_jobs(
    pool: PgPool,
    history_retention_days: i32,
) -> Vec<tokio::task::JoinHandle<()>> {
    vec![
        tokio::spawn(periodic_history_prune_job(pool.clone(), history_retention_days)),
        tokio::spawn(periodic_abandoned_sessions_job(pool)),
    ]
}

/// Delete question history older than the retention period, every 6 hours
async fn periodic_history_prune_job(pool: PgPool, retention_days: i32) {
    // Let start-up traffic settle before the first run
    tokio::time::sleep(Duration::from_secs(600)).await;

    let mut interval = interval(Duration::from_secs(21600));

    loop {
        interval.tick().await;

        match question_repo::prune_older_than(&pool, retention_days).await {
            Ok(deleted) => {
                metrics::record_job_run("history_prune", deleted, true);
                if deleted > 0 {
                    tracing::info!(deleted, retention_days, "Pruned question history");
                } else {
                    tracing::debug!("No question history to prune");
                }
            }
            Err(e) => {
                metrics::record_job_run("history_prune", 0, false);
                tracing::error!(error = %e, "Failed to prune question history");
            }
        }
    }
}

/// Close test sessions left open for over a day, every hour
async fn periodic_abandoned_sessions_job(pool: PgPool) {
    tokio::time::sleep(Duration::from_secs(900)).await;

    let mut interval = interval(Duration::from_secs(3600));

    loop {
        interval.tick().await;

        match session_repo::close_abandoned(&pool).await {
            Ok(closed) => {
                metrics::record_job_run("close_abandoned_sessions", closed, true);
                if closed > 0 {
                    tracing::info!(closed, "Closed abandoned test sessions");
                }
            }
            Err(e) => {
                metrics::record_job_run("close_abandoned_sessions", 0, false);
                tracing::error!(error = %e, "Failed to close abandoned test sessions");
            }
        }
    }
}
