pub mod models;
pub mod repositories;

use anyhow::Context;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Create the database named in `database_url` unless it already exists.
///
/// Must run before [`create_pool`], which fails on a missing database. The
/// production database is provisioned by the hosting provider, so this is
/// only called when explicitly enabled (local development and tests).
/// Returns whether the database was created.
pub async fn create_database_if_missing(database_url: &str) -> anyhow::Result<bool> {
    if Postgres::database_exists(database_url)
        .await
        .context("failed to check whether the database exists")?
    {
        return Ok(false);
    }

    Postgres::create_database(database_url)
        .await
        .context("failed to create database")?;

    Ok(true)
}

/// Run the migrations in this crate's `migrations/` folder.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!()
        .run(pool)
        .await
        .context("failed to run migrations")?;

    Ok(())
}

/// Cheap round trip used by the readiness check.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
