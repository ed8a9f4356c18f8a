//! Database connection and table creation

use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

use crate::Result;

/// Open (or create) the database at `db_path` and make sure all tables exist
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    create_tables(&pool).await?;

    Ok(pool)
}

/// Idempotent; safe to run on every startup
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usage_checks (
            guid TEXT PRIMARY KEY,
            ip_asset_id TEXT NOT NULL,
            domain TEXT NOT NULL,
            use_type TEXT NOT NULL,
            classification TEXT NOT NULL,
            reason TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_usage_checks_asset ON usage_checks (ip_asset_id, created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parsed_licenses (
            guid TEXT PRIMARY KEY,
            license_text TEXT NOT NULL,
            parsed_schema TEXT NOT NULL,
            confidence REAL NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database tables initialized (usage_checks, parsed_licenses)");

    Ok(())
}
