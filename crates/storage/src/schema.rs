//! Connection pool setup and schema migration.

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use ogc_common::{ServiceError, ServiceResult};

/// Open a connection pool for the given database URL.
pub async fn connect(database_url: &str, max_connections: u32) -> ServiceResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| ServiceError::DatabaseError(format!("Connection failed: {}", e)))
}

/// Create the tables used by the updater when they do not exist yet.
pub async fn migrate(pool: &PgPool) -> ServiceResult<()> {
    for statement in schema_statements() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Migration failed: {}", e)))?;
    }
    info!("Database schema is up to date");
    Ok(())
}

fn schema_statements() -> impl Iterator<Item = &'static str> {
    SCHEMA_SQL.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS capabilities_cache (
    id BIGSERIAL PRIMARY KEY,
    layertype VARCHAR(64) NOT NULL,
    url TEXT NOT NULL,
    version VARCHAR(64) NOT NULL DEFAULT '',
    data TEXT NOT NULL,
    created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    UNIQUE(layertype, url, version)
);

CREATE TABLE IF NOT EXISTS maplayer (
    id BIGSERIAL PRIMARY KEY,
    type VARCHAR(64) NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    version VARCHAR(64),
    username TEXT,
    password TEXT,
    capabilities JSONB,
    capabilities_last_updated TIMESTAMPTZ
);

CREATE INDEX IF NOT EXISTS idx_maplayer_type ON maplayer(type)
"#;
