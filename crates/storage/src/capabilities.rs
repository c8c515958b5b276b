//! Persistence of GetCapabilities documents keyed by (url, type, version).

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use tracing::debug;

use ogc_common::{CapabilitiesDocument, ServiceError, ServiceResult, ServiceType, UrlTypeVersionKey};

/// Storage for capabilities documents.
///
/// At most one document exists per key; `save` replaces an existing one.
#[async_trait]
pub trait CapabilitiesStore: Send + Sync {
    async fn find(&self, key: &UrlTypeVersionKey) -> ServiceResult<Option<CapabilitiesDocument>>;

    /// Insert or replace the document for its key and return the stored row.
    async fn save(&self, doc: &CapabilitiesDocument) -> ServiceResult<CapabilitiesDocument>;
}

/// PostgreSQL-backed store on the `capabilities_cache` table.
pub struct PgCapabilitiesStore {
    pool: PgPool,
}

impl PgCapabilitiesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CapabilitiesStore for PgCapabilitiesStore {
    async fn find(&self, key: &UrlTypeVersionKey) -> ServiceResult<Option<CapabilitiesDocument>> {
        let row = sqlx::query_as::<_, CapabilitiesRow>(
            r#"
            SELECT id, layertype, url, version, data, created, updated
            FROM capabilities_cache
            WHERE layertype = $1 AND url = $2 AND version = $3
            "#,
        )
        .bind(key.service_type().layer_type())
        .bind(key.url())
        .bind(key.version().unwrap_or_default())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ServiceError::DatabaseError(format!("Query failed: {}", e)))?;

        row.map(CapabilitiesDocument::try_from).transpose()
    }

    async fn save(&self, doc: &CapabilitiesDocument) -> ServiceResult<CapabilitiesDocument> {
        let row = sqlx::query_as::<_, CapabilitiesRow>(
            r#"
            INSERT INTO capabilities_cache (layertype, url, version, data, created, updated)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (layertype, url, version)
            DO UPDATE SET
                data = EXCLUDED.data,
                updated = EXCLUDED.updated
            RETURNING id, layertype, url, version, data, created, updated
            "#,
        )
        .bind(doc.service_type.layer_type())
        .bind(&doc.url)
        .bind(doc.version.as_deref().unwrap_or_default())
        .bind(&doc.data)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ServiceError::DatabaseError(format!("Insert failed: {}", e)))?;

        debug!(id = row.id, url = %row.url, layertype = %row.layertype, "Saved capabilities");
        CapabilitiesDocument::try_from(row)
    }
}

/// Internal row type for database queries.
#[derive(FromRow)]
struct CapabilitiesRow {
    id: i64,
    layertype: String,
    url: String,
    version: String,
    data: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl TryFrom<CapabilitiesRow> for CapabilitiesDocument {
    type Error = ServiceError;

    fn try_from(row: CapabilitiesRow) -> ServiceResult<Self> {
        let service_type: ServiceType = row.layertype.parse().map_err(|_| {
            ServiceError::DatabaseError(format!(
                "Unknown layertype '{}' in capabilities_cache row {}",
                row.layertype, row.id
            ))
        })?;
        Ok(CapabilitiesDocument {
            id: Some(row.id),
            url: row.url,
            service_type,
            version: (!row.version.is_empty()).then_some(row.version),
            data: row.data,
            created_at: row.created,
            updated_at: row.updated,
        })
    }
}

/// In-memory store for tests and database-less runs.
#[derive(Default)]
pub struct MemoryCapabilitiesStore {
    documents: RwLock<HashMap<UrlTypeVersionKey, CapabilitiesDocument>>,
    next_id: AtomicI64,
    writes: AtomicUsize,
}

impl MemoryCapabilitiesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl CapabilitiesStore for MemoryCapabilitiesStore {
    async fn find(&self, key: &UrlTypeVersionKey) -> ServiceResult<Option<CapabilitiesDocument>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn save(&self, doc: &CapabilitiesDocument) -> ServiceResult<CapabilitiesDocument> {
        let key = doc.key();
        let mut documents = self.documents.write().await;

        let stored = match documents.get(&key) {
            Some(existing) => CapabilitiesDocument {
                id: existing.id,
                created_at: existing.created_at,
                ..doc.clone()
            },
            None => CapabilitiesDocument {
                id: Some(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                ..doc.clone()
            },
        };
        documents.insert(key, stored.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }
}
