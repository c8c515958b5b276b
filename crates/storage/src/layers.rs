//! Access to configured map layers.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use ogc_common::{
    Credentials, LayerCapabilities, LayerId, LayerRef, ServiceError, ServiceResult, ServiceType,
};

/// Read and write access to layer configuration.
#[async_trait]
pub trait LayerService: Send + Sync {
    /// All configured layers, in id order.
    async fn find_all(&self) -> ServiceResult<Vec<LayerRef>>;

    /// Persist the capability-derived properties of a layer.
    async fn update(&self, layer: &LayerRef) -> ServiceResult<()>;
}

/// PostgreSQL-backed layer service on the `maplayer` table.
pub struct PgLayerService {
    pool: PgPool,
}

impl PgLayerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LayerService for PgLayerService {
    async fn find_all(&self) -> ServiceResult<Vec<LayerRef>> {
        let rows = sqlx::query_as::<_, LayerRow>(
            r#"
            SELECT id, type, name, url, version, username, password,
                   capabilities, capabilities_last_updated
            FROM maplayer
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ServiceError::DatabaseError(format!("Query failed: {}", e)))?;

        let mut layers = Vec::with_capacity(rows.len());
        for row in rows {
            match row.service_type() {
                Some(service_type) => layers.push(row.into_layer(service_type)),
                None => debug!(id = row.id, layer_type = %row.layer_type, "Skipping unsupported layer type"),
            }
        }
        Ok(layers)
    }

    async fn update(&self, layer: &LayerRef) -> ServiceResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE maplayer
            SET capabilities = $1, capabilities_last_updated = $2
            WHERE id = $3
            "#,
        )
        .bind(Json(&layer.capabilities))
        .bind(layer.capabilities_last_updated)
        .bind(layer.id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::DatabaseError(format!("Update failed: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::DatabaseError(format!(
                "Layer {} does not exist",
                layer.id
            )));
        }
        Ok(())
    }
}

/// Internal row type for database queries.
#[derive(FromRow)]
struct LayerRow {
    id: i64,
    #[sqlx(rename = "type")]
    layer_type: String,
    name: String,
    url: String,
    version: Option<String>,
    username: Option<String>,
    password: Option<String>,
    capabilities: Option<serde_json::Value>,
    capabilities_last_updated: Option<DateTime<Utc>>,
}

impl LayerRow {
    fn service_type(&self) -> Option<ServiceType> {
        self.layer_type.parse().ok()
    }

    fn into_layer(self, service_type: ServiceType) -> LayerRef {
        let capabilities = match self.capabilities {
            Some(value) => serde_json::from_value::<LayerCapabilities>(value).unwrap_or_else(|e| {
                warn!(id = self.id, error = %e, "Discarding unreadable layer capabilities");
                LayerCapabilities::default()
            }),
            None => LayerCapabilities::default(),
        };

        let mut layer = LayerRef::new(
            self.id,
            self.name,
            self.url,
            service_type,
            self.version.as_deref(),
        );
        layer.credentials = Credentials::from_parts(self.username, self.password);
        layer.capabilities = capabilities;
        layer.capabilities_last_updated = self.capabilities_last_updated;
        layer
    }
}

/// In-memory layer service for tests and database-less runs.
#[derive(Default)]
pub struct MemoryLayerService {
    layers: RwLock<BTreeMap<LayerId, LayerRef>>,
    failing: RwLock<HashSet<LayerId>>,
    updates: AtomicUsize,
}

impl MemoryLayerService {
    pub fn new(layers: impl IntoIterator<Item = LayerRef>) -> Self {
        Self {
            layers: RwLock::new(layers.into_iter().map(|l| (l.id, l)).collect()),
            ..Default::default()
        }
    }

    pub async fn get(&self, id: LayerId) -> Option<LayerRef> {
        self.layers.read().await.get(&id).cloned()
    }

    /// Make `update` fail for the given layer.
    pub async fn fail_updates_for(&self, id: LayerId) {
        self.failing.write().await.insert(id);
    }

    /// Number of successful `update` calls so far.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LayerService for MemoryLayerService {
    async fn find_all(&self) -> ServiceResult<Vec<LayerRef>> {
        Ok(self.layers.read().await.values().cloned().collect())
    }

    async fn update(&self, layer: &LayerRef) -> ServiceResult<()> {
        if self.failing.read().await.contains(&layer.id) {
            return Err(ServiceError::DatabaseError(format!(
                "Update rejected for layer {}",
                layer.id
            )));
        }
        let mut layers = self.layers.write().await;
        let stored = layers.get_mut(&layer.id).ok_or_else(|| {
            ServiceError::DatabaseError(format!("Layer {} does not exist", layer.id))
        })?;
        stored.capabilities = layer.capabilities.clone();
        stored.capabilities_last_updated = layer.capabilities_last_updated;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
