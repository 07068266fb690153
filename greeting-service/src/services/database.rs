//! Postgres-backed persistence context.

use crate::models::EntityKind;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::PersistenceContext;
use async_trait::async_trait;
use serde_json::Value;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "greeting-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `SELECT` returning each row of `kind` as one JSON object.
fn select_all_sql(kind: &EntityKind) -> Result<String, AppError> {
    Ok(format!("SELECT to_jsonb(e) FROM {} e", kind.qualified_table()?))
}

#[async_trait]
impl PersistenceContext for Database {
    #[instrument(skip(self), fields(entity = %kind))]
    async fn fetch_all(&self, kind: &EntityKind) -> Result<Vec<Value>, AppError> {
        let sql = select_all_sql(kind)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_all"])
            .start_timer();

        let rows = sqlx::query_scalar::<_, Value>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to fetch {}: {}", kind, e))
            })?;

        timer.observe_duration();
        debug!(rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }
}
