//! Persistence context abstraction and its in-memory implementation.

use crate::models::{Entity, EntityKind};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use service_core::error::AppError;

/// Executes "fetch every stored row of this kind" against a durable store.
///
/// Rows come back as JSON objects keyed by column name; typed decoding is
/// left to the caller.
#[async_trait]
pub trait PersistenceContext: Send + Sync {
    async fn fetch_all(&self, kind: &EntityKind) -> Result<Vec<Value>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Store used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryStore {
    rows: DashMap<EntityKind, Vec<Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entity to its kind's rows.
    pub fn insert<E: Entity + Serialize>(&self, entity: &E) -> Result<(), AppError> {
        let row = serde_json::to_value(entity)
            .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;
        self.rows.entry(E::KIND).or_default().push(row);
        Ok(())
    }

    pub fn insert_all<'a, E, I>(&self, entities: I) -> Result<(), AppError>
    where
        E: Entity + Serialize + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        for entity in entities {
            self.insert(entity)?;
        }
        Ok(())
    }

    /// Store a raw row under `kind`, bypassing serialization.
    pub fn insert_row(&self, kind: EntityKind, row: Value) {
        self.rows.entry(kind).or_default().push(row);
    }

    pub fn len(&self, kind: &EntityKind) -> usize {
        self.rows.get(kind).map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, kind: &EntityKind) -> bool {
        self.len(kind) == 0
    }
}

#[async_trait]
impl PersistenceContext for InMemoryStore {
    async fn fetch_all(&self, kind: &EntityKind) -> Result<Vec<Value>, AppError> {
        Ok(self
            .rows
            .get(kind)
            .map(|rows| rows.value().clone())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
