//! The greeting facade.

use crate::models::Entity;
use crate::services::metrics::record_entity_query;
use crate::services::store::PersistenceContext;
use service_core::error::AppError;
use std::sync::Arc;

pub const GREETING: &str = "Hello from EJB!";

/// Stateless facade over a persistence context.
#[derive(Clone)]
pub struct GreetingService {
    store: Arc<dyn PersistenceContext>,
}

impl GreetingService {
    pub fn new(store: Arc<dyn PersistenceContext>) -> Self {
        Self { store }
    }

    pub fn message(&self) -> &'static str {
        GREETING
    }

    /// Every stored `E`, in whatever order the store returns them.
    ///
    /// Store failures propagate unchanged. A row that does not decode as `E`
    /// fails the whole call with [`AppError::DatabaseError`].
    pub async fn find_all<E: Entity>(&self) -> Result<Vec<E>, AppError> {
        let result = self.fetch_typed::<E>().await;
        let status = if result.is_ok() { "success" } else { "error" };
        record_entity_query(E::KIND.name(), status);

        match &result {
            Ok(entities) => {
                tracing::debug!(entity = %E::KIND, count = entities.len(), "find_all completed")
            }
            Err(e) => tracing::warn!(entity = %E::KIND, error = %e, "find_all failed"),
        }
        result
    }

    async fn fetch_typed<E: Entity>(&self) -> Result<Vec<E>, AppError> {
        self.store
            .fetch_all(&E::KIND)
            .await?
            .into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Row does not decode as {}: {}",
                        E::KIND,
                        e
                    ))
                })
            })
            .collect()
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;
    use crate::services::store::InMemoryStore;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Visitor {
        id: i64,
        name: String,
    }

    impl Entity for Visitor {
        const KIND: EntityKind = EntityKind::new("Visitor", "visitors");
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Motd {
        text: String,
    }

    impl Entity for Motd {
        const KIND: EntityKind = EntityKind::new("Motd", "motd");
    }

    struct FailingStore;

    #[async_trait]
    impl PersistenceContext for FailingStore {
        async fn fetch_all(&self, _kind: &EntityKind) -> Result<Vec<Value>, AppError> {
            Err(AppError::DatabaseError(anyhow::anyhow!("connection reset")))
        }

        async fn health_check(&self) -> Result<(), AppError> {
            Err(AppError::ServiceUnavailable)
        }
    }

    fn service_with(store: InMemoryStore) -> GreetingService {
        GreetingService::new(Arc::new(store))
    }

    #[test]
    fn message_is_constant() {
        let service = service_with(InMemoryStore::new());
        for _ in 0..3 {
            assert_eq!(service.message(), "Hello from EJB!");
        }
        assert_eq!(service.clone().message(), GREETING);
    }

    #[tokio::test]
    async fn find_all_on_empty_store_is_empty() {
        let service = service_with(InMemoryStore::new());
        let visitors: Vec<Visitor> = service.find_all().await.unwrap();
        assert!(visitors.is_empty());
    }

    #[tokio::test]
    async fn find_all_returns_only_the_requested_kind() {
        let store = InMemoryStore::new();
        store
            .insert_all(&[
                Visitor {
                    id: 1,
                    name: "ada".into(),
                },
                Visitor {
                    id: 2,
                    name: "grace".into(),
                },
            ])
            .unwrap();
        store
            .insert(&Motd {
                text: "welcome".into(),
            })
            .unwrap();
        let service = service_with(store);

        let visitors = service.find_all::<Visitor>().await.unwrap();
        assert_eq!(
            visitors,
            vec![
                Visitor {
                    id: 1,
                    name: "ada".into()
                },
                Visitor {
                    id: 2,
                    name: "grace".into()
                },
            ]
        );

        let motd = service.find_all::<Motd>().await.unwrap();
        assert_eq!(motd.len(), 1);
        assert_eq!(motd[0].text, "welcome");
    }

    #[tokio::test]
    async fn undecodable_row_is_a_database_error() {
        let store = InMemoryStore::new();
        store.insert_row(Visitor::KIND, json!({ "id": "not-a-number", "name": "x" }));
        let service = service_with(store);

        let err = service.find_all::<Visitor>().await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert!(err.to_string().contains("Visitor"));
    }

    #[tokio::test]
    async fn store_failure_propagates_unchanged() {
        let service = GreetingService::new(Arc::new(FailingStore));

        let err = service.find_all::<Visitor>().await.unwrap_err();
        assert_eq!(err.to_string(), "Database error: connection reset");

        assert!(matches!(
            service.health_check().await,
            Err(AppError::ServiceUnavailable)
        ));
        // the greeting path never touches the store
        assert_eq!(service.message(), GREETING);
    }
}
