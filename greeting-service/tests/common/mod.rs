//! Common test utilities for greeting-service integration tests.

use greeting_service::config::{DatabaseConfig, GreetingConfig};
use greeting_service::services::{InMemoryStore, PersistenceContext};
use greeting_service::startup::Application;
use service_core::config::Config as CommonConfig;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,greeting_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Test configuration bound to an ephemeral localhost port, no database.
pub fn test_config() -> GreetingConfig {
    GreetingConfig {
        common: CommonConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        service_name: "greeting-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database: None,
    }
}

/// Test configuration pointing at `TEST_DATABASE_URL`.
#[allow(dead_code)]
pub fn postgres_config() -> GreetingConfig {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set to run Postgres tests");

    GreetingConfig {
        database: Some(DatabaseConfig {
            url,
            max_connections: 2,
            min_connections: 1,
        }),
        ..test_config()
    }
}

/// Test application wrapper.
#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Spawn the application on an in-memory store.
#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    spawn_app_with_store(Arc::new(InMemoryStore::new())).await
}

/// Spawn the application around the given persistence context.
pub async fn spawn_app_with_store(store: Arc<dyn PersistenceContext>) -> TestApp {
    init_tracing();

    let app = Application::build_with_store(test_config(), store)
        .await
        .expect("Failed to build application");

    let port = app.port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    // Wait for server to be ready with retry
    let client = reqwest::Client::new();
    let mut attempts = 0;
    loop {
        match client.get(format!("{}/health", address)).send().await {
            Ok(_) => break,
            Err(_) if attempts < 20 => {
                attempts += 1;
                tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            }
            Err(e) => panic!("Server not ready after 20 attempts: {}", e),
        }
    }

    TestApp {
        address,
        port,
        client,
    }
}
