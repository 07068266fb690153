//! Services module for greeting-service.

pub mod database;
pub mod greeting;
pub mod metrics;
pub mod store;

pub use database::Database;
pub use greeting::{GreetingService, GREETING};
pub use metrics::{get_metrics, init_metrics, record_entity_query, record_greeting_served};
pub use store::{InMemoryStore, PersistenceContext};
