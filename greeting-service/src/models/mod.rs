//! Domain models for greeting-service.

mod entity;

pub use entity::{Entity, EntityKind};
