//! Greeting Service - a plain-text greeting endpoint over an entity-kind data access facade.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
