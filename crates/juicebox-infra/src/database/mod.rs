//! Data access layer: connection setup, entities and repositories.

mod connections;
mod postgres_base;
pub mod postgres_repo;

pub mod entity;

pub use connections::{DatabaseConfig, HydrationConfig, connect};
pub use postgres_repo::{PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};
