//! # Juicebox Infrastructure
//!
//! Concrete implementations of the ports defined in `juicebox-core`:
//! the SeaORM data-access layer and the JWT + Argon2 auth services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, HydrationConfig, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};
