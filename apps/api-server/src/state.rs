//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::{DbConn, DbErr};

use juicebox_core::ports::{
    PasswordService, PostRepository, TagRepository, TokenService, UserRepository,
};
use juicebox_infra::database::connect;
use juicebox_infra::{
    Argon2PasswordService, HydrationConfig, JwtConfig, JwtTokenService, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Open the pool and wire the repositories and auth services.
    pub async fn new(config: &AppConfig) -> Result<Self, DbErr> {
        let db = connect(&config.database).await?;
        let state = Self::from_connection(db, config.jwt.clone(), config.hydration);

        tracing::info!("Application state initialized");
        Ok(state)
    }

    pub fn from_connection(db: DbConn, jwt: JwtConfig, hydration: HydrationConfig) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone(), hydration)),
            posts: Arc::new(PostgresPostRepository::new(db.clone(), hydration)),
            tags: Arc::new(PostgresTagRepository::new(db)),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}
