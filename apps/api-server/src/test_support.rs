//! Shared fixtures for the server's tests.

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};

use juicebox_infra::{HydrationConfig, JwtConfig};

use crate::state::AppState;

/// State over a fresh, migrated in-memory SQLite database.
pub async fn test_state() -> AppState {
    let opts = ConnectOptions::new("sqlite::memory:")
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false)
        .to_owned();
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    AppState::from_connection(db, test_jwt(1), HydrationConfig::new(2))
}

pub fn test_jwt(expiration_hours: i64) -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours,
        issuer: "test-issuer".to_string(),
    }
}
