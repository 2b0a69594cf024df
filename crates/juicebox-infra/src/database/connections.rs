use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the relational store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Limits applied when list queries hydrate posts.
#[derive(Debug, Clone, Copy)]
pub struct HydrationConfig {
    /// Maximum number of posts hydrated concurrently per list request.
    pub max_concurrency: usize,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

impl HydrationConfig {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }
}

/// Open the connection pool shared by all repositories.
///
/// # Example
/// ```ignore
/// let db = connect(&config).await?;
/// let posts = PostgresPostRepository::new(db.clone(), HydrationConfig::default());
/// let users = PostgresUserRepository::new(db, HydrationConfig::default());
/// ```
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection pool...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let db = Database::connect(opts).await?;
    tracing::info!(
        max_connections = config.max_connections,
        "Database connected"
    );

    Ok(db)
}
