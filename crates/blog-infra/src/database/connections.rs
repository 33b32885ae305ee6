use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

use super::DatabaseConfig;

/// Pooled connection to the blog database.
///
/// `main` is shared by every repository built on it.
pub struct DatabaseConnections {
    pub main: Arc<DbConn>,
}

impl DatabaseConnections {
    /// Open the connection pool.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", config.max_connections);

        Ok(Self {
            main: Arc::new(main),
        })
    }

    /// Round-trip a trivial statement to confirm the pool is usable.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.main.execute_unprepared("SELECT 1").await.map(|_| ())
    }
}
