//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    BlogRepository, PasswordService, SessionRepository, TokenService, UserRepository,
};
use blog_infra::auth::{Argon2PasswordService, JwtTokenService};
use blog_infra::database::{
    InMemoryBlogRepository, InMemorySessionRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use blog_infra::database::{
    DatabaseConnections, PostgresBlogRepository, PostgresSessionRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Where blogs, users and sessions are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub blogs: Arc<dyn BlogRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub require_auth: bool,
    pub storage: Storage,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> =
            match Argon2PasswordService::with_config(config.password_hash) {
                Ok(service) => Arc::new(service),
                Err(e) => {
                    tracing::warn!("Invalid password hash settings ({}). Using defaults.", e);
                    Arc::new(Argon2PasswordService::new())
                }
            };

        #[cfg(feature = "postgres")]
        let connected = Self::connect_postgres(config, &tokens, &passwords).await;

        #[cfg(not(feature = "postgres"))]
        let connected: Option<Self> = {
            if config.database.is_some() {
                tracing::warn!("Built without the postgres feature. DATABASE_URL is ignored.");
            }
            None
        };

        if let Some(state) = connected {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        tracing::info!("Application state initialized (memory)");
        Self::in_memory(tokens, passwords, config.require_auth)
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(
        config: &AppConfig,
        tokens: &Arc<dyn TokenService>,
        passwords: &Arc<dyn PasswordService>,
    ) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                Some(Self {
                    users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                    blogs: Arc::new(PostgresBlogRepository::new(conn.main.clone())),
                    sessions: Arc::new(PostgresSessionRepository::new(conn.main.clone())),
                    tokens: tokens.clone(),
                    passwords: passwords.clone(),
                    require_auth: config.require_auth,
                    storage: Storage::Postgres,
                    db: Some(conn),
                })
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory(
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        require_auth: bool,
    ) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let blogs = Arc::new(InMemoryBlogRepository::new(users.clone()));

        Self {
            users,
            blogs,
            sessions: Arc::new(InMemorySessionRepository::new()),
            tokens,
            passwords,
            require_auth,
            storage: Storage::Memory,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
