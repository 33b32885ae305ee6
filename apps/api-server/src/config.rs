//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::auth::{JwtConfig, PasswordHashConfig};
use blog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub password_hash: PasswordHashConfig,
    /// Reject unauthenticated calls to the blog endpoints.
    pub require_auth: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let hash_defaults = PasswordHashConfig::default();
        let password_hash = PasswordHashConfig {
            memory_kib: parse_var("PASSWORD_HASH_MEMORY_KIB").unwrap_or(hash_defaults.memory_kib),
            iterations: parse_var("PASSWORD_HASH_ITERATIONS").unwrap_or(hash_defaults.iterations),
            parallelism: hash_defaults.parallelism,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(3010),
            database,
            jwt: JwtConfig::from_env(),
            password_hash,
            require_auth: env::var("BLOG_REQUIRE_AUTH")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// `false`, `0`, `no` and `off` disable a flag; anything else enables it.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
