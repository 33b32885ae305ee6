use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AuthSession, Blog, User};
use crate::error::RepoError;

/// Generic repository trait for entities stored one row per value.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Blog repository. Blogs are append-only.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Persist a validated blog and return it as stored.
    async fn create(&self, blog: Blog) -> Result<Blog, RepoError>;

    /// Every blog with its author, newest first.
    async fn list_newest_first(&self) -> Result<Vec<Blog>, RepoError>;
}

/// Auth session repository, keyed by client id.
#[async_trait]
pub trait SessionRepository: BaseRepository<AuthSession, String> {
    /// Remove a session. Returns `false` when none existed.
    async fn delete(&self, client: &str) -> Result<bool, RepoError>;

    /// Drop a user's sessions that have expired by `now`, then all but the
    /// `keep` most recently created ones. Returns how many were removed.
    async fn prune_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        keep: usize,
    ) -> Result<u64, RepoError>;
}
