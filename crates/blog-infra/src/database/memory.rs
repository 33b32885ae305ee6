//! In-memory repositories - used when no database is configured.
//!
//! Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{AuthSession, Blog, User, UserRef};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, BlogRepository, SessionRepository, UserRepository};

use super::mask_email;

/// In-memory user store keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

/// In-memory blog store. Rows are kept in insertion order.
pub struct InMemoryBlogRepository {
    blogs: RwLock<Vec<Blog>>,
    users: Arc<dyn UserRepository>,
}

impl InMemoryBlogRepository {
    /// Authors are resolved against `users`, the way a foreign key would be.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            blogs: RwLock::new(Vec::new()),
            users,
        }
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn create(&self, blog: Blog) -> Result<Blog, RepoError> {
        if let Some(author_id) = blog.author_id() {
            if self.users.find_by_id(author_id).await?.is_none() {
                return Err(RepoError::Constraint(format!(
                    "author {author_id} does not exist"
                )));
            }
        }

        self.blogs.write().await.push(blog.clone());
        tracing::debug!(blog_id = %blog.id, "Blog stored in memory");
        Ok(blog)
    }

    async fn list_newest_first(&self) -> Result<Vec<Blog>, RepoError> {
        let mut blogs: Vec<Blog> = self.blogs.read().await.iter().rev().cloned().collect();
        // Stable sort: equal timestamps keep the most recent insert first.
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // Refresh author names from the current user rows.
        for blog in &mut blogs {
            if let Some(author_id) = blog.author_id() {
                blog.author = self
                    .users
                    .find_by_id(author_id)
                    .await?
                    .as_ref()
                    .map(UserRef::from);
            }
        }

        Ok(blogs)
    }
}

/// In-memory auth session store keyed by client id.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, AuthSession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<AuthSession, String> for InMemorySessionRepository {
    async fn find_by_id(&self, client: String) -> Result<Option<AuthSession>, RepoError> {
        Ok(self.sessions.read().await.get(&client).cloned())
    }

    async fn insert(&self, session: AuthSession) -> Result<AuthSession, RepoError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.client) {
            return Err(RepoError::Constraint("client already exists".to_string()));
        }
        sessions.insert(session.client.clone(), session.clone());
        Ok(session)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn delete(&self, client: &str) -> Result<bool, RepoError> {
        Ok(self.sessions.write().await.remove(client).is_some())
    }

    async fn prune_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        keep: usize,
    ) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id || !s.is_expired(now));

        let mut live: Vec<(DateTime<Utc>, String)> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .map(|s| (s.created_at, s.client.clone()))
            .collect();
        live.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, client) in live.into_iter().skip(keep) {
            sessions.remove(&client);
        }

        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn user(email: &str) -> User {
        User::new(email.to_string(), None, "hash".to_string())
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a@b.io")).await.unwrap();

        let err = repo.insert(user("a@b.io")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
        assert!(repo.find_by_email("a@b.io").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blogs_listed_newest_first() {
        let users = Arc::new(InMemoryUserRepository::new());
        let repo = InMemoryBlogRepository::new(users);

        let mut older = Blog::new("a".into(), None).unwrap();
        older.created_at = Utc::now() - TimeDelta::seconds(10);
        repo.create(older).await.unwrap();
        repo.create(Blog::new("b".into(), None).unwrap()).await.unwrap();

        let contents: Vec<_> = repo
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.content)
            .collect();
        assert_eq!(contents, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_latest_insert_first() {
        let repo = InMemoryBlogRepository::new(Arc::new(InMemoryUserRepository::new()));
        let first = Blog::new("first".into(), None).unwrap();
        let mut second = Blog::new("second".into(), None).unwrap();
        second.created_at = first.created_at;

        repo.create(first).await.unwrap();
        repo.create(second).await.unwrap();

        let listed = repo.list_newest_first().await.unwrap();
        assert_eq!(listed[0].content, "second");
        assert_eq!(listed[1].content, "first");
    }

    #[tokio::test]
    async fn test_blog_author_must_exist() {
        let users = Arc::new(InMemoryUserRepository::new());
        let repo = InMemoryBlogRepository::new(users.clone());
        let ghost = user("ghost@b.io");

        let blog = Blog::new("hi".into(), Some(UserRef::from(&ghost))).unwrap();
        assert!(matches!(
            repo.create(blog).await.unwrap_err(),
            RepoError::Constraint(_)
        ));

        let alice = users.insert(user("alice@b.io")).await.unwrap();
        let blog = Blog::new("hi".into(), Some(UserRef::from(&alice))).unwrap();
        let stored = repo.create(blog).await.unwrap();
        assert_eq!(stored.author.unwrap().name, "alice");
    }

    #[tokio::test]
    async fn test_session_delete() {
        let repo = InMemorySessionRepository::new();
        let session = AuthSession::new(
            "client-1".into(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() + TimeDelta::hours(1),
        );
        repo.insert(session).await.unwrap();

        assert!(repo.find_by_id("client-1".into()).await.unwrap().is_some());
        assert!(repo.delete("client-1").await.unwrap());
        assert!(!repo.delete("client-1").await.unwrap());
        assert!(repo.find_by_id("client-1".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prune_drops_expired_and_oldest_sessions() {
        let repo = InMemorySessionRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let now = Utc::now();

        let session = |client: &str, user_id: Uuid, age: i64, ttl: i64| {
            let mut s = AuthSession::new(
                client.into(),
                user_id,
                Uuid::new_v4(),
                now + TimeDelta::seconds(ttl),
            );
            s.created_at = now - TimeDelta::seconds(age);
            s
        };
        repo.insert(session("expired", alice, 50, -1)).await.unwrap();
        repo.insert(session("oldest", alice, 40, 60)).await.unwrap();
        repo.insert(session("older", alice, 30, 60)).await.unwrap();
        repo.insert(session("newest", alice, 10, 60)).await.unwrap();
        repo.insert(session("bobs", bob, 100, -1)).await.unwrap();

        assert_eq!(repo.prune_for_user(alice, now, 2).await.unwrap(), 2);

        for (client, kept) in [
            ("expired", false),
            ("oldest", false),
            ("older", true),
            ("newest", true),
            ("bobs", true),
        ] {
            assert_eq!(
                repo.find_by_id(client.into()).await.unwrap().is_some(),
                kept,
                "{client}"
            );
        }
    }
}
