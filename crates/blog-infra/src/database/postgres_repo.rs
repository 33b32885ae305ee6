//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use blog_core::domain::{Blog, User, UserRef};
use blog_core::error::RepoError;
use blog_core::ports::{BlogRepository, SessionRepository, UserRepository};

use super::entity::auth_session::{self, Entity as SessionEntity};
use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

/// PostgreSQL auth session repository.
pub type PostgresSessionRepository = PostgresBaseRepository<SessionEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn create(&self, blog: Blog) -> Result<Blog, RepoError> {
        let model = blog::ActiveModel::from(&blog)
            .insert(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        tracing::debug!(blog_id = %model.id, "Blog inserted");
        Ok(model.into_blog(blog.author))
    }

    async fn list_newest_first(&self) -> Result<Vec<Blog>, RepoError> {
        let rows = BlogEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(blog::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(blog, author)| blog.into_blog(author.map(UserRef::from)))
            .collect())
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn delete(&self, client: &str) -> Result<bool, RepoError> {
        let result = SessionEntity::delete_by_id(client.to_string())
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn prune_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        keep: usize,
    ) -> Result<u64, RepoError> {
        let expired = SessionEntity::delete_many()
            .filter(auth_session::Column::UserId.eq(user_id))
            .filter(auth_session::Column::ExpiresAt.lte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let surplus: Vec<String> = SessionEntity::find()
            .filter(auth_session::Column::UserId.eq(user_id))
            .order_by_desc(auth_session::Column::CreatedAt)
            .offset(keep as u64)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|s| s.client)
            .collect();

        let mut removed = expired.rows_affected;
        if !surplus.is_empty() {
            removed += SessionEntity::delete_many()
                .filter(auth_session::Column::Client.is_in(surplus))
                .exec(self.db.as_ref())
                .await
                .map_err(map_db_err)?
                .rows_affected;
        }

        tracing::debug!(user_id = %user_id, removed, "Pruned auth sessions");
        Ok(removed)
    }
}
