//! Schema for the blog database: `users`, `blogs` and `auth_sessions`.

pub use sea_orm_migration::prelude::*;

mod m20241106_000001_create_users;
mod m20241106_000002_create_blogs;
mod m20241106_000003_create_auth_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241106_000001_create_users::Migration),
            Box::new(m20241106_000002_create_blogs::Migration),
            Box::new(m20241106_000003_create_auth_sessions::Migration),
        ]
    }
}
