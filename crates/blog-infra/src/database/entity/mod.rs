//! SeaORM entities.

pub mod auth_session;
pub mod blog;
pub mod user;
