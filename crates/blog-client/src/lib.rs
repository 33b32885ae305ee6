//! # Blog Client
//!
//! Talks to the blog API on behalf of a front end.
//!
//! - [`Transport`] attaches the stored token triple to every request.
//! - [`SessionStore`] keeps the triple between runs ([`FileSessionStore`])
//!   or for the life of the process ([`MemorySessionStore`]).
//! - [`BlogClient`] exposes the auth and blog calls.
//! - [`presentation`] holds the forms, feed and navigation view-models.

mod auth;
mod blogs;
mod error;
pub mod presentation;
mod session;
mod transport;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use error::ClientError;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use transport::Transport;

/// Default API location used by the CLI.
pub const DEFAULT_API_URL: &str = "http://localhost:3010";

/// Typed access to the blog API.
pub struct BlogClient {
    transport: Transport,
}

impl BlogClient {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(base_url, store)?,
        })
    }

    /// The stored session, if any.
    pub fn session(&self) -> Result<Option<Session>, ClientError> {
        self.transport.store().load()
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.session(), Ok(Some(s)) if s.triple.is_complete())
    }
}
