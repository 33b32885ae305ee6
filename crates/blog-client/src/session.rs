//! Client-side session: the token triple and the signed-in user.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use blog_shared::TokenTriple;
use blog_shared::dto::UserResponse;
use serde::{Deserialize, Serialize};

use crate::ClientError;

/// Credentials for one signed-in client plus the user they belong to.
///
/// Persisted as `{"access-token", "client", "uid", "user"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub triple: TokenTriple,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl Session {
    pub fn new(triple: TokenTriple, user: Option<UserResponse>) -> Self {
        Self { triple, user }
    }
}

/// Where the session lives between requests.
pub trait SessionStore: Send + Sync {
    /// The stored session, `None` when logged out.
    fn load(&self) -> Result<Option<Session>, ClientError>;

    fn save(&self, session: &Session) -> Result<(), ClientError>;

    /// Forget the session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), ClientError>;
}

/// Session kept in a JSON file, surviving restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.blog-cli/session.json`, or the working directory without `HOME`.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(".blog-cli")
            .join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session held only for the life of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let guard = self.session.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}
