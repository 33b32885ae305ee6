use std::collections::BTreeMap;

use thiserror::Error;

/// Errors surfaced by [`crate::BlogClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected (or did not receive) valid credentials.
    #[error("Not signed in or the session has expired")]
    Unauthorized,

    /// Field-level validation failures, e.g. `{"content": ["can't be blank"]}`.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("API error {status} {title}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Api {
        status: u16,
        title: String,
        detail: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    SessionFormat(#[from] serde_json::Error),
}

fn summarize(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field} {m}")))
        .collect::<Vec<_>>()
        .join(", ")
}
