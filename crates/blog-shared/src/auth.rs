//! The three-header token handshake.
//!
//! Sign-up and sign-in responses carry `access-token`, `client` and `uid`
//! (plus `token-type` and `expiry`). Authenticated requests send the same
//! three values back.

use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_HEADER: &str = "access-token";
pub const CLIENT_HEADER: &str = "client";
pub const UID_HEADER: &str = "uid";
pub const TOKEN_TYPE_HEADER: &str = "token-type";
pub const EXPIRY_HEADER: &str = "expiry";

/// Credential set authenticating one client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTriple {
    #[serde(rename = "access-token")]
    pub access_token: String,
    pub client: String,
    pub uid: String,
}

impl TokenTriple {
    pub fn new(
        access_token: impl Into<String>,
        client: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            client: client.into(),
            uid: uid.into(),
        }
    }

    /// Build a triple from a header lookup. Returns `None` unless all three
    /// values are present and non-empty.
    pub fn from_lookup<F>(mut lookup: F) -> Option<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Some(Self {
            access_token: get(ACCESS_TOKEN_HEADER)?,
            client: get(CLIENT_HEADER)?,
            uid: get(UID_HEADER)?,
        })
    }

    /// Header name/value pairs to attach to a request.
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            (ACCESS_TOKEN_HEADER, self.access_token.as_str()),
            (CLIENT_HEADER, self.client.as_str()),
            (UID_HEADER, self.uid.as_str()),
        ]
    }

    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.client.is_empty() && !self.uid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_requires_all_three() {
        let mut headers = HashMap::from([
            (ACCESS_TOKEN_HEADER, "tok".to_string()),
            (CLIENT_HEADER, "cli".to_string()),
        ]);
        assert!(TokenTriple::from_lookup(|n| headers.get(n).cloned()).is_none());

        headers.insert(UID_HEADER, "a@b.io".to_string());
        let triple = TokenTriple::from_lookup(|n| headers.get(n).cloned()).unwrap();
        assert_eq!(triple, TokenTriple::new("tok", "cli", "a@b.io"));
    }

    #[test]
    fn test_from_lookup_rejects_empty_values() {
        let headers = HashMap::from([
            (ACCESS_TOKEN_HEADER, "tok".to_string()),
            (CLIENT_HEADER, String::new()),
            (UID_HEADER, "a@b.io".to_string()),
        ]);
        assert!(TokenTriple::from_lookup(|n| headers.get(n).cloned()).is_none());
    }

    #[test]
    fn test_serialized_with_header_names() {
        let json = serde_json::to_value(TokenTriple::new("t", "c", "u")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "access-token": "t", "client": "c", "uid": "u" })
        );
    }
}
