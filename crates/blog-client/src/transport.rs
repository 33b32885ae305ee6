//! HTTP transport: one place where credentials are attached and error
//! responses are mapped.

use std::sync::Arc;

use blog_shared::ErrorResponse;
use blog_shared::auth::ACCESS_TOKEN_HEADER;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{ClientError, SessionStore};

/// Request builder bound to an API base URL and a session store.
pub struct Transport {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl Transport {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("blog-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request. The stored triple is attached only when all three
    /// values are present; otherwise the request goes out unauthenticated.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.anonymous(method, path);

        match self.store.load() {
            Ok(Some(session)) if session.triple.is_complete() => {
                for (name, value) in session.triple.headers() {
                    builder = builder.header(name, value);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Ignoring unreadable session: {}", e),
        }

        builder
    }

    /// Start a request that never carries the stored triple.
    pub fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send a request, turning non-2xx responses into [`ClientError`]s.
    ///
    /// A 401 to a request that carried the stored triple means the server no
    /// longer honours it, so the stored session is cleared.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let request = builder.build()?;
        let carried_triple = request.headers().contains_key(ACCESS_TOKEN_HEADER);

        let response = self.http.execute(request).await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let error = error_from_response(response).await;
        if carried_triple && matches!(error, ClientError::Unauthorized) {
            tracing::info!("Stored token was rejected; clearing session");
            self.store.clear()?;
        }
        Err(error)
    }
}

/// Decode a JSON body.
pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let problem = response.json::<ErrorResponse>().await.ok();
    tracing::debug!(status = status.as_u16(), ?problem, "API returned an error");

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(problem.and_then(|p| p.errors).unwrap_or_default())
        }
        _ => {
            let (title, detail) = match problem {
                Some(p) => (p.title, p.detail),
                None => (
                    status.canonical_reason().unwrap_or("Error").to_string(),
                    None,
                ),
            };
            ClientError::Api {
                status: status.as_u16(),
                title,
                detail,
            }
        }
    }
}
