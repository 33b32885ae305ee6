//! Sign-up, sign-in, sign-out and token validation.

use blog_shared::dto::{SignInRequest, SignUpRequest, UserResponse};
use blog_shared::{ApiResponse, TokenTriple};
use reqwest::header::HeaderMap;
use reqwest::{Method, Response};

use crate::transport::decode;
use crate::{BlogClient, ClientError, Session};

fn triple_from_headers(headers: &HeaderMap) -> Option<TokenTriple> {
    TokenTriple::from_lookup(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    })
}

async fn user_from(response: Response) -> Result<UserResponse, ClientError> {
    decode::<ApiResponse<UserResponse>>(response)
        .await?
        .data
        .ok_or_else(|| ClientError::Decode("response carried no user".to_string()))
}

impl BlogClient {
    /// Register and sign in. The returned triple is stored.
    pub async fn signup(&self, request: &SignUpRequest) -> Result<UserResponse, ClientError> {
        let response = self
            .transport
            .send(self.transport.anonymous(Method::POST, "/auth").json(request))
            .await?;
        self.establish(response).await
    }

    /// Sign in with email and password. The returned triple is stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserResponse, ClientError> {
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .transport
            .send(
                self.transport
                    .anonymous(Method::POST, "/auth/sign_in")
                    .json(&request),
            )
            .await?;
        self.establish(response).await
    }

    async fn establish(&self, response: Response) -> Result<UserResponse, ClientError> {
        let triple = triple_from_headers(response.headers())
            .ok_or_else(|| ClientError::Decode("response carried no token headers".to_string()))?;
        let user = user_from(response).await?;

        self.transport
            .store()
            .save(&Session::new(triple, Some(user.clone())))?;
        tracing::info!(uid = %user.email, "Signed in");
        Ok(user)
    }

    /// Sign out. The local session is discarded even when the server call
    /// fails; that failure is still returned.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let outcome = self
            .transport
            .send(self.transport.request(Method::DELETE, "/auth/sign_out"))
            .await;
        let cleared = self.transport.store().clear();

        if let Err(e) = &outcome {
            tracing::warn!("Sign-out request failed: {}", e);
        }
        outcome?;
        cleared
    }

    /// Check the stored triple with the server.
    ///
    /// `Ok(None)` means logged out: either nothing was stored or the server
    /// rejected the triple, in which case the transport has cleared it.
    pub async fn validate_token(&self) -> Result<Option<UserResponse>, ClientError> {
        let Some(session) = self.transport.store().load()? else {
            return Ok(None);
        };

        let response = match self
            .transport
            .send(self.transport.request(Method::GET, "/auth/validate_token"))
            .await
        {
            Ok(response) => response,
            Err(ClientError::Unauthorized) => return Ok(None),
            Err(e) => return Err(e),
        };

        let user = user_from(response).await?;
        self.transport
            .store()
            .save(&Session::new(session.triple, Some(user.clone())))?;
        Ok(Some(user))
    }
}
