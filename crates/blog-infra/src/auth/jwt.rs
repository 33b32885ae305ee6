//! JWT access-token service.
//!
//! Tokens are bound to a `uid` and a `client`; the API additionally requires a
//! live session whose `token_id` equals the token's `jti`.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::ports::{AuthError, IssuedToken, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub lifespan_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            // Two weeks.
            lifespan_hours: 336,
            issuer: "blog-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_LIFESPAN_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        // Warn if using default secret in production
        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            lifespan_hours: std::env::var("JWT_LIFESPAN_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.lifespan_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    uid: String,
    client: String,
    jti: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// JWT-based token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    fn issue_at(
        &self,
        now: DateTime<Utc>,
        user_id: Uuid,
        uid: &str,
        client: &str,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = now + TimeDelta::hours(self.config.lifespan_hours);
        let token_id = Uuid::new_v4();

        let claims = Claims {
            sub: user_id.to_string(),
            uid: uid.to_string(),
            client: client.to_string(),
            jti: token_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            token_id,
            expires_at,
        })
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(
        &self,
        user_id: Uuid,
        uid: &str,
        client: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.issue_at(Utc::now(), user_id, uid, client)
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let claims = token_data.claims;
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let token_id =
            Uuid::parse_str(&claims.jti).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            uid: claims.uid,
            client: claims.client,
            token_id,
            exp: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            lifespan_hours: 1,
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_round_trip_binds_uid_and_client() {
        let service = JwtTokenService::new(test_config());
        let user_id = Uuid::new_v4();

        let issued = service
            .generate_token(user_id, "test@example.com", "client-1")
            .unwrap();
        let claims = service.validate_token(&issued.access_token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.uid, "test@example.com");
        assert_eq!(claims.client, "client-1");
        assert_eq!(claims.token_id, issued.token_id);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_each_token_gets_a_fresh_id() {
        let service = JwtTokenService::new(test_config());
        let user_id = Uuid::new_v4();

        let a = service.generate_token(user_id, "u", "c").unwrap();
        let b = service.generate_token(user_id, "u", "c").unwrap();
        assert_ne!(a.token_id, b.token_id);
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = JwtTokenService::new(test_config());

        let result = service.validate_token("invalid-token");

        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_validate_expired_token() {
        let service = JwtTokenService::new(test_config());
        let issued = service
            .issue_at(
                Utc::now() - TimeDelta::hours(3),
                Uuid::new_v4(),
                "u",
                "c",
            )
            .unwrap();

        let result = service.validate_token(&issued.access_token);
        assert!(matches!(result.unwrap_err(), AuthError::TokenExpired));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let service1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let issued = service1
            .generate_token(Uuid::new_v4(), "test@test.com", "c")
            .unwrap();

        assert!(service2.validate_token(&issued.access_token).is_err());
    }
}
