//! Bearer-token identity resolution.
//!
//! Validates an HS256 JWT and hands the owner id to handlers as an [`Identity`]
//! request extension. Issuing tokens is somebody else's job.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::ErrorResponse;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret
    pub secret: String,
    /// Whether to validate expiration
    pub validate_exp: bool,
}

impl JwtConfig {
    /// Minimum secret length for security
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new JWT config with secret (fallible)
    pub fn try_new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                var: "VET_CLINIC_JWT_SECRET",
                reason: format!(
                    "must be at least {} bytes, got {}",
                    Self::MIN_SECRET_LENGTH,
                    secret.len()
                ),
            });
        }
        Ok(Self {
            secret,
            validate_exp: true,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject (owner ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Legacy owner ID claim used by older clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Authenticated requester, inserted into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub owner_id: String,
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingToken,
    /// Invalid token format
    InvalidTokenFormat,
    /// Token validation failed
    ValidationFailed(String),
    /// Token expired
    TokenExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AuthError::MissingToken => ("MISSING_TOKEN", "Not authorized, no token".to_string()),
            AuthError::InvalidTokenFormat => (
                "INVALID_TOKEN_FORMAT",
                "Invalid authorization header format. Expected: Bearer <token>".to_string(),
            ),
            AuthError::ValidationFailed(msg) => ("TOKEN_VALIDATION_FAILED", msg),
            AuthError::TokenExpired => ("TOKEN_EXPIRED", "Token has expired".to_string()),
        };

        let body = ErrorResponse {
            message,
            code: code.to_string(),
            retryable: false,
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn extract_token(auth_header: &str) -> Result<&str, AuthError> {
    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidTokenFormat),
    }
}

/// Validate JWT token and resolve the requester
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Identity, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = config.validate_exp;
    validation.required_spec_claims.clear();
    if config.validate_exp {
        validation.required_spec_claims.insert("exp".to_string());
    }

    let key = DecodingKey::from_secret(config.secret.as_bytes());
    let claims = decode::<AuthClaims>(token, &key, &validation)
        .map_err(|e| {
            if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                AuthError::TokenExpired
            } else {
                AuthError::ValidationFailed(e.to_string())
            }
        })?
        .claims;

    claims
        .sub
        .or(claims.id)
        .filter(|owner_id| !owner_id.is_empty())
        .map(|owner_id| Identity { owner_id })
        .ok_or_else(|| AuthError::ValidationFailed("token carries no subject".into()))
}

/// Authentication state for sharing config
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<JwtConfig>,
}

impl AuthState {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Require authentication middleware
///
/// Validates the bearer token and stores the [`Identity`] in request extensions.
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = extract_token(auth_header)?;
    let identity = validate_token(token, &auth_state.config).map_err(|e| {
        tracing::debug!(error = ?e, "rejected bearer token");
        e
    })?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    fn sign(claims: &AuthClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> u64 {
        (chrono::Utc::now().timestamp() + 3600) as u64
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(JwtConfig::try_new("short").is_err());
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Bearer abc").unwrap(), "abc");
        assert!(extract_token("Basic abc").is_err());
        assert!(extract_token("Bearer ").is_err());
    }

    #[test]
    fn test_subject_becomes_owner() {
        let config = JwtConfig::try_new(SECRET).unwrap();
        let token = sign(
            &AuthClaims {
                sub: Some("owner-1".into()),
                id: None,
                exp: future_exp(),
            },
            SECRET,
        );
        assert_eq!(validate_token(&token, &config).unwrap().owner_id, "owner-1");
    }

    #[test]
    fn test_legacy_id_claim() {
        let config = JwtConfig::try_new(SECRET).unwrap();
        let token = sign(
            &AuthClaims {
                sub: None,
                id: Some("owner-2".into()),
                exp: future_exp(),
            },
            SECRET,
        );
        assert_eq!(validate_token(&token, &config).unwrap().owner_id, "owner-2");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = JwtConfig::try_new(SECRET).unwrap();
        let token = sign(
            &AuthClaims {
                sub: Some("owner-1".into()),
                id: None,
                exp: future_exp(),
            },
            "another-secret-that-is-also-long-enough",
        );
        assert!(matches!(
            validate_token(&token, &config),
            Err(AuthError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_expired_rejected() {
        let config = JwtConfig::try_new(SECRET).unwrap();
        let token = sign(
            &AuthClaims {
                sub: Some("owner-1".into()),
                id: None,
                exp: 1_000,
            },
            SECRET,
        );
        assert!(matches!(
            validate_token(&token, &config),
            Err(AuthError::TokenExpired)
        ));
    }
}
