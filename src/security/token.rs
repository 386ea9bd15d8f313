use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::ObjectId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TokenError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,
    #[error("Invalid authorization scheme")]
    InvalidAuthScheme,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Token subject is not a user id: {0}")]
    BadSubject(String),
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// The verified acting user of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: ObjectId,
}

/// HS256 keys plus the issuer/audience pair every token must carry.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8], issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn issue(&self, user_id: ObjectId, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_hex(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validates signature, issuer, audience and expiry.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            let err = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            };
            warn!(error = %err, "Token rejected");
            err
        })?;

        let user_id = ObjectId::parse_str(&data.claims.sub)
            .map_err(|_| TokenError::BadSubject(data.claims.sub.clone()))?;
        debug!(sub = %user_id, "Token verified");
        Ok(Principal { user_id })
    }

    /// Verifies a raw `Authorization` header value.
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Principal, TokenError> {
        let header = header.ok_or(TokenError::MissingAuthHeader)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(TokenError::InvalidAuthScheme)?;
        self.verify(token.trim())
    }
}
