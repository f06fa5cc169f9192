use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

use super::claims::{Claims, Token};
use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),
    /// Bad signature, foreign algorithm, malformed or expired. Callers cannot
    /// tell these apart; the reason is only logged.
    #[error("token verification failed")]
    Verification,
}

pub trait Tokenizer: Send + Sync {
    fn generate(&self, username: &str, timezone: &str) -> Result<Token, TokenError>;
    fn verify(&self, token: &str) -> Result<(), TokenError>;
    fn extract_claims(&self, token: &str) -> Result<Claims, TokenError>;
}

pub type SharedTokenizer = Arc<dyn Tokenizer>;

/// HMAC-signed JWTs with a fixed lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    has_secret: bool,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            has_secret: !secret.is_empty(),
            ttl,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, Duration::minutes(config.ttl_minutes))
    }

    pub(crate) fn generate_at(
        &self,
        username: &str,
        timezone: &str,
        now: DateTime<Utc>,
    ) -> Result<Token, TokenError> {
        if !self.has_secret {
            return Err(TokenError::Signing("empty signing key".into()));
        }
        let exp = now + self.ttl;
        let claims = Claims {
            username: username.to_string(),
            timezone: timezone.to_string(),
            iss: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(username, "jwt signed");
        Ok(Token {
            value,
            expires_at: exp,
        })
    }

    pub(crate) fn extract_claims_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "jwt header unreadable");
            TokenError::Verification
        })?;
        if !matches!(header.alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            debug!(alg = ?header.alg, "jwt signed with non-hmac algorithm");
            return Err(TokenError::Verification);
        }

        // expiry is checked below against `now` with no leeway
        let mut validation = Validation::new(header.alg);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                debug!(error = %e, "jwt rejected");
                TokenError::Verification
            })?
            .claims;

        if claims.iss != claims.username {
            debug!(username = %claims.username, "jwt issuer mismatch");
            return Err(TokenError::Verification);
        }
        if now.timestamp() >= claims.exp {
            debug!(username = %claims.username, "jwt expired");
            return Err(TokenError::Verification);
        }
        debug!(username = %claims.username, "jwt verified");
        Ok(claims)
    }
}

impl Tokenizer for JwtKeys {
    fn generate(&self, username: &str, timezone: &str) -> Result<Token, TokenError> {
        self.generate_at(username, timezone, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<(), TokenError> {
        self.extract_claims_at(token, Utc::now()).map(|_| ())
    }

    fn extract_claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.extract_claims_at(token, Utc::now())
    }
}
