//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using a shared secret and carry the username
//! as subject plus issued-at and expiry timestamps.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Algorithm used for every token this service issues or accepts
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Longest lifetime a token may be configured with, in seconds (one year)
pub const MAX_TOKEN_EXPIRY: u64 = 365 * 24 * 60 * 60;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Lifetime of tokens issued at login, in seconds (default: 30 minutes)
    pub access_token_expiry: u64,
    /// Lifetime used when a caller does not ask for one, in seconds (default: 15 minutes)
    pub default_token_expiry: u64,
}

impl JwtConfig {
    /// Create a config with the default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: 1800,
            default_token_expiry: 900,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder
    pub sub: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("invalid jwt configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to sign token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl: Duration,
    default_ttl: Duration,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::InvalidConfig(
                "secret must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("access token expiry", config.access_token_expiry),
            ("default token expiry", config.default_token_expiry),
        ] {
            if value == 0 || value > MAX_TOKEN_EXPIRY {
                return Err(TokenError::InvalidConfig(format!(
                    "{} must be between 1 and {} seconds",
                    name, MAX_TOKEN_EXPIRY
                )));
            }
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_token_ttl: Duration::seconds(config.access_token_expiry as i64),
            default_ttl: Duration::seconds(config.default_token_expiry as i64),
        })
    }

    /// Issue a token for `subject`, valid for `ttl` or the default lifetime
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now(), ttl.unwrap_or(self.default_ttl))
    }

    pub(crate) fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(TokenError::Encoding)
    }

    /// Validate a token and return its claims
    ///
    /// A token is valid only while the current time is strictly before `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        // jsonwebtoken still accepts exp == now
        if token_data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(token_data.claims)
    }

    /// Lifetime of tokens issued at login
    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }
}
