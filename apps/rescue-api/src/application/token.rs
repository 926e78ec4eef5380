//! Signed session tokens (HS256 JWT) for authenticated principals.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_lib::Principal;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HS256 needs a key of at least 256 bits.
pub const MIN_SECRET_LENGTH: usize = 32;

const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("{0}")]
    Configuration(String),
    #[error("Token signature does not match")]
    Signature,
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Token has expired")]
    Expired,
    #[error("Failed to sign token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::Signature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Claims carried by every session token. Caller supplied claims are
/// flattened next to the registered ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// String value of a custom claim, e.g. `role`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Refuses secrets shorter than [`MIN_SECRET_LENGTH`] characters so the
    /// service never starts with a weak key.
    pub fn new(secret: &str, ttl_ms: i64) -> Result<Self, TokenError> {
        if secret.chars().count() < MIN_SECRET_LENGTH {
            return Err(TokenError::Configuration(
                "JWT secret must be at least 256 bits (32 characters)".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::milliseconds(ttl_ms),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn generate_token_for(&self, principal: &impl Principal) -> Result<String, TokenError> {
        self.generate_token(principal, Map::new())
    }

    pub fn generate_token(
        &self,
        principal: &impl Principal,
        extra_claims: Map<String, Value>,
    ) -> Result<String, TokenError> {
        self.generate_token_at(principal, extra_claims, Utc::now())
    }

    /// Same as [`generate_token`](Self::generate_token) with an explicit issue time.
    pub fn generate_token_at(
        &self,
        principal: &impl Principal,
        mut extra_claims: Map<String, Value>,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        for reserved in RESERVED_CLAIMS {
            extra_claims.remove(reserved);
        }
        let claims = Claims {
            sub: principal.username().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            extra: extra_claims,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        // `exp` has whole-second precision; compare in milliseconds so a token
        // issued with a sub-second negative TTL is already expired.
        if data.claims.exp.saturating_mul(1000) <= Utc::now().timestamp_millis() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }

    pub fn extract_claim<T>(
        &self,
        token: &str,
        selector: impl FnOnce(&Claims) -> T,
    ) -> Result<T, TokenError> {
        let claims = self.decode_claims(token)?;
        Ok(selector(&claims))
    }

    pub fn extract_username(&self, token: &str) -> Result<String, TokenError> {
        self.extract_claim(token, |claims| claims.sub.clone())
    }

    pub fn extract_expiration(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        let exp = self.extract_claim(token, |claims| claims.exp)?;
        Utc.timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| TokenError::Malformed(format!("exp out of range: {exp}")))
    }

    /// `Ok(true)` when the token belongs to `principal` and is still valid,
    /// `Ok(false)` for another principal. Expired tokens fail with
    /// [`TokenError::Expired`] instead of returning `false`.
    pub fn validate_token(
        &self,
        token: &str,
        principal: &impl Principal,
    ) -> Result<bool, TokenError> {
        let claims = self.decode_claims(token)?;
        Ok(claims.sub == principal.username())
    }
}
