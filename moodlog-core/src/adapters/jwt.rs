//! HS256 JSON Web Tokens

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::AccountId;
use crate::ports::TokenService;

/// Registered claims carried by every token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Account id, as a decimal string
    sub: String,
    iat: i64,
    exp: i64,
}

/// Token service signing with a shared secret
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenService {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Config("JWT secret cannot be empty".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: AccountId, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::Token(format!("token lifetime {} is out of range", ttl)))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Token(format!("Failed to sign token: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<AccountId> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => Error::unauthenticated("token expired"),
                _ => Error::unauthenticated(format!("invalid token: {}", e)),
            }
        })?;

        data.claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| Error::unauthenticated("token subject is not an account id"))
    }
}
