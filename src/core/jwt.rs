use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    /// Unique per token, so two tokens minted in the same second differ.
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Failed to sign token")]
    TokenCreation,
    #[error("Token has expired")]
    TokenExpired,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::InvalidToken,
        }
    }
}

pub fn create_token(
    user_id: i64,
    username: &str,
    ttl: Duration,
    secret: &str,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let expire_time = now + ttl;

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        jti: Uuid::new_v4().to_string(),
        exp: expire_time.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| JwtError::TokenCreation)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = create_token(7, "alice", Duration::minutes(5), "secret").unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(7, "alice", Duration::minutes(5), "secret").unwrap();
        assert_eq!(
            verify_token(&token, "other").unwrap_err(),
            JwtError::InvalidToken
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        // well past the default validation leeway
        let token = create_token(7, "alice", Duration::minutes(-10), "secret").unwrap();
        assert_eq!(
            verify_token(&token, "secret").unwrap_err(),
            JwtError::TokenExpired
        );
    }

    #[test]
    fn tokens_minted_together_differ() {
        let a = create_token(7, "alice", Duration::days(1), "secret").unwrap();
        let b = create_token(7, "alice", Duration::days(1), "secret").unwrap();
        assert_ne!(a, b);
    }
}
