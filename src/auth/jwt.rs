use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{ERole, Id};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Id,
    pub username: String,
    pub roles: Vec<ERole>,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Id, username: String, roles: Vec<ERole>, ttl_minutes: i64) -> Self {
        Self {
            sub: user_id,
            username,
            roles,
            exp: (Utc::now() + Duration::minutes(ttl_minutes)).timestamp(),
        }
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_roles() {
        let claims = Claims::new(7, "pm".to_string(), vec![ERole::ProjectManager], 5);
        let token = encode_token(&claims, "secret").unwrap();
        let decoded = decode_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, 7);
        assert_eq!(decoded.roles, vec![ERole::ProjectManager]);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let claims = Claims::new(1, "u".to_string(), vec![ERole::User], 5);
        let token = encode_token(&claims, "secret").unwrap();
        assert!(decode_token(&token, "other").is_err());

        let expired = Claims::new(1, "u".to_string(), vec![ERole::User], -10);
        let token = encode_token(&expired, "secret").unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }
}
