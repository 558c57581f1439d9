use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::models::token_models::Claims;

/// Tokens are issued by the accounts service; this mirrors its format so
/// operators and tests can mint one for a known user id.
pub fn generate_jwt(user_id: &str, secret: &[u8]) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now() + Duration::hours(720); // 30 days
    let claims = Claims {
        sub: user_id.to_owned(),
        exp: expiration.timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

pub fn verify_jwt(token: &str, secret: &[u8]) -> Option<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .ok()
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let token = generate_jwt("42", b"kitchen").unwrap();
        let claims = verify_jwt(&token, b"kitchen").unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
    }

    #[test]
    fn token_rejected_with_other_secret() {
        let token = generate_jwt("42", b"kitchen").unwrap();
        assert!(verify_jwt(&token, b"pantry").is_none());
        assert!(verify_jwt("not-a-token", b"kitchen").is_none());
    }

    #[test]
    fn expired_token_rejected() {
        let claims = Claims {
            sub: "1".into(),
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"kitchen")).unwrap();
        assert!(verify_jwt(&token, b"kitchen").is_none());
    }
}
