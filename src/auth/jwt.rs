use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{Claims, Role};
use crate::error::AppError;

pub const ACCESS_TTL_SECS: usize = 15 * 60;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal_with_source("Token encoding failed", err))
}

/// Checks signature and expiry of an HS256 access token.
pub fn decode_token(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    Ok(decode::<Claims>(token, &keys.dec, &validation)?.claims)
}

pub fn make_access_claims(user_id: i32, roles: Vec<Role>, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    Claims {
        sub: user_id.to_string(),
        roles,
        iat,
        exp: iat + ttl_secs,
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "rejected access token");
        AppError::unauthorized("Invalid or expired token")
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;

    use super::{JwtKeys, Role, decode_token, encode_token, make_access_claims};

    #[test]
    fn makes_claims_with_numeric_subject_and_ttl() {
        let claims = make_access_claims(17, vec![Role::User], 60);

        assert_eq!(claims.sub, "17");
        assert_eq!(claims.roles, vec![Role::User]);
        assert_eq!(claims.exp.saturating_sub(claims.iat), 60);
    }

    #[test]
    fn token_decodes_with_same_secret() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_access_claims(3, vec![Role::Admin, Role::User], 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        let decoded = decode_token(&keys, &token).expect("token should decode");
        assert_eq!(decoded.sub, "3");
        assert_eq!(decoded.roles, claims.roles);
    }

    #[test]
    fn foreign_secret_is_unauthorized() {
        let claims = make_access_claims(3, vec![Role::User], 600);
        let token = encode_token(&JwtKeys::from_secret(b"secret-a"), &claims)
            .expect("token should encode");

        let err = decode_token(&JwtKeys::from_secret(b"secret-b"), &token)
            .expect_err("decode should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.message(), "Invalid or expired token");
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let mut claims = make_access_claims(3, vec![Role::User], 0);
        claims.iat = 1_000;
        claims.exp = 1_000;
        let token = encode_token(&keys, &claims).expect("token should encode");

        assert!(matches!(
            decode_token(&keys, &token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
