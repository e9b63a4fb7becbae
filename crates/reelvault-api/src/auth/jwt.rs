//! HS256 access tokens.

use super::models::JwtClaims;
use super::Authenticator;
use crate::constants::JWT_ISSUER;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reelvault_core::AppError;
use uuid::Uuid;

/// Validates tokens signed with the shared `JWT_SECRET`.
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AppError::Unauthorized("Invalid token issuer".to_string())
                    }
                    _ => AppError::Unauthorized("Couldn't validate JWT".to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, credential: &str) -> Result<Uuid, AppError> {
        let claims = self.validate_token(credential)?;
        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

/// Issue an access token for `user_id`.
pub fn make_jwt(
    user_id: Uuid,
    secret: &str,
    expires_in: chrono::Duration,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        iss: JWT_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn round_trip_resolves_user() {
        let user = Uuid::new_v4();
        let token = make_jwt(user, SECRET, chrono::Duration::hours(1)).unwrap();
        let auth = JwtAuthenticator::new(SECRET);
        assert_eq!(auth.authenticate(&token).unwrap(), user);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, chrono::Duration::seconds(-60)).unwrap();
        let err = JwtAuthenticator::new(SECRET).authenticate(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Token has expired"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, chrono::Duration::hours(1)).unwrap();
        let other = JwtAuthenticator::new("ffffffffffffffffffffffffffffffff");
        assert!(matches!(
            other.authenticate(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            iss: "someone-else".to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = JwtAuthenticator::new(SECRET).authenticate(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid token issuer"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(JwtAuthenticator::new(SECRET).authenticate("not-a-jwt").is_err());
    }
}
