use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;

use crate::{dto::auth::Claims, error::{AppError, AppResult}, models::user::AuthUser};

/// Verifies bearer tokens signed with the secret shared with the auth service.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Sign a token for `user_id`. Tokens are normally issued by the auth
    /// service; this is used by tooling and tests.
    pub fn issue_token(&self, user_id: &ObjectId, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_hex(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.jwt_secret.as_ref()))
            .map_err(|e| {
                tracing::error!("Failed to sign token: {}", e);
                AppError::Unauthorized
            })
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::warn!("Token validation failed: {}", e);
            AppError::Unauthorized
        })?;

        Ok(token_data.claims)
    }

    /// Validate a token and resolve the caller it names.
    pub fn authenticate(&self, token: &str) -> AppResult<AuthUser> {
        let claims = self.validate_token(token)?;
        let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| {
            tracing::warn!("Token subject is not a user id: {}", claims.sub);
            AppError::Unauthorized
        })?;
        Ok(AuthUser { user_id })
    }
}
