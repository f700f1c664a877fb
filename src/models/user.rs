//! User model and authentication claims
//!
//! Authentication itself lives with the external identity provider; this
//! server only verifies bearer tokens and keeps the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// User model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Check if user is a privileged administrator
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Require the claims to belong to `user_id`, or admin privileges
    pub fn require_self_or_admin(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Cannot access another user's data".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(is_admin: bool) -> UserClaims {
        UserClaims {
            sub: "reader".to_string(),
            user_id: 7,
            is_admin,
            exp: (Utc::now().timestamp()) + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_round_trip() {
        let claims = claims(true);
        let token = claims.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert!(parsed.is_admin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = claims(false).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn self_or_admin_gate() {
        let user = claims(false);
        assert!(user.require_self_or_admin(7).is_ok());
        assert!(user.require_self_or_admin(8).is_err());
        assert!(claims(true).require_self_or_admin(8).is_ok());
    }
}
