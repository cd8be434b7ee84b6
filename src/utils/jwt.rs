// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::user::ProfileUpdate};

/// JWT Claims issued by the identity provider.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject - the provider's user id.
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub picture: Option<String>,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Local profile fields derived from the token.
    /// Display name falls back to the email address, then to "User".
    pub fn profile_update(&self) -> ProfileUpdate {
        let email = self.email.clone().unwrap_or_default();
        let name = self
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(email.clone()).filter(|e| !e.is_empty()))
            .unwrap_or_else(|| "User".to_string());

        ProfileUpdate {
            id: self.sub.clone(),
            name,
            email,
            email_verified: self.email_verified.unwrap_or(false),
            image: self.picture.clone(),
        }
    }
}

/// Display fields to embed when issuing a token.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub picture: Option<String>,
}

/// Signs a JWT for a user. Used for development and test tokens;
/// production tokens come from the identity provider.
pub fn sign_jwt(identity: &Identity, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: identity.user_id.clone(),
        name: identity.name.clone(),
        email: identity.email.clone(),
        email_verified: Some(identity.email_verified),
        picture: identity.picture.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(AppError::AuthError("Token has no subject".to_string()));
    }

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects `Claims`
/// into the request extensions. Missing or invalid tokens get 401 so the
/// client can send the user to sign-in.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return Err(AppError::AuthError("Sign-in required".to_string())),
    };

    let claims = verify_jwt(token, &config.jwt_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit_test_secret";

    #[test]
    fn sign_then_verify() {
        let identity = Identity {
            user_id: "user_42".to_string(),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        let token = sign_jwt(&identity, SECRET, 60).unwrap();
        let claims = verify_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), "user_42");
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let identity = Identity {
            user_id: "user_42".to_string(),
            ..Default::default()
        };
        let token = sign_jwt(&identity, SECRET, 60).unwrap();
        assert!(matches!(
            verify_jwt(&token, "other_secret"),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn profile_name_fallbacks() {
        let mut claims = Claims {
            sub: "user_1".to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            email_verified: Some(true),
            picture: None,
            exp: 0,
        };
        assert_eq!(claims.profile_update().name, "Ada");

        claims.name = None;
        assert_eq!(claims.profile_update().name, "ada@example.com");

        claims.email = None;
        let profile = claims.profile_update();
        assert_eq!(profile.name, "User");
        assert_eq!(profile.email, "");
        assert!(profile.email_verified);
    }
}
