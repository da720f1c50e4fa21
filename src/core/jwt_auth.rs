use actix_web::dev::Payload;
use actix_web::{http, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::core::config::JwtAuthConfig;
use crate::core::AppError;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

/// Claims issued by the identity service. `sub` is the account id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// The caller behind a request, as vouched for by a verified bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
    pub role: Role,
}

impl AuthenticatedAccount {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequest for AuthenticatedAccount {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedAccount, AppError> {
    let jwt_config = req
        .app_data::<web::Data<JwtAuthConfig>>()
        .ok_or_else(|| AppError::internal_error("JWT configuration is not registered"))?;

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("Invalid login credentials"))?;

    let claims = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::unauthorized("Invalid token"))?
    .claims;

    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::unauthorized("Invalid account ID in token"))?;

    Ok(AuthenticatedAccount {
        account_id,
        role: claims.role,
    })
}

/// Mint a token the way the identity service does. Used by operational
/// tooling and the HTTP test-suite.
pub fn generate_jwt_token(claims: &JwtClaims, config: &JwtAuthConfig) -> Result<String, AppError> {
    let encoding_key = EncodingKey::from_secret(config.secret.expose_secret().as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|_| AppError::internal_error("Failed to generate JWT token"))
}

/// Claims for `account_id` expiring after the configured lifetime.
pub fn claims_for(account_id: Uuid, role: Role, config: &JwtAuthConfig) -> JwtClaims {
    let expires_at = chrono::Utc::now() + chrono::Duration::seconds(config.token_expiration_time);
    JwtClaims {
        sub: account_id.to_string(),
        role,
        exp: expires_at.timestamp() as usize,
    }
}
