use axum::extract::{FromRef, FromRequestParts};
use axum::http::{request::Parts, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::response::AppError;
use crate::state::AppState;

const TOKEN_TYPE: &str = "learner";
pub const TOKEN_COOKIE: &str = "token";

pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares fixed-length digests so the check does not leak the passphrase length.
pub fn passphrase_matches(given: &str, expected: &str) -> bool {
    let given = sha256_hex(given);
    let expected = sha256_hex(expected);
    given
        .bytes()
        .zip(expected.bytes())
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub jti: String,
}

pub fn sign_jwt_for_user(name: &str, secret: &str, expires_in_hours: u64) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = i64::try_from(expires_in_hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::internal("jwt expiry out of range"))?;
    let claims = Claims {
        sub: name.to_string(),
        token_type: TOKEN_TYPE.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(&format!("jwt sign failed: {e}")))
}

pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    if claims.token_type != TOKEN_TYPE {
        return Err(AppError::unauthorized("Invalid token type"));
    }
    Ok(claims)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{TOKEN_COOKIE}=");
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookie| cookie.split(';'))
        .find_map(|part| part.trim().strip_prefix(prefix.as_str()).map(str::to_string))
}

pub fn extract_token_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    bearer_token(headers)
        .or_else(|| cookie_token(headers))
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))
}

/// The logged-in learner. A valid token is not enough: the name it carries must
/// still be the persisted identity, so logging out retires every issued token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub name: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = extract_token_from_headers(&parts.headers)?;
        let claims = verify_jwt(&token, &app_state.config().jwt_secret)?;

        let desk = app_state.desk().await;
        match desk.session().user() {
            Some(user) if user.name == claims.sub => Ok(AuthUser { name: claims.sub }),
            _ => Err(AppError::unauthorized("Session ended, please log in again")),
        }
    }
}
