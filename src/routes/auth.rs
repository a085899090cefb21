use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::{passphrase_matches, sign_jwt_for_user, AuthUser, TOKEN_COOKIE};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::session::User;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub name: String,
    #[serde(default)]
    pub passphrase: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, AppError> {
    if !passphrase_matches(&req.passphrase, &state.config().access_passphrase) {
        tracing::warn!("Login rejected: wrong passphrase");
        return Err(AppError::unauthorized("Wrong passphrase"));
    }

    let user = state.desk_mut().await.login(&req.name)?;
    let token = sign_jwt_for_user(
        &user.name,
        &state.config().jwt_secret,
        state.config().jwt_expires_in_hours,
    )?;

    let max_age = state.config().jwt_expires_in_hours.saturating_mul(3600);
    let cookie = format!("{TOKEN_COOKIE}={token}; Path=/; Max-Age={max_age}; SameSite=Strict; HttpOnly");
    let mut response = ok(LoginResponse { token, user }).into_response();
    set_cookie(&mut response, &cookie)?;
    Ok(response)
}

async fn logout(auth_user: AuthUser, State(state): State<AppState>) -> Result<Response, AppError> {
    state.desk_mut().await.logout()?;
    tracing::debug!(user = %auth_user.name, "Session closed");

    let mut response = ok(serde_json::json!({ "loggedOut": true })).into_response();
    set_cookie(
        &mut response,
        &format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0; SameSite=Strict; HttpOnly"),
    )?;
    Ok(response)
}

async fn me(auth_user: AuthUser) -> impl IntoResponse {
    ok(User {
        name: auth_user.name,
    })
}

fn set_cookie(response: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::internal(&format!("cookie header rejected: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}
