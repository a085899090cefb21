use axum::http::Method;
use axum::Router;

use super::fixtures::TEST_PASSPHRASE;
use super::http::{request, response_json};

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn login_and_get_token(app: &Router, name: &str) -> String {
    let response = request(
        app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({ "name": name, "passphrase": TEST_PASSPHRASE })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert!(status.is_success(), "login failed: {body}");
    body["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}
