use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::catalog::CatalogError;
use crate::error::StudyError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    fn operational(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::operational(StatusCode::UNAUTHORIZED, "AUTH_UNAUTHORIZED", message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::CONFLICT, code, message)
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            "Internal server error".to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

// Store failures are never the caller's fault; the message is logged, not exposed.
impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::internal(&value.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        AppError::internal(&value.to_string())
    }
}

impl From<StudyError> for AppError {
    fn from(value: StudyError) -> Self {
        let message = value.to_string();
        match value {
            StudyError::EmptyName => AppError::bad_request("EMPTY_NAME", &message),
            StudyError::BlankAnswer => AppError::bad_request("BLANK_ANSWER", &message),
            StudyError::UnknownOption => AppError::bad_request("UNKNOWN_OPTION", &message),
            StudyError::NoSelection => AppError::bad_request("NO_SELECTION", &message),
            StudyError::UnknownUnit { .. } => {
                AppError::operational(StatusCode::NOT_FOUND, "UNIT_NOT_FOUND", &message)
            }
            StudyError::InvalidTransition { .. } => AppError::conflict("INVALID_TRANSITION", &message),
            StudyError::WrongStage { .. } => AppError::conflict("WRONG_STAGE", &message),
            StudyError::AnswerLocked { .. } => AppError::conflict("ANSWER_LOCKED", &message),
            StudyError::DeckUnfinished => AppError::conflict("DECK_UNFINISHED", &message),
            StudyError::NothingToRetry => AppError::conflict("NOTHING_TO_RETRY", &message),
            StudyError::Store(e) => e.into(),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}
