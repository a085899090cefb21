use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::quiz::flashcard::FlashcardView;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::study::flow::StageKind;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/select", post(select_unit))
        .route("/state", get(get_state))
        .route("/reset", post(reset))
        .route("/flashcard/start", post(flashcard_start))
        .route("/flashcard/next", post(flashcard_next))
        .route("/flashcard/prev", post(flashcard_prev))
        .route("/flashcard/flip", post(flashcard_flip))
        .route("/flashcard/toggle-order", post(flashcard_toggle_order))
        .route("/flashcard/pronounce", post(flashcard_pronounce))
        .route("/flashcard/complete", post(flashcard_complete))
        .route("/recall", get(recall_question))
        .route("/recall/answer", post(recall_answer))
        .route("/spelling", get(spelling_question))
        .route("/spelling/answer", post(spelling_answer))
        .route("/result", get(get_result))
        .route("/report", post(view_report))
        .route("/retry", post(start_retry))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub textbook_id: String,
    pub unit_id: String,
}

/// `index` names the question being answered; a stale index is refused.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub index: usize,
    pub answer: String,
}

/// Result of a step together with the stage the flow landed in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Step<T: Serialize> {
    stage: StageKind,
    #[serde(flatten)]
    payload: T,
}

#[derive(Debug, Serialize)]
struct Card {
    card: Option<FlashcardView>,
}

async fn select_unit(
    _user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SelectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let selection = state
        .desk_mut()
        .await
        .select_unit(&req.textbook_id, &req.unit_id)?;
    Ok(ok(selection))
}

async fn get_state(_user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    ok(state.desk().await.snapshot())
}

async fn reset(_user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    let mut desk = state.desk_mut().await;
    desk.reset();
    ok(desk.snapshot())
}

async fn flashcard_start(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut desk = state.desk_mut().await;
    let card = desk.start_flashcards()?;
    Ok(ok(Step {
        stage: desk.stage_kind(),
        payload: Card { card },
    }))
}

async fn flashcard_next(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let card = state.desk_mut().await.flashcard_next()?;
    Ok(ok(Card { card }))
}

async fn flashcard_prev(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let card = state.desk_mut().await.flashcard_prev()?;
    Ok(ok(Card { card }))
}

async fn flashcard_flip(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let card = state.desk_mut().await.flashcard_flip()?;
    Ok(ok(Card { card }))
}

async fn flashcard_toggle_order(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let card = state.desk_mut().await.flashcard_toggle_order()?;
    Ok(ok(Card { card }))
}

async fn flashcard_pronounce(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let text = state.desk_mut().await.pronounce_current()?;
    Ok(ok(serde_json::json!({ "text": text })))
}

async fn flashcard_complete(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stage = state.desk_mut().await.complete_flashcards()?;
    Ok(ok(serde_json::json!({ "stage": stage })))
}

async fn recall_question(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let desk = state.desk().await;
    let question = desk.recall_question()?;
    Ok(ok(serde_json::json!({ "stage": desk.stage_kind(), "question": question })))
}

async fn recall_answer(
    _user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut desk = state.desk_mut().await;
    let feedback = desk.answer_recall(req.index, &req.answer)?;
    Ok(ok(Step {
        stage: desk.stage_kind(),
        payload: feedback,
    }))
}

async fn spelling_question(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let desk = state.desk().await;
    let question = desk.spelling_question()?;
    Ok(ok(serde_json::json!({ "stage": desk.stage_kind(), "question": question })))
}

async fn spelling_answer(
    _user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut desk = state.desk_mut().await;
    let feedback = desk.answer_spelling(req.index, &req.answer)?;
    Ok(ok(Step {
        stage: desk.stage_kind(),
        payload: feedback,
    }))
}

async fn get_result(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let handoff = state.desk().await.result()?;
    Ok(ok(handoff))
}

async fn view_report(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.desk_mut().await.view_report()?;
    Ok(ok(report))
}

async fn start_retry(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut desk = state.desk_mut().await;
    let question = desk.start_retry()?;
    Ok(ok(serde_json::json!({ "stage": desk.stage_kind(), "question": question })))
}
