use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::catalog::{Textbook, Unit, Word};
use crate::progress::{ProgressStore, StageFlags, UnitStatus};
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_textbooks))
        .route("/:textbook_id/units/:unit_id", get(get_unit))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitCard {
    id: String,
    title: String,
    word_count: usize,
    status: UnitStatus,
    repetition: u32,
}

impl UnitCard {
    fn new(unit: &Unit, progress: &ProgressStore) -> Self {
        Self {
            id: unit.id.clone(),
            title: unit.title.clone(),
            word_count: unit.words.len(),
            status: progress.unit_status(&unit.id),
            repetition: progress.repetition(&unit.id),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextbookCard {
    id: String,
    title: String,
    units: Vec<UnitCard>,
}

impl TextbookCard {
    fn new(book: &Textbook, progress: &ProgressStore) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            units: book.units.iter().map(|u| UnitCard::new(u, progress)).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitDetail {
    textbook_id: String,
    textbook_title: String,
    id: String,
    title: String,
    words: Vec<Word>,
    progress: StageFlags,
    status: UnitStatus,
    repetition: u32,
}

async fn list_textbooks(_user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    let desk = state.desk().await;
    let books: Vec<TextbookCard> = desk
        .catalog()
        .textbooks
        .iter()
        .map(|book| TextbookCard::new(book, desk.progress()))
        .collect();
    ok(books)
}

async fn get_unit(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((textbook_id, unit_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let desk = state.desk().await;
    let (book, unit) = desk
        .catalog()
        .find_unit(&textbook_id, &unit_id)
        .ok_or_else(|| AppError::not_found("Unit not found"))?;
    let progress = desk.progress();

    Ok(ok(UnitDetail {
        textbook_id: book.id.clone(),
        textbook_title: book.title.clone(),
        id: unit.id.clone(),
        title: unit.title.clone(),
        words: unit.words.clone(),
        progress: progress.flags(&unit.id),
        status: progress.unit_status(&unit.id),
        repetition: progress.repetition(&unit.id),
    }))
}
