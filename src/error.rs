use thiserror::Error;

use crate::store::StoreError;
use crate::study::flow::{Action, StageKind};

/// Errors raised while driving a study session.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("no unit is selected")]
    NoSelection,
    #[error("unit not found: textbook={textbook_id}, unit={unit_id}")]
    UnknownUnit {
        textbook_id: String,
        unit_id: String,
    },
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: StageKind, action: Action },
    #[error("operation not available while {actual}")]
    WrongStage { actual: StageKind },
    #[error("question {index} is not the open question")]
    AnswerLocked { index: usize },
    #[error("option is not offered for this question")]
    UnknownOption,
    #[error("answer must not be blank")]
    BlankAnswer,
    #[error("flashcards are not finished")]
    DeckUnfinished,
    #[error("there are no wrong answers to retry")]
    NothingToRetry,
    #[error(transparent)]
    Store(#[from] StoreError),
}
