use std::fmt;

use serde::Serialize;

use crate::error::StudyError;
use crate::quiz::flashcard::FlashcardDeck;
use crate::quiz::recall::RecallQuiz;
use crate::quiz::spelling::SpellingQuiz;
use crate::quiz::ResultRecord;

/// Where the visit currently is, with the live quiz state of that stage.
#[derive(Debug, Clone)]
pub enum StudyStage {
    Idle,
    Flashcard(FlashcardDeck),
    Recall(RecallQuiz),
    Spelling(SpellingQuiz),
    ResultReady,
    ReportViewed,
    RetrySpelling(SpellingQuiz),
    RetryResultReady(Vec<ResultRecord>),
}

impl StudyStage {
    pub fn kind(&self) -> StageKind {
        match self {
            StudyStage::Idle => StageKind::Idle,
            StudyStage::Flashcard(_) => StageKind::FlashcardActive,
            StudyStage::Recall(_) => StageKind::RecallActive,
            StudyStage::Spelling(_) => StageKind::SpellingActive,
            StudyStage::ResultReady => StageKind::ResultReady,
            StudyStage::ReportViewed => StageKind::ReportViewed,
            StudyStage::RetrySpelling(_) => StageKind::RetrySpellingActive,
            StudyStage::RetryResultReady(_) => StageKind::RetryResultReady,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StageKind {
    Idle,
    FlashcardActive,
    RecallActive,
    SpellingActive,
    ResultReady,
    ReportViewed,
    RetrySpellingActive,
    RetryResultReady,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Idle => "idle",
            StageKind::FlashcardActive => "flashcardActive",
            StageKind::RecallActive => "recallActive",
            StageKind::SpellingActive => "spellingActive",
            StageKind::ResultReady => "resultReady",
            StageKind::ReportViewed => "reportViewed",
            StageKind::RetrySpellingActive => "retrySpellingActive",
            StageKind::RetryResultReady => "retryResultReady",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    StartFlashcards,
    CompleteFlashcards,
    FinishRecall,
    FinishSpelling,
    ViewReport,
    StartRetry,
    FinishRetry,
    Reset,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::StartFlashcards => "start flashcards",
            Action::CompleteFlashcards => "complete flashcards",
            Action::FinishRecall => "finish recall",
            Action::FinishSpelling => "finish spelling",
            Action::ViewReport => "view report",
            Action::StartRetry => "start retry",
            Action::FinishRetry => "finish retry",
            Action::Reset => "reset",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition table of the study pipeline.
///
/// The retry branch never leads back into the main pipeline; only `Reset` leaves it.
pub fn next_stage(from: StageKind, action: Action) -> Result<StageKind, StudyError> {
    use StageKind::*;

    let to = match (from, action) {
        (_, Action::Reset) => Idle,
        (Idle, Action::StartFlashcards) => FlashcardActive,
        (FlashcardActive, Action::CompleteFlashcards) => RecallActive,
        (RecallActive, Action::FinishRecall) => SpellingActive,
        (SpellingActive, Action::FinishSpelling) => ResultReady,
        (ResultReady | ReportViewed, Action::ViewReport) => ReportViewed,
        (ResultReady | ReportViewed | RetryResultReady, Action::StartRetry) => RetrySpellingActive,
        (RetrySpellingActive, Action::FinishRetry) => RetryResultReady,
        _ => return Err(StudyError::InvalidTransition { from, action }),
    };
    Ok(to)
}
