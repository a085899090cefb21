pub mod flow;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::audio::Pronouncer;
use crate::catalog::{Catalog, Unit};
use crate::error::StudyError;
use crate::progress::{ProgressStore, Stage, StageFlags};
use crate::quiz::flashcard::{FlashcardDeck, FlashcardView};
use crate::quiz::recall::{RecallQuestion, RecallQuiz};
use crate::quiz::spelling::{SpellingQuestion, SpellingQuiz};
use crate::quiz::{AnswerFeedback, TestType};
use crate::report::{Report, ReportHandoff};
use crate::session::{SessionState, User};
use crate::store::KeyValueStore;

use self::flow::{next_stage, Action, StageKind, StudyStage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    pub textbook_id: String,
    pub textbook_title: String,
    pub unit_id: String,
    pub unit_title: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySnapshot {
    pub user: Option<User>,
    pub selection: Option<SelectionSummary>,
    pub stage: StageKind,
    pub unit_progress: Option<StageFlags>,
    pub repetition: u32,
}

/// The study engine for one local profile.
///
/// Owns the progress store, the visit's session state and the current stage, and
/// applies every transition of the pipeline. All randomness comes from the injected rng.
pub struct StudyDesk {
    catalog: Arc<Catalog>,
    progress: ProgressStore,
    session: SessionState,
    stage: StudyStage,
    rng: StdRng,
    pronouncer: Arc<dyn Pronouncer>,
}

impl StudyDesk {
    pub fn new(
        catalog: Arc<Catalog>,
        kv: Arc<dyn KeyValueStore>,
        pronouncer: Arc<dyn Pronouncer>,
    ) -> Self {
        Self {
            catalog,
            progress: ProgressStore::load(kv.clone()),
            session: SessionState::restore(kv),
            stage: StudyStage::Idle,
            rng: StdRng::from_entropy(),
            pronouncer,
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn stage_kind(&self) -> StageKind {
        self.stage.kind()
    }

    pub fn snapshot(&self) -> StudySnapshot {
        let selection = self.session.selection().map(|s| SelectionSummary {
            textbook_id: s.textbook_id.clone(),
            textbook_title: s.textbook_title.clone(),
            unit_id: s.unit.id.clone(),
            unit_title: s.unit.title.clone(),
            word_count: s.unit.words.len(),
        });
        let unit_id = self.session.selection().map(|s| s.unit.id.as_str());
        StudySnapshot {
            user: self.session.user().cloned(),
            unit_progress: unit_id.map(|id| self.progress.flags(id)),
            repetition: unit_id.map(|id| self.progress.repetition(id)).unwrap_or(0),
            selection,
            stage: self.stage.kind(),
        }
    }

    pub fn login(&mut self, name: &str) -> Result<User, StudyError> {
        let user = self.session.login(name)?;
        tracing::info!(user = %user.name, "User logged in");
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), StudyError> {
        self.session.logout()?;
        self.stage = StudyStage::Idle;
        tracing::info!("User logged out");
        Ok(())
    }

    /// Picking a unit returns to the selection entry point, abandoning any quiz in flight.
    pub fn select_unit(&mut self, textbook_id: &str, unit_id: &str) -> Result<SelectionSummary, StudyError> {
        let catalog = Arc::clone(&self.catalog);
        let (book, unit) = catalog
            .find_unit(textbook_id, unit_id)
            .ok_or_else(|| StudyError::UnknownUnit {
                textbook_id: textbook_id.to_string(),
                unit_id: unit_id.to_string(),
            })?;
        self.session.select_unit(book, unit);
        self.reset();
        tracing::info!(textbook_id, unit_id, words = unit.words.len(), "Unit selected");
        self.snapshot().selection.ok_or(StudyError::NoSelection)
    }

    pub fn reset(&mut self) {
        if !matches!(self.stage, StudyStage::Idle) {
            tracing::debug!(from = %self.stage.kind(), "Returning to unit selection");
        }
        self.stage = StudyStage::Idle;
    }

    fn selected_unit(&self) -> Result<&Unit, StudyError> {
        self.session
            .selection()
            .map(|s| &s.unit)
            .ok_or(StudyError::NoSelection)
    }

    fn transition(&self, action: Action) -> Result<StageKind, StudyError> {
        next_stage(self.stage.kind(), action)
    }

    // Flashcards

    pub fn start_flashcards(&mut self) -> Result<Option<FlashcardView>, StudyError> {
        let words = self.selected_unit()?.words.clone();
        self.transition(Action::StartFlashcards)?;
        let deck = FlashcardDeck::new(words);
        let view = deck.view();
        self.stage = StudyStage::Flashcard(deck);
        Ok(view)
    }

    fn deck_mut(&mut self) -> Result<&mut FlashcardDeck, StudyError> {
        match &mut self.stage {
            StudyStage::Flashcard(deck) => Ok(deck),
            other => Err(StudyError::WrongStage {
                actual: other.kind(),
            }),
        }
    }

    pub fn flashcard(&self) -> Result<Option<FlashcardView>, StudyError> {
        match &self.stage {
            StudyStage::Flashcard(deck) => Ok(deck.view()),
            other => Err(StudyError::WrongStage {
                actual: other.kind(),
            }),
        }
    }

    pub fn flashcard_next(&mut self) -> Result<Option<FlashcardView>, StudyError> {
        let deck = self.deck_mut()?;
        deck.next();
        Ok(deck.view())
    }

    pub fn flashcard_prev(&mut self) -> Result<Option<FlashcardView>, StudyError> {
        let deck = self.deck_mut()?;
        deck.prev();
        Ok(deck.view())
    }

    pub fn flashcard_flip(&mut self) -> Result<Option<FlashcardView>, StudyError> {
        let deck = self.deck_mut()?;
        deck.flip();
        Ok(deck.view())
    }

    pub fn flashcard_toggle_order(&mut self) -> Result<Option<FlashcardView>, StudyError> {
        let deck = self.deck_mut()?;
        deck.toggle_order();
        Ok(deck.view())
    }

    /// Sends the current card's word to the audio port. Returns the spoken text.
    pub fn pronounce_current(&mut self) -> Result<Option<String>, StudyError> {
        let text = self.deck_mut()?.current_word().map(|w| w.word.clone());
        if let Some(text) = &text {
            self.pronouncer.pronounce(text);
        }
        Ok(text)
    }

    /// Marks the flashcard stage done and opens the recall quiz, which starts a
    /// new main test sequence.
    pub fn complete_flashcards(&mut self) -> Result<StageKind, StudyError> {
        if !self.deck_mut()?.is_on_last_card() {
            return Err(StudyError::DeckUnfinished);
        }
        self.transition(Action::CompleteFlashcards)?;
        let unit = self.selected_unit()?.clone();

        self.progress.set_stage(&unit.id, Stage::Flashcard, true)?;
        self.session.clear_results();
        let before = std::mem::replace(
            &mut self.stage,
            StudyStage::Recall(RecallQuiz::new(unit.words, &mut self.rng)),
        );
        tracing::info!(unit_id = %unit.id, "Flashcards completed, recall started");

        self.settle_or_restore(before)?;
        Ok(self.stage.kind())
    }

    // Recall

    pub fn recall_question(&self) -> Result<Option<RecallQuestion>, StudyError> {
        self.selected_unit()?;
        match &self.stage {
            StudyStage::Recall(quiz) => Ok(quiz.question()),
            other => Err(StudyError::WrongStage {
                actual: other.kind(),
            }),
        }
    }

    pub fn answer_recall(&mut self, index: usize, option: &str) -> Result<AnswerFeedback, StudyError> {
        let before = self.stage.clone();
        let feedback = match &mut self.stage {
            StudyStage::Recall(quiz) => quiz.answer(index, option, &mut self.rng)?,
            other => {
                return Err(StudyError::WrongStage {
                    actual: other.kind(),
                })
            }
        };
        self.settle_or_restore(before)?;
        Ok(feedback)
    }

    // Spelling (main and retry)

    pub fn spelling_question(&self) -> Result<Option<SpellingQuestion>, StudyError> {
        self.selected_unit()?;
        match &self.stage {
            StudyStage::Spelling(quiz) | StudyStage::RetrySpelling(quiz) => Ok(quiz.question()),
            other => Err(StudyError::WrongStage {
                actual: other.kind(),
            }),
        }
    }

    pub fn answer_spelling(&mut self, index: usize, input: &str) -> Result<AnswerFeedback, StudyError> {
        let before = self.stage.clone();
        let feedback = match &mut self.stage {
            StudyStage::Spelling(quiz) | StudyStage::RetrySpelling(quiz) => quiz.answer(index, input)?,
            other => {
                return Err(StudyError::WrongStage {
                    actual: other.kind(),
                })
            }
        };
        self.settle_or_restore(before)?;
        Ok(feedback)
    }

    /// Runs the pending hand-offs. When one fails, the stage goes back to `before`
    /// so the last step can be submitted again.
    fn settle_or_restore(&mut self, before: StudyStage) -> Result<(), StudyError> {
        if let Err(e) = self.settle_finished_quizzes() {
            tracing::warn!(error = %e, stage = %before.kind(), "Stage hand-off failed, step rolled back");
            self.stage = before;
            return Err(e);
        }
        Ok(())
    }

    /// Applies the hand-offs of every quiz that has run out of words. Empty units
    /// pass straight through with zero iterations.
    fn settle_finished_quizzes(&mut self) -> Result<(), StudyError> {
        loop {
            match &self.stage {
                StudyStage::Recall(quiz) if quiz.is_finished() => self.finish_recall()?,
                StudyStage::Spelling(quiz) if quiz.is_finished() => self.finish_spelling()?,
                StudyStage::RetrySpelling(quiz) if quiz.is_finished() => self.finish_retry()?,
                _ => return Ok(()),
            }
        }
    }

    fn finish_recall(&mut self) -> Result<(), StudyError> {
        self.transition(Action::FinishRecall)?;
        let unit = self.selected_unit()?.clone();
        self.progress.set_stage(&unit.id, Stage::Recall, true)?;
        let results = match std::mem::replace(&mut self.stage, StudyStage::Idle) {
            StudyStage::Recall(quiz) => quiz.into_results(),
            other => {
                let actual = other.kind();
                self.stage = other;
                return Err(StudyError::WrongStage { actual });
            }
        };
        let correct = results.iter().filter(|r| r.is_correct).count();
        tracing::info!(unit_id = %unit.id, total = results.len(), correct, "Recall finished");
        self.session.record_result(TestType::Recall, results);
        self.stage = StudyStage::Spelling(SpellingQuiz::main(&unit.words, &mut self.rng));
        Ok(())
    }

    fn finish_spelling(&mut self) -> Result<(), StudyError> {
        self.transition(Action::FinishSpelling)?;
        let unit_id = self.selected_unit()?.id.clone();
        self.progress.set_stage(&unit_id, Stage::Spelling, true)?;
        let repetition = self.progress.increment_repetition(&unit_id)?;
        let results = match std::mem::replace(&mut self.stage, StudyStage::Idle) {
            StudyStage::Spelling(quiz) => quiz.into_results(),
            other => {
                let actual = other.kind();
                self.stage = other;
                return Err(StudyError::WrongStage { actual });
            }
        };
        let correct = results.iter().filter(|r| r.is_correct).count();
        self.session.record_result(TestType::Spell, results);
        self.stage = StudyStage::ResultReady;
        tracing::info!(unit_id = %unit_id, correct, repetition, "Spelling finished");
        Ok(())
    }

    fn finish_retry(&mut self) -> Result<(), StudyError> {
        self.transition(Action::FinishRetry)?;
        let results = match std::mem::replace(&mut self.stage, StudyStage::Idle) {
            StudyStage::RetrySpelling(quiz) => quiz.into_results(),
            other => {
                let actual = other.kind();
                self.stage = other;
                return Err(StudyError::WrongStage { actual });
            }
        };
        tracing::info!(
            total = results.len(),
            correct = results.iter().filter(|r| r.is_correct).count(),
            "Retry finished"
        );
        self.stage = StudyStage::RetryResultReady(results);
        Ok(())
    }

    // Results

    /// Report handoff for the latest finished pass: the main test's two buffers,
    /// or the standalone retry results.
    pub fn result(&self) -> Result<ReportHandoff, StudyError> {
        match &self.stage {
            StudyStage::ResultReady | StudyStage::ReportViewed => {
                let buffers = self.session.buffers();
                Ok(ReportHandoff::main(&buffers.recall, &buffers.spell))
            }
            StudyStage::RetryResultReady(results) => Ok(ReportHandoff::retry(results)),
            other => Err(StudyError::WrongStage {
                actual: other.kind(),
            }),
        }
    }

    pub fn view_report(&mut self) -> Result<Report, StudyError> {
        self.transition(Action::ViewReport)?;
        let report = self.result()?.to_report();
        self.stage = StudyStage::ReportViewed;
        Ok(report)
    }

    /// Starts a spelling-only pass over the deduplicated wrong words of the latest
    /// result. Nothing it produces reaches the buffers or the progress store.
    pub fn start_retry(&mut self) -> Result<Option<SpellingQuestion>, StudyError> {
        self.transition(Action::StartRetry)?;
        let candidates = self.result()?.to_report().retry_candidates;
        if candidates.is_empty() {
            return Err(StudyError::NothingToRetry);
        }
        tracing::info!(words = candidates.len(), "Retry started");
        let quiz = SpellingQuiz::retry(candidates);
        let question = quiz.question();
        self.stage = StudyStage::RetrySpelling(quiz);
        Ok(question)
    }
}
