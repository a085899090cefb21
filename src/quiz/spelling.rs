use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Word;
use crate::error::StudyError;
use crate::quiz::{shuffled, AnswerFeedback, ResultRecord, TestType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellingMode {
    /// Full unit, shuffled; results feed the session report and progress.
    Main,
    /// Externally supplied words; results are a standalone side channel.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellingQuestion {
    pub index: usize,
    pub total: usize,
    pub meaning: String,
    pub is_retry: bool,
}

/// Input matches when it equals the target spelling after trimming, ignoring case.
pub fn is_correct_spelling(input: &str, target: &str) -> bool {
    input.trim().to_lowercase() == target.to_lowercase()
}

#[derive(Debug, Clone)]
pub struct SpellingQuiz {
    mode: SpellingMode,
    words: Vec<Word>,
    current: usize,
    results: Vec<ResultRecord>,
}

impl SpellingQuiz {
    pub fn main<R: Rng + ?Sized>(unit_words: &[Word], rng: &mut R) -> Self {
        Self::with_words(SpellingMode::Main, shuffled(unit_words, rng))
    }

    pub fn retry(words: Vec<Word>) -> Self {
        Self::with_words(SpellingMode::Retry, words)
    }

    fn with_words(mode: SpellingMode, words: Vec<Word>) -> Self {
        Self {
            mode,
            words,
            current: 0,
            results: Vec::new(),
        }
    }

    pub fn mode(&self) -> SpellingMode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.words.len()
    }

    pub fn question(&self) -> Option<SpellingQuestion> {
        self.words.get(self.current).map(|word| SpellingQuestion {
            index: self.current,
            total: self.words.len(),
            meaning: word.meaning.clone(),
            is_retry: self.mode == SpellingMode::Retry,
        })
    }

    /// Scores `input` against the open question. Blank input is refused and
    /// leaves the question open.
    pub fn answer(&mut self, index: usize, input: &str) -> Result<AnswerFeedback, StudyError> {
        if index != self.current || self.is_finished() {
            return Err(StudyError::AnswerLocked { index });
        }
        if input.trim().is_empty() {
            return Err(StudyError::BlankAnswer);
        }

        let word = self.words[self.current].clone();
        let correct_answer = word.word.clone();
        let is_correct = is_correct_spelling(input, &word.word);
        let record = ResultRecord::new(word, is_correct, input, TestType::Spell);
        self.results.push(record.clone());
        self.current += 1;

        Ok(AnswerFeedback {
            record,
            correct_answer,
            finished: self.is_finished(),
        })
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ResultRecord> {
        self.results
    }
}
