pub mod flashcard;
pub mod recall;
pub mod spelling;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Recall,
    Spell,
}

/// Outcome of one attempt at one word. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(flatten)]
    pub word: Word,
    pub is_correct: bool,
    pub user_answer: String,
    pub test_type: TestType,
}

impl ResultRecord {
    pub fn new(word: Word, is_correct: bool, user_answer: &str, test_type: TestType) -> Self {
        Self {
            word,
            is_correct,
            user_answer: user_answer.to_string(),
            test_type,
        }
    }

    pub fn word_id(&self) -> i64 {
        self.word.id
    }
}

/// Immediate feedback for an answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub record: ResultRecord,
    pub correct_answer: String,
    pub finished: bool,
}

pub(crate) fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

pub(crate) fn correct_count(records: &[ResultRecord]) -> usize {
    records.iter().filter(|r| r.is_correct).count()
}
