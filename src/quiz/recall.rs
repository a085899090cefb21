use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::catalog::Word;
use crate::error::StudyError;
use crate::quiz::{AnswerFeedback, ResultRecord, TestType};

/// Wrong meanings offered next to the correct one.
pub const DISTRACTOR_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallQuestion {
    pub index: usize,
    pub total: usize,
    pub word: String,
    pub options: Vec<String>,
}

/// Correct meaning plus up to [`DISTRACTOR_COUNT`] meanings sampled without replacement
/// from the other words of `pool`, in random display order.
///
/// Units with fewer than three words yield fewer options.
pub fn build_options<R: Rng + ?Sized>(target: &Word, pool: &[Word], rng: &mut R) -> Vec<String> {
    let others: Vec<&Word> = pool.iter().filter(|w| w.id != target.id).collect();
    let mut options = Vec::with_capacity(DISTRACTOR_COUNT + 1);
    options.push(target.meaning.clone());
    options.extend(
        others
            .choose_multiple(rng, DISTRACTOR_COUNT)
            .map(|w| w.meaning.clone()),
    );
    options.shuffle(rng);
    options
}

/// Multiple-choice pass over a unit, in catalog order.
#[derive(Debug, Clone)]
pub struct RecallQuiz {
    words: Vec<Word>,
    current: usize,
    options: Vec<String>,
    results: Vec<ResultRecord>,
}

impl RecallQuiz {
    pub fn new<R: Rng + ?Sized>(words: Vec<Word>, rng: &mut R) -> Self {
        let mut quiz = Self {
            words,
            current: 0,
            options: Vec::new(),
            results: Vec::new(),
        };
        quiz.prepare_options(rng);
        quiz
    }

    fn prepare_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.options = match self.words.get(self.current) {
            Some(word) => build_options(word, &self.words, rng),
            None => Vec::new(),
        };
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.words.len()
    }

    pub fn question(&self) -> Option<RecallQuestion> {
        self.words.get(self.current).map(|word| RecallQuestion {
            index: self.current,
            total: self.words.len(),
            word: word.word.clone(),
            options: self.options.clone(),
        })
    }

    /// Answers the open question. `index` must name it; anything else is a
    /// stale or repeated submission and is refused.
    pub fn answer<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        selected: &str,
        rng: &mut R,
    ) -> Result<AnswerFeedback, StudyError> {
        if index != self.current || self.is_finished() {
            return Err(StudyError::AnswerLocked { index });
        }
        if !self.options.iter().any(|option| option == selected) {
            return Err(StudyError::UnknownOption);
        }

        let word = self.words[self.current].clone();
        let correct_answer = word.meaning.clone();
        let is_correct = selected == word.meaning;
        let record = ResultRecord::new(word, is_correct, selected, TestType::Recall);
        self.results.push(record.clone());

        self.current += 1;
        self.prepare_options(rng);

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
