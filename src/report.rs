use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Word;
use crate::quiz::{correct_count, ResultRecord};

/// Percentage rounded to the nearest integer; zero when there is nothing to score.
pub fn score(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 * 100.0 / total as f64).round() as u32
}

/// Wrong records, deduplicated by word id. The first occurrence wins, so a word
/// missed in both recall and spelling is retried once.
pub fn retry_candidates<'a, I>(wrong: I) -> Vec<Word>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let mut seen = HashSet::new();
    wrong
        .into_iter()
        .filter(|r| !r.is_correct)
        .filter(|r| seen.insert(r.word_id()))
        .map(|r| r.word.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WrongAnswers {
    Separated {
        recall: Vec<ResultRecord>,
        spell: Vec<ResultRecord>,
    },
    Single {
        results: Vec<ResultRecord>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeScore {
    pub total: usize,
    pub correct: usize,
    pub score: u32,
}

impl TypeScore {
    fn of(records: &[ResultRecord]) -> Self {
        let total = records.len();
        let correct = correct_count(records);
        Self {
            total,
            correct,
            score: score(correct, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub recall: TypeScore,
    pub spell: TypeScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub score: u32,
    pub total: usize,
    pub correct: usize,
    pub wrong_by_type: WrongAnswers,
    pub correct_list: Vec<ResultRecord>,
    pub retry_candidates: Vec<Word>,
    pub breakdown: Option<Breakdown>,
    pub is_retry: bool,
}

impl Report {
    /// Combined view of a main test: both buffers count toward the totals.
    pub fn from_session(recall: &[ResultRecord], spell: &[ResultRecord]) -> Self {
        let total = recall.len() + spell.len();
        let correct = correct_count(recall) + correct_count(spell);
        let recall_wrong: Vec<ResultRecord> =
            recall.iter().filter(|r| !r.is_correct).cloned().collect();
        let spell_wrong: Vec<ResultRecord> =
            spell.iter().filter(|r| !r.is_correct).cloned().collect();
        let retry_candidates = retry_candidates(recall_wrong.iter().chain(spell_wrong.iter()));
        let correct_list = recall
            .iter()
            .chain(spell.iter())
            .filter(|r| r.is_correct)
            .cloned()
            .collect();

        Self {
            score: score(correct, total),
            total,
            correct,
            wrong_by_type: WrongAnswers::Separated {
                recall: recall_wrong,
                spell: spell_wrong,
            },
            correct_list,
            retry_candidates,
            breakdown: Some(Breakdown {
                recall: TypeScore::of(recall),
                spell: TypeScore::of(spell),
            }),
            is_retry: false,
        }
    }

    /// View of a standalone result list, such as a retry pass.
    pub fn from_standalone(results: &[ResultRecord]) -> Self {
        let total = results.len();
        let correct = correct_count(results);
        let wrong: Vec<ResultRecord> = results.iter().filter(|r| !r.is_correct).cloned().collect();

        Self {
            score: score(correct, total),
            total,
            correct,
            retry_candidates: retry_candidates(wrong.iter()),
            wrong_by_type: WrongAnswers::Single { results: wrong },
            correct_list: results.iter().filter(|r| r.is_correct).cloned().collect(),
            breakdown: None,
            is_retry: true,
        }
    }
}

/// Payload handed to the reporting view. Field names are part of the client contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHandoff {
    pub results: Vec<ResultRecord>,
    pub total_words: usize,
    pub recall_results: Option<Vec<ResultRecord>>,
    pub spell_results: Option<Vec<ResultRecord>>,
    pub score: u32,
    pub is_retry_result: bool,
}

impl ReportHandoff {
    pub fn main(recall: &[ResultRecord], spell: &[ResultRecord]) -> Self {
        let results: Vec<ResultRecord> = recall.iter().chain(spell.iter()).cloned().collect();
        let total_words = results.len();
        Self {
            score: score(correct_count(&results), total_words),
            results,
            total_words,
            recall_results: Some(recall.to_vec()),
            spell_results: Some(spell.to_vec()),
            is_retry_result: false,
        }
    }

    pub fn retry(results: &[ResultRecord]) -> Self {
        Self {
            results: results.to_vec(),
            total_words: results.len(),
            recall_results: None,
            spell_results: None,
            score: score(correct_count(results), results.len()),
            is_retry_result: true,
        }
    }

    /// Separated totals apply only when both per-type lists travel with the payload.
    pub fn to_report(&self) -> Report {
        match (&self.recall_results, &self.spell_results) {
            (Some(recall), Some(spell)) if !self.is_retry_result => {
                Report::from_session(recall, spell)
            }
            _ => Report::from_standalone(&self.results),
        }
    }
}
