use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::store::{self, keys, KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Flashcard,
    Recall,
    Spelling,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Flashcard => "flashcard",
            Stage::Recall => "recall",
            Stage::Spelling => "spelling",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFlags {
    #[serde(default)]
    pub flashcard: bool,
    #[serde(default)]
    pub recall: bool,
    #[serde(default)]
    pub spelling: bool,
}

impl StageFlags {
    pub fn get(&self, stage: Stage) -> bool {
        match stage {
            Stage::Flashcard => self.flashcard,
            Stage::Recall => self.recall,
            Stage::Spelling => self.spelling,
        }
    }

    fn raised(mut self, stage: Stage) -> Self {
        match stage {
            Stage::Flashcard => self.flashcard = true,
            Stage::Recall => self.recall = true,
            Stage::Spelling => self.spelling = true,
        }
        self
    }

    pub fn is_completed(&self) -> bool {
        self.flashcard && self.recall && self.spelling
    }

    pub fn is_started(&self) -> bool {
        self.flashcard || self.recall || self.spelling
    }

    pub fn status(&self) -> UnitStatus {
        if self.is_completed() {
            UnitStatus::Completed
        } else if self.is_started() {
            UnitStatus::InProgress
        } else {
            UnitStatus::NotStarted
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    #[serde(default)]
    pub repetition: u32,
}

pub type StageProgress = BTreeMap<String, StageFlags>;
pub type StudyStats = BTreeMap<String, UnitStats>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed_units: usize,
    pub total_units: usize,
    pub completion_rate: u32,
    pub words_learned: usize,
    pub total_repetitions: u32,
}

/// Durable stage flags and repetition counters for every unit of the local profile.
///
/// Both maps are held in memory and written back in full after each mutation.
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    progress: StageProgress,
    stats: StudyStats,
}

impl ProgressStore {
    /// Restores both maps. Missing or undecodable payloads start empty.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let progress: StageProgress = store::read_json_or_default(kv.as_ref(), keys::PROGRESS_KEY);
        let stats: StudyStats = store::read_json_or_default(kv.as_ref(), keys::STATS_KEY);
        tracing::debug!(
            units = progress.len(),
            counted_units = stats.len(),
            "Progress restored"
        );
        Self {
            kv,
            progress,
            stats,
        }
    }

    /// Merges `stage` into the unit's flags. Flags only ever move to `true`;
    /// a `false` value leaves an existing flag untouched and creates no record.
    ///
    /// The in-memory map only changes once the write has landed.
    pub fn set_stage(&mut self, unit_id: &str, stage: Stage, value: bool) -> Result<(), StoreError> {
        let Some(current) = self.progress.get(unit_id).copied() else {
            if !value {
                return Ok(());
            }
            return self.commit_flags(unit_id, StageFlags::default().raised(stage));
        };
        if value {
            self.commit_flags(unit_id, current.raised(stage))
        } else {
            if current.get(stage) {
                tracing::debug!(unit_id, stage = stage.as_str(), "Ignoring attempt to clear a stage flag");
            }
            store::write_json(self.kv.as_ref(), keys::PROGRESS_KEY, &self.progress)
        }
    }

    fn commit_flags(&mut self, unit_id: &str, flags: StageFlags) -> Result<(), StoreError> {
        let mut next = self.progress.clone();
        next.insert(unit_id.to_string(), flags);
        store::write_json(self.kv.as_ref(), keys::PROGRESS_KEY, &next)?;
        self.progress = next;
        Ok(())
    }

    pub fn increment_repetition(&mut self, unit_id: &str) -> Result<u32, StoreError> {
        let repetition = self.repetition(unit_id).saturating_add(1);
        let mut next = self.stats.clone();
        next.entry(unit_id.to_string()).or_default().repetition = repetition;
        store::write_json(self.kv.as_ref(), keys::STATS_KEY, &next)?;
        self.stats = next;
        Ok(repetition)
    }

    pub fn progress(&self) -> &StageProgress {
        &self.progress
    }

    pub fn stats(&self) -> &StudyStats {
        &self.stats
    }

    pub fn flags(&self, unit_id: &str) -> StageFlags {
        self.progress.get(unit_id).copied().unwrap_or_default()
    }

    pub fn repetition(&self, unit_id: &str) -> u32 {
        self.stats.get(unit_id).map(|s| s.repetition).unwrap_or(0)
    }

    pub fn is_completed(&self, unit_id: &str) -> bool {
        self.flags(unit_id).is_completed()
    }

    pub fn unit_status(&self, unit_id: &str) -> UnitStatus {
        self.flags(unit_id).status()
    }

    pub fn summary(&self, catalog: &Catalog) -> ProgressSummary {
        let total_units = catalog.total_units();
        let completed_units = self
            .progress
            .values()
            .filter(|flags| flags.is_completed())
            .count();
        let completion_rate = if total_units > 0 {
            (completed_units as f64 * 100.0 / total_units as f64).round() as u32
        } else {
            0
        };
        let words_learned = self
            .progress
            .iter()
            .filter(|(_, flags)| flags.spelling)
            .filter_map(|(unit_id, _)| catalog.unit(unit_id))
            .map(|unit| unit.words.len())
            .sum();
        let total_repetitions = self.stats.values().map(|s| s.repetition).sum();

        ProgressSummary {
            completed_units,
            total_units,
            completion_rate,
            words_learned,
            total_repetitions,
        }
    }
}
