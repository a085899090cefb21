use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Textbook, Unit};
use crate::error::StudyError;
use crate::quiz::{ResultRecord, TestType};
use crate::store::{self, keys, KeyValueStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub textbook_id: String,
    pub textbook_title: String,
    pub unit: Unit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultBuffers {
    pub recall: Vec<ResultRecord>,
    pub spell: Vec<ResultRecord>,
}

/// Per-visit state: who is studying, which unit, and the main test's result buffers.
///
/// Only the identity is persisted. Selection and buffers live for the visit.
pub struct SessionState {
    kv: Arc<dyn KeyValueStore>,
    user: Option<User>,
    selection: Option<Selection>,
    buffers: ResultBuffers,
}

impl SessionState {
    pub fn restore(kv: Arc<dyn KeyValueStore>) -> Self {
        let user = match store::read_json::<User>(kv.as_ref(), keys::USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored user");
                None
            }
        };
        Self {
            kv,
            user,
            selection: None,
            buffers: ResultBuffers::default(),
        }
    }

    pub fn login(&mut self, name: &str) -> Result<User, StudyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudyError::EmptyName);
        }
        let user = User {
            name: name.to_string(),
        };
        store::write_json(self.kv.as_ref(), keys::USER_KEY, &user)?;
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Forgets the identity and the selection. Progress and stats are untouched.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.user = None;
        self.selection = None;
        self.kv.remove(keys::USER_KEY)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Replaces the selection. Buffers are left alone; they reset when a test starts.
    pub fn select_unit(&mut self, textbook: &Textbook, unit: &Unit) {
        self.selection = Some(Selection {
            textbook_id: textbook.id.clone(),
            textbook_title: textbook.title.clone(),
            unit: unit.clone(),
        });
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clear_results(&mut self) {
        self.buffers = ResultBuffers::default();
    }

    /// Overwrites the named buffer with the complete list from a finished quiz.
    pub fn record_result(&mut self, test_type: TestType, results: Vec<ResultRecord>) {
        match test_type {
            TestType::Recall => self.buffers.recall = results,
            TestType::Spell => self.buffers.spell = results,
        }
    }

    pub fn buffers(&self) -> &ResultBuffers {
        &self.buffers
    }
}
