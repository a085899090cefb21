use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::Config;
use crate::store::KeyValueStore;
use crate::study::StudyDesk;

/// Shared handler state. The desk is the single mutable study engine; every
/// request that changes the flow takes the write lock for its whole step.
#[derive(Clone)]
pub struct AppState {
    desk: Arc<RwLock<StudyDesk>>,
    store: Arc<dyn KeyValueStore>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(desk: StudyDesk, store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self {
            desk: Arc::new(RwLock::new(desk)),
            store,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    pub async fn desk(&self) -> RwLockReadGuard<'_, StudyDesk> {
        self.desk.read().await
    }

    pub async fn desk_mut(&self) -> RwLockWriteGuard<'_, StudyDesk> {
        self.desk.write().await
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
