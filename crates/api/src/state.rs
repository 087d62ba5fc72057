use std::sync::Arc;

use infra::rules::AssignmentPolicy;
use infra::store::FacilityStore;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FacilityStore>,
    config: AppConfig,
    assignment_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn FacilityStore>, config: AppConfig) -> Self {
        Self {
            store,
            config,
            assignment_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn assignment_policy(&self) -> AssignmentPolicy {
        AssignmentPolicy {
            allow_training: self.config.allow_manual_training,
        }
    }

    /// Serializes every read-decide-write sequence against the shared
    /// player, court and queue state.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.assignment_lock.lock().await
    }
}
