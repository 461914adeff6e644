mod sse;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig, dao::golf_store::GolfStore, error::ServiceError,
    services::sse_events,
};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

const SSE_CAPACITY: usize = 64;

/// Central application state storing the storage handle, SSE hub and configuration.
pub struct AppState {
    store: RwLock<Option<Arc<dyn GolfStore>>>,
    sse: SseHub,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            sse: SseHub::new(SSE_CAPACITY),
            degraded: degraded_tx,
            config,
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn GolfStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store, or [`ServiceError::Degraded`] when none is installed or the
    /// backend is known to be unhealthy.
    pub async fn require_store(&self) -> Result<Arc<dyn GolfStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn install_store(self: &Arc<Self>, store: Arc<dyn GolfStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(self: &Arc<Self>) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update the degraded flag, broadcasting `system.status` when it changes.
    pub fn update_degraded(self: &Arc<Self>, value: bool) {
        let changed = self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });

        if changed {
            sse_events::broadcast_system_status(self, value);
        }
    }

    /// Broadcast hub shared by every SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::golf_store::memory::MemoryGolfStore;

    #[tokio::test]
    async fn starts_degraded_until_a_store_is_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_store().await,
            Err(ServiceError::Degraded)
        ));

        state.install_store(Arc::new(MemoryGolfStore::new())).await;
        assert!(!state.is_degraded());
        assert!(state.require_store().await.is_ok());

        state.clear_store().await;
        assert!(state.is_degraded());
    }

    #[tokio::test]
    async fn degraded_changes_are_broadcast_once() {
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.sse().subscribe();

        state.update_degraded(false);
        state.update_degraded(false);
        state.update_degraded(true);

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.event.as_deref(), Some("system.status"));
        assert_eq!(first.data, r#"{"degraded":false}"#);
        let second = receiver.recv().await.unwrap();
        assert_eq!(second.data, r#"{"degraded":true}"#);
        assert!(receiver.try_recv().is_err());
    }
}
