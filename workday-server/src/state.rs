use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Mutex, MutexGuard};
use workday_core::{GateCodes, Notifier, Store, WorkdayConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub gate: GateCodes,
    pub notifier: Notifier,
    // Held for the whole read-modify-write of every mutating request so
    // concurrent signups can't both see a free slot.
    writes: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Store, gate: GateCodes, notifier: Notifier) -> Self {
        AppState {
            store,
            gate,
            notifier,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_config(config: &WorkdayConfig) -> Result<Self> {
        let store = Store::open(config.data_path())?;
        Ok(Self::new(
            store,
            config.gate_codes(),
            Notifier::from_config(&config.notify),
        ))
    }

    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }
}
