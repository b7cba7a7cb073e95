//! State store abstraction
//!
//! The controller persists proxy state through the `StateStore` trait so it
//! can run against a plain in-memory map in tests and against a JSON file on
//! disk in the binary. Writes are last-write-wins; there is no locking or
//! versioning across writers.

pub mod json_file;

pub use json_file::JsonFileStore;

use std::sync::Mutex;

use anyhow::Result;

use crate::core::proxy::state::PersistedState;

/// Persisted key-value state surviving restarts
pub trait StateStore: Send + Sync {
    /// Read the current state
    fn load(&self) -> Result<PersistedState>;

    /// Replace the stored state
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// In-memory store for tests and embedding
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<PersistedState>,
}

impl MemoryStore {
    pub fn new(state: PersistedState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<PersistedState> {
        Ok(self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("state store poisoned"))?
            .clone())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        *self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("state store poisoned"))? = state.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::proxy::descriptor::builtin_proxies;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::default();
        let mut state = store.load().unwrap();
        assert!(!state.proxy_active);

        state.record_connected(builtin_proxies().remove(1));
        store.save(&state).unwrap();

        let reloaded = store.load().unwrap();
        assert!(reloaded.proxy_active);
        assert_eq!(reloaded.selected_proxy, state.selected_proxy);
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::default();

        let mut first = store.load().unwrap();
        first.record_connected(builtin_proxies().remove(1));
        store.save(&first).unwrap();

        let mut second = store.load().unwrap();
        second.record_disconnected();
        store.save(&second).unwrap();

        let final_state = store.load().unwrap();
        assert!(!final_state.proxy_active);
        assert!(final_state.selected_proxy.is_none());
    }
}
