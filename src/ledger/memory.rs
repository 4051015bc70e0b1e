//! In-memory ledger backend.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::ledger::Ledger;

/// Ledger backed by a `RwLock<HashMap>`, for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.state.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Ledger for MemoryLedger {
    fn put_state(&self, key: &str, value: &[u8]) -> RegistryResult<()> {
        let mut map = self
            .state
            .write()
            .map_err(|_| RegistryError::Ledger("memory ledger lock poisoned".to_string()))?;
        debug!(key, size = value.len(), "putting state in memory ledger");
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_state(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        let map = self
            .state
            .read()
            .map_err(|_| RegistryError::Ledger("memory ledger lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }
}
