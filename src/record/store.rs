//! Record Store
//!
//! Marshals log records to and from the ledger. A put replaces the whole
//! value under its key; there is no merge and no version check.

use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::ledger::Ledger;
use crate::record::LogRecord;

pub struct RecordStore<L: Ledger> {
    ledger: L,
}

impl<L: Ledger> RecordStore<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Serialize `record` and write it under `key`
    pub fn put(&self, key: &str, record: &LogRecord) -> RegistryResult<()> {
        validate_key(key)?;
        if record.id != key {
            return Err(RegistryError::InvalidInput(format!(
                "record id '{}' does not match key '{}'",
                record.id, key
            )));
        }

        let bytes = record.to_bytes()?;
        self.ledger.put_state(key, &bytes)?;
        debug!("Stored log record {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    /// Read and decode the record under `key`
    pub fn get(&self, key: &str) -> RegistryResult<LogRecord> {
        validate_key(key)?;
        let bytes = self
            .ledger
            .get_state(key)?
            .ok_or_else(|| RegistryError::not_found(key))?;
        LogRecord::from_bytes(key, &bytes)
    }
}

/// Keys are caller supplied and must be non-empty
pub fn validate_key(key: &str) -> RegistryResult<()> {
    if key.is_empty() {
        return Err(RegistryError::InvalidInput(
            "log record ID must not be empty".to_string(),
        ));
    }
    Ok(())
}
