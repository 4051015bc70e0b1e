//! Ledger collaborators
//!
//! The registry sits on an externally supplied key-value ledger. Ordering and
//! replication belong to the ledger; the registry only puts and gets values.

pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::error::RegistryResult;

pub use file::FileLedger;
pub use memory::MemoryLedger;

/// Key-value ledger the record store writes through
///
/// Implementations must be `Send + Sync`; the registry never holds a lock
/// across calls and relies on the ledger to order concurrent writers.
pub trait Ledger: Send + Sync {
    /// Store `value` under `key`, replacing any prior value.
    fn put_state(&self, key: &str, value: &[u8]) -> RegistryResult<()>;

    /// Fetch the value under `key`. Returns `None` if nothing was ever stored.
    fn get_state(&self, key: &str) -> RegistryResult<Option<Vec<u8>>>;
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn put_state(&self, key: &str, value: &[u8]) -> RegistryResult<()> {
        (**self).put_state(key, value)
    }

    fn get_state(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }
}
