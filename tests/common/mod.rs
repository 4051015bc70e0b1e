#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log_registry::audit::AuditTrail;
use log_registry::authorization::{AllowList, AuthorizationEngine, PolicyMode};
use log_registry::identity::{IdentityProvider, StaticIdentity};
use log_registry::ledger::{Ledger, MemoryLedger};
use log_registry::{LogContract, RegistryError, RegistryResult};

/// Identities allow-listed in global-mode tests
pub const ALLOW_LISTED: [&str; 3] = ["Atlas", "Leonardo", "Spot"];

/// Identity provider that always fails, like a missing client certificate
pub struct UnavailableIdentity;

impl IdentityProvider for UnavailableIdentity {
    fn current_caller_identity(&self) -> RegistryResult<String> {
        Err(RegistryError::Identity("client identity unavailable".to_string()))
    }
}

/// In-memory ledger whose puts can be switched to fail
#[derive(Default)]
pub struct FailingLedger {
    inner: MemoryLedger,
    fail_puts: AtomicBool,
}

impl FailingLedger {
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }
}

impl Ledger for FailingLedger {
    fn put_state(&self, key: &str, value: &[u8]) -> RegistryResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(RegistryError::Ledger("ledger unavailable".to_string()));
        }
        self.inner.put_state(key, value)
    }

    fn get_state(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        self.inner.get_state(key)
    }
}

pub fn caller(identity: &str) -> StaticIdentity {
    StaticIdentity::new(identity)
}

/// Per-record contract over a shared in-memory ledger, with an audit trail
pub fn per_record_contract() -> (LogContract<Arc<MemoryLedger>>, Arc<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::new());
    let contract = LogContract::new(ledger.clone(), AuthorizationEngine::per_record())
        .with_audit_trail(AuditTrail::in_memory("registry-test"));
    (contract, ledger)
}

/// Global allow-list contract over a shared in-memory ledger
pub fn global_contract() -> (LogContract<Arc<MemoryLedger>>, Arc<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::new());
    let allow_list = AllowList::new(ALLOW_LISTED).expect("allow-list");
    let contract = LogContract::new(
        ledger.clone(),
        AuthorizationEngine::new(PolicyMode::Global(allow_list)),
    );
    (contract, ledger)
}
