//! Log registry contract
//!
//! Public operation surface: `init_ledger`, `upload_log`, `create_log`,
//! `read_log` (aliased as `get_log` and `read_log_file`) and `verify_log`.

use tracing::{debug, error};

use crate::audit::AuditTrail;
use crate::authorization::AuthorizationEngine;
use crate::contract::bootstrap::{BootstrapSource, BOOTSTRAP_KEY};
use crate::contract::transaction::{Operation, Transaction};
use crate::error::{ErrorKind, RegistryError, RegistryResult};
use crate::identity::{resolve_caller, IdentityProvider};
use crate::integrity::{check_integrity, IntegrityCheck};
use crate::ledger::Ledger;
use crate::record::store::validate_key;
use crate::record::{LogRecord, RecordStore};

pub struct LogContract<L: Ledger> {
    store: RecordStore<L>,
    authorization: AuthorizationEngine,
    bootstrap: BootstrapSource,
    audit: Option<AuditTrail>,
}

impl<L: Ledger> LogContract<L> {
    pub fn new(ledger: L, authorization: AuthorizationEngine) -> Self {
        Self {
            store: RecordStore::new(ledger),
            authorization,
            bootstrap: BootstrapSource::default(),
            audit: None,
        }
    }

    pub fn with_bootstrap(mut self, bootstrap: BootstrapSource) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_audit_trail(mut self, trail: AuditTrail) -> Self {
        self.audit = Some(trail);
        self
    }

    pub fn store(&self) -> &RecordStore<L> {
        &self.store
    }

    pub fn authorization(&self) -> &AuthorizationEngine {
        &self.authorization
    }

    pub fn audit_trail(&self) -> Option<&AuditTrail> {
        self.audit.as_ref()
    }

    /// Seed the well-known bootstrap key. Calling again overwrites the seed.
    pub fn init_ledger(&self, caller: &dyn IdentityProvider) -> RegistryResult<()> {
        self.execute(Operation::InitLedger, BOOTSTRAP_KEY, |tx| {
            let identity = resolve_caller(caller)?;
            tx.set_identity(&identity);

            let access = self.authorization.authorize_write(&identity, BOOTSTRAP_KEY)?;
            let record = self.bootstrap.seed_record(&identity, access)?;
            tx.set_content_digest(&record.content_digest);

            self.store.put(BOOTSTRAP_KEY, &record)
        })
    }

    /// Store raw content under `id`; the writer becomes its sole reader
    pub fn upload_log(
        &self,
        caller: &dyn IdentityProvider,
        id: &str,
        payload: &[u8],
    ) -> RegistryResult<()> {
        self.execute(Operation::UploadLog, id, |tx| {
            let identity = resolve_caller(caller)?;
            tx.set_identity(&identity);
            validate_key(id)?;

            let access = self.authorization.authorize_write(&identity, id)?;
            let record = LogRecord::raw(id, payload.to_vec(), identity.as_str(), access);
            tx.set_content_digest(&record.content_digest);

            self.store.put(id, &record)
        })
    }

    /// Store a named file reference with caller-supplied metadata
    pub fn create_log(
        &self,
        caller: &dyn IdentityProvider,
        id: &str,
        file_name: &str,
        content: &str,
        timestamp: &str,
        owner: &str,
    ) -> RegistryResult<()> {
        self.execute(Operation::CreateLog, id, |tx| {
            let identity = resolve_caller(caller)?;
            tx.set_identity(&identity);
            validate_key(id)?;

            let access = self.authorization.authorize_write(&identity, id)?;
            let record = LogRecord::named(id, file_name, content, timestamp, owner, access);
            tx.set_content_digest(&record.content_digest);

            self.store.put(id, &record)
        })
    }

    /// Return the record under `id` if the caller may read it
    pub fn read_log(&self, caller: &dyn IdentityProvider, id: &str) -> RegistryResult<LogRecord> {
        self.execute(Operation::ReadLog, id, |tx| self.authorized_get(caller, id, tx))
    }

    pub fn get_log(&self, caller: &dyn IdentityProvider, id: &str) -> RegistryResult<LogRecord> {
        self.read_log(caller, id)
    }

    pub fn read_log_file(
        &self,
        caller: &dyn IdentityProvider,
        id: &str,
    ) -> RegistryResult<LogRecord> {
        self.read_log(caller, id)
    }

    /// Recompute the digest of a readable record for an auditor
    pub fn verify_log(
        &self,
        caller: &dyn IdentityProvider,
        id: &str,
    ) -> RegistryResult<IntegrityCheck> {
        self.execute(Operation::VerifyLog, id, |tx| {
            let record = self.authorized_get(caller, id, tx)?;
            Ok(check_integrity(&record))
        })
    }

    fn authorized_get(
        &self,
        caller: &dyn IdentityProvider,
        id: &str,
        tx: &mut Transaction,
    ) -> RegistryResult<LogRecord> {
        let identity = resolve_caller(caller)?;
        tx.set_identity(&identity);
        validate_key(id)?;

        if self.authorization.checks_before_fetch() {
            self.authorization.authorize_read_key(&identity, id)?;
        }

        let record = self.store.get(id).map_err(|e| match e.kind() {
            // No readable record means no access list the caller is on.
            ErrorKind::NotFound | ErrorKind::Decoding
                if !self.authorization.checks_before_fetch() =>
            {
                debug!("Read of {} by {} hidden as unauthorized: {}", id, identity, e);
                RegistryError::unauthorized(&identity, Some(id))
            }
            _ => e,
        })?;
        self.authorization.authorize_read(&identity, &record)?;
        tx.set_content_digest(&record.content_digest);
        Ok(record)
    }

    fn execute<T>(
        &self,
        operation: Operation,
        key: &str,
        body: impl FnOnce(&mut Transaction) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        let mut tx = Transaction::begin(operation, key);
        debug!(tx_id = %tx.id(), "Begin {} for {}", operation, key);

        let result = body(&mut tx);
        match &result {
            Ok(_) => tx.commit(),
            Err(e) => tx.reject(e),
        }

        if let Some(trail) = &self.audit {
            if let Err(e) = trail.record(tx.to_audit_event()) {
                error!(tx_id = %tx.id(), "Failed to journal {}: {}", operation, e);
            }
        }

        result
    }
}
