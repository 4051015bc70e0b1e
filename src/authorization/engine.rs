//! Read and write eligibility checks

use tracing::{debug, warn};

use crate::authorization::policy::PolicyMode;
use crate::error::{RegistryError, RegistryResult};
use crate::record::LogRecord;

/// Authorization decisions for one deployment's policy mode.
///
/// Identities passed in here are already resolved; identity-provider
/// failures never reach the engine.
#[derive(Debug, Clone)]
pub struct AuthorizationEngine {
    mode: PolicyMode,
}

impl AuthorizationEngine {
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    pub fn per_record() -> Self {
        Self::new(PolicyMode::PerRecord)
    }

    pub fn mode(&self) -> &PolicyMode {
        &self.mode
    }

    /// Whether reads are decided before the record is fetched
    pub fn checks_before_fetch(&self) -> bool {
        matches!(self.mode, PolicyMode::Global(_))
    }

    fn initial_access(&self, identity: &str) -> Option<Vec<String>> {
        match &self.mode {
            PolicyMode::PerRecord => Some(vec![identity.to_string()]),
            PolicyMode::Global(_) => None,
        }
    }

    /// Check a write and return the access list to stamp on the new record
    pub fn authorize_write(
        &self,
        identity: &str,
        key: &str,
    ) -> RegistryResult<Option<Vec<String>>> {
        match &self.mode {
            PolicyMode::PerRecord => Ok(self.initial_access(identity)),
            PolicyMode::Global(allow_list) => {
                if allow_list.contains(identity) {
                    debug!("{} is allow-listed for writing {}", identity, key);
                    Ok(None)
                } else {
                    warn!("Write to {} denied: {} is not allow-listed", key, identity);
                    Err(RegistryError::unauthorized(identity, Some(key)))
                }
            }
        }
    }

    /// Pre-fetch read check; a no-op in per-record mode
    pub fn authorize_read_key(&self, identity: &str, key: &str) -> RegistryResult<()> {
        match &self.mode {
            PolicyMode::PerRecord => Ok(()),
            PolicyMode::Global(allow_list) => {
                if allow_list.contains(identity) {
                    Ok(())
                } else {
                    warn!("Read of {} denied: {} is not allow-listed", key, identity);
                    Err(RegistryError::unauthorized(identity, Some(key)))
                }
            }
        }
    }

    /// Decide whether `identity` may see `record`
    pub fn authorize_read(&self, identity: &str, record: &LogRecord) -> RegistryResult<()> {
        let allowed = match &self.mode {
            PolicyMode::PerRecord => record.is_authorized(identity),
            PolicyMode::Global(allow_list) => allow_list.contains(identity),
        };

        if allowed {
            debug!("{} authorized to read {}", identity, record.id);
            Ok(())
        } else {
            warn!("Read of {} denied for {}", record.id, identity);
            Err(RegistryError::unauthorized(identity, Some(&record.id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::AllowList;
    use crate::error::ErrorKind;

    fn global() -> AuthorizationEngine {
        AuthorizationEngine::new(PolicyMode::Global(
            AllowList::new(["Atlas", "Leonardo", "Spot"]).unwrap(),
        ))
    }

    #[test]
    fn test_per_record_write_stamps_writer() {
        let engine = AuthorizationEngine::per_record();
        assert_eq!(
            engine.authorize_write("OrgA", "f1").unwrap(),
            Some(vec!["OrgA".to_string()])
        );
        assert!(!engine.checks_before_fetch());
    }

    #[test]
    fn test_per_record_read_requires_membership() {
        let engine = AuthorizationEngine::per_record();
        let record = LogRecord::raw("f1", b"abc".to_vec(), "OrgA", Some(vec!["OrgA".into()]));

        assert!(engine.authorize_read("OrgA", &record).is_ok());
        let err = engine.authorize_read("OrgB", &record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_per_record_read_of_record_without_list_is_denied() {
        let engine = AuthorizationEngine::per_record();
        let record = LogRecord::named("1", "data.csv", "content", "t", "Test", None);
        assert!(engine.authorize_read("Test", &record).is_err());
    }

    #[test]
    fn test_global_mode_ignores_record_fields() {
        let engine = global();
        let record = LogRecord::raw("f1", vec![], "OrgA", Some(vec!["OrgA".into()]));

        assert!(engine.authorize_read("Spot", &record).is_ok());
        assert!(engine.authorize_read("OrgA", &record).is_err());
        assert!(engine.authorize_read_key("Atlas", "f1").is_ok());
        assert!(engine.authorize_read_key("OrgA", "f1").is_err());
        assert!(engine.checks_before_fetch());
    }

    #[test]
    fn test_global_write() {
        let engine = global();
        assert_eq!(engine.authorize_write("Leonardo", "7").unwrap(), None);
        let err = engine.authorize_write("Mallory", "7").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.to_string().contains("Mallory"));
    }
}
