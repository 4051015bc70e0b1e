//! Seed record used by `init_ledger`

use std::path::PathBuf;

use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::record::LogRecord;

/// Well-known key of the seed record
pub const BOOTSTRAP_KEY: &str = "1";

const FIXTURE_FILE_NAME: &str = "data.csv";
const FIXTURE_CONTENT: &str = "content";
const FIXTURE_TIMESTAMP: &str = "2006-01-02 15:04:05";
const FIXTURE_OWNER: &str = "Test";

/// Where the seed record's content comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BootstrapSource {
    /// Raw bytes read from a local file at init time
    File(PathBuf),
    /// Built-in named reference to `data.csv`
    #[default]
    Fixture,
}

impl BootstrapSource {
    /// Build the seed record for `caller`
    pub fn seed_record(
        &self,
        caller: &str,
        authorized_identities: Option<Vec<String>>,
    ) -> RegistryResult<LogRecord> {
        match self {
            BootstrapSource::File(path) => {
                let content = std::fs::read(path).map_err(|e| {
                    RegistryError::Io(format!("Error reading {}: {}", path.display(), e))
                })?;
                debug!("Read {} bootstrap bytes from {:?}", content.len(), path);
                Ok(LogRecord::raw(
                    BOOTSTRAP_KEY,
                    content,
                    caller,
                    authorized_identities,
                ))
            }
            BootstrapSource::Fixture => Ok(LogRecord::named(
                BOOTSTRAP_KEY,
                FIXTURE_FILE_NAME,
                FIXTURE_CONTENT,
                FIXTURE_TIMESTAMP,
                FIXTURE_OWNER,
                authorized_identities,
            )),
        }
    }
}
