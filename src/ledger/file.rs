//! File-backed ledger
//!
//! Every put is appended to a JSONL journal and the journal is replayed on
//! open, so the last line written for a key is its current value.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::ledger::Ledger;

#[derive(Debug, Serialize, Deserialize)]
struct JournalLine {
    key: String,
    value: String,
}

/// Ledger persisted as an append-only JSONL journal of puts
pub struct FileLedger {
    path: PathBuf,
    journal: Mutex<File>,
    state: RwLock<HashMap<String, Vec<u8>>>,
}

impl FileLedger {
    /// Open (or create) the journal at `path` and replay it
    pub fn open(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RegistryError::Ledger(format!("Failed to create ledger directory: {}", e))
                })?;
            }
        }

        let state = if path.exists() {
            Self::replay(&path)?
        } else {
            HashMap::new()
        };

        let journal = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| RegistryError::Ledger(format!("Failed to open ledger journal: {}", e)))?;

        info!("Opened ledger {:?} with {} keys", path, state.len());

        Ok(Self {
            path,
            journal: Mutex::new(journal),
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn replay(path: &Path) -> RegistryResult<HashMap<String, Vec<u8>>> {
        let mut contents = fs::read(path)
            .map_err(|e| RegistryError::Ledger(format!("Failed to read ledger journal: {}", e)))?;

        // A put interrupted mid-line leaves an unterminated tail; it never committed.
        let complete = contents
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        if complete < contents.len() {
            warn!(
                "Discarding {} bytes of incomplete put at end of {:?}",
                contents.len() - complete,
                path
            );
            truncate_journal(path, complete as u64)?;
            contents.truncate(complete);
        }

        let mut state = HashMap::new();
        for (line_num, line) in contents.split(|&b| b == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let entry: JournalLine = serde_json::from_slice(line).map_err(|e| {
                RegistryError::Ledger(format!(
                    "Failed to parse journal line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            let value = STANDARD.decode(entry.value.as_bytes()).map_err(|e| {
                RegistryError::Ledger(format!(
                    "Invalid value encoding at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            state.insert(entry.key, value);
        }

        Ok(state)
    }
}

fn truncate_journal(path: &Path, len: u64) -> RegistryResult<()> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .and_then(|file| file.set_len(len))
        .map_err(|e| RegistryError::Ledger(format!("Failed to truncate ledger journal: {}", e)))
}

/// Append one journal line, rolling the file back to `start` if any of it fails
fn append_line(journal: &mut File, start: u64, line: &str) -> std::io::Result<()> {
    let result = journal
        .write_all(format!("{}\n", line).as_bytes())
        .and_then(|_| journal.sync_data());
    if result.is_err() {
        if let Err(e) = journal.set_len(start) {
            error!("Failed to roll back partial ledger write: {}", e);
        }
    }
    result
}

impl Ledger for FileLedger {
    fn put_state(&self, key: &str, value: &[u8]) -> RegistryResult<()> {
        let line = serde_json::to_string(&JournalLine {
            key: key.to_string(),
            value: STANDARD.encode(value),
        })
        .map_err(|e| RegistryError::Ledger(format!("Failed to serialize put: {}", e)))?;

        let mut journal = self
            .journal
            .lock()
            .map_err(|_| RegistryError::Ledger("ledger journal lock poisoned".to_string()))?;

        let start = journal
            .metadata()
            .map_err(|e| RegistryError::Ledger(format!("Failed to stat ledger journal: {}", e)))?
            .len();
        append_line(&mut journal, start, &line)
            .map_err(|e| RegistryError::Ledger(format!("Failed to write ledger journal: {}", e)))?;

        // Synced to disk; publish the new value.
        self.state
            .write()
            .map_err(|_| RegistryError::Ledger("ledger state lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_vec());

        debug!(key, size = value.len(), "appended put to ledger journal");
        Ok(())
    }

    fn get_state(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        let state = self
            .state
            .read()
            .map_err(|_| RegistryError::Ledger("ledger state lock poisoned".to_string()))?;
        Ok(state.get(key).cloned())
    }
}
