//! Audit Trail
//!
//! Append-only journal of transaction entries, kept in memory or in a JSONL
//! file. A file-backed trail is chain-verified when reopened.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::audit::entry::{create_genesis_entry, AuditEntry, AuditEvent};
use crate::audit::verify::{load_audit_trail_from_file, verify_audit_trail};
use crate::error::{RegistryError, RegistryResult};

struct TrailState {
    file: Option<File>,
    head: AuditEntry,
    count: usize,
    /// Full history, kept only when there is no file to read it back from
    history: Option<Vec<AuditEntry>>,
}

pub struct AuditTrail {
    path: Option<PathBuf>,
    state: Mutex<TrailState>,
}

impl AuditTrail {
    /// Trail kept only in memory, started with a genesis entry
    pub fn in_memory(server_id: &str) -> Self {
        let genesis = create_genesis_entry(server_id);
        Self {
            path: None,
            state: Mutex::new(TrailState {
                file: None,
                head: genesis.clone(),
                count: 1,
                history: Some(vec![genesis]),
            }),
        }
    }

    /// Open a JSONL trail, verifying an existing chain or starting a new one
    pub fn open(path: impl AsRef<Path>, server_id: &str) -> RegistryResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RegistryError::Audit(format!("Failed to create audit directory: {}", e))
                })?;
            }
        }

        let existing = if path.exists() {
            load_audit_trail_from_file(&path)?
        } else {
            Vec::new()
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| RegistryError::Audit(format!("Failed to open audit trail: {}", e)))?;

        let (head, count) = match existing.last() {
            None => {
                let genesis = create_genesis_entry(server_id);
                write_entry(&mut file, &genesis)?;
                (genesis, 1)
            }
            Some(last) => {
                verify_audit_trail(&existing)?;
                info!("Loaded {} existing audit entries", existing.len());
                (last.clone(), existing.len())
            }
        };

        Ok(Self {
            path: Some(path),
            state: Mutex::new(TrailState {
                file: Some(file),
                head,
                count,
                history: None,
            }),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Chain `event` onto the head and persist it
    pub fn record(&self, event: AuditEvent) -> RegistryResult<AuditEntry> {
        let mut state = self.lock()?;

        let sequence = state.head.sequence + 1;
        let entry = AuditEntry::new(sequence, event, state.head.this_hash.clone());
        if let Some(file) = state.file.as_mut() {
            write_entry(file, &entry)?;
        }
        if let Some(history) = state.history.as_mut() {
            history.push(entry.clone());
        }
        state.head = entry.clone();
        state.count += 1;

        debug!("Appended audit entry: {}", entry.summary());
        Ok(entry)
    }

    pub fn head_hash(&self) -> RegistryResult<String> {
        Ok(self.lock()?.head.this_hash.clone())
    }

    pub fn entry_count(&self) -> RegistryResult<usize> {
        Ok(self.lock()?.count)
    }

    /// Every entry from genesis to head; file-backed trails read the file
    pub fn entries(&self) -> RegistryResult<Vec<AuditEntry>> {
        let state = self.lock()?;
        match (&state.history, &self.path) {
            (Some(history), _) => Ok(history.clone()),
            (None, Some(path)) => load_audit_trail_from_file(path),
            (None, None) => Ok(vec![state.head.clone()]),
        }
    }

    /// Entries touching a given record key
    pub fn entries_for_key(&self, key: &str) -> RegistryResult<Vec<AuditEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|entry| entry.key == key)
            .collect())
    }

    fn lock(&self) -> RegistryResult<std::sync::MutexGuard<'_, TrailState>> {
        self.state
            .lock()
            .map_err(|_| RegistryError::Audit("audit trail lock poisoned".to_string()))
    }
}

fn write_entry(file: &mut File, entry: &AuditEntry) -> RegistryResult<()> {
    let json = serde_json::to_string(entry)
        .map_err(|e| RegistryError::Audit(format!("Failed to serialize entry: {}", e)))?;
    writeln!(file, "{}", json)
        .map_err(|e| RegistryError::Audit(format!("Failed to write to audit trail: {}", e)))?;
    file.flush()
        .map_err(|e| RegistryError::Audit(format!("Failed to flush audit trail: {}", e)))
}
