//! Audit Trail Entry
//!
//! One hash-chained entry per finished transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Previous-hash value of the genesis entry
pub const ZERO_HASH: &str =
    "sha256:0000000000000000000000000000000000000000000000000000000000000000";

/// What happened in a transaction, before it is placed in the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub tx_id: String,
    pub operation: String,
    pub key: String,
    pub identity: Option<String>,
    pub outcome: String,
    pub content_digest: Option<String>,
}

/// Audit trail entry with cryptographic hash chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub sequence: u64,
    pub tx_id: String,
    pub operation: String,
    pub key: String,
    pub identity: Option<String>,
    pub outcome: String,
    pub content_digest: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub previous_hash: String,
    pub this_hash: String,
}

impl AuditEntry {
    /// Place `event` in the chain after `previous_hash`
    pub fn new(sequence: u64, event: AuditEvent, previous_hash: String) -> Self {
        let mut entry = Self {
            sequence,
            tx_id: event.tx_id,
            operation: event.operation,
            key: event.key,
            identity: event.identity,
            outcome: event.outcome,
            content_digest: event.content_digest,
            timestamp: Utc::now(),
            previous_hash,
            this_hash: String::new(),
        };
        entry.this_hash = entry.calculate_hash();
        entry
    }

    /// Canonical string representation for hashing
    pub fn canonical_string(&self) -> String {
        format!(
            "sequence:{}|tx_id:{}|operation:{}|key:{}|identity:{}|outcome:{}|content_digest:{}|timestamp:{}|previous_hash:{}",
            self.sequence,
            self.tx_id,
            self.operation,
            self.key,
            self.identity.as_deref().unwrap_or(""),
            self.outcome,
            self.content_digest.as_deref().unwrap_or(""),
            self.timestamp.to_rfc3339(),
            self.previous_hash,
        )
    }

    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_string().as_bytes());
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }

    pub fn verify_hash(&self) -> bool {
        self.this_hash == self.calculate_hash()
    }

    pub fn is_genesis(&self) -> bool {
        self.operation == "genesis"
    }

    pub fn summary(&self) -> String {
        format!(
            "#{} {} {} by {} -> {}",
            self.sequence,
            self.operation,
            self.key,
            self.identity.as_deref().unwrap_or("<unresolved>"),
            self.outcome
        )
    }
}

/// Genesis entry for starting the hash chain
pub fn create_genesis_entry(server_id: &str) -> AuditEntry {
    AuditEntry::new(
        0,
        AuditEvent {
            tx_id: "genesis".to_string(),
            operation: "genesis".to_string(),
            key: String::new(),
            identity: Some(server_id.to_string()),
            outcome: "committed".to_string(),
            content_digest: None,
        },
        ZERO_HASH.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> AuditEvent {
        AuditEvent {
            tx_id: "tx-1".to_string(),
            operation: "upload_log".to_string(),
            key: "f1".to_string(),
            identity: Some("OrgA".to_string()),
            outcome: "committed".to_string(),
            content_digest: Some(crate::integrity::content_digest(b"abc")),
        }
    }

    #[test]
    fn test_entry_hash() {
        let entry = AuditEntry::new(1, event(), ZERO_HASH.to_string());
        assert!(entry.verify_hash());
        assert!(entry.this_hash.starts_with("sha256:"));
        assert_eq!(entry.this_hash.len(), 71);
        assert_eq!(entry.calculate_hash(), entry.calculate_hash());
    }

    #[test]
    fn test_tampering_breaks_hash() {
        let mut entry = AuditEntry::new(1, event(), ZERO_HASH.to_string());
        entry.identity = Some("OrgB".to_string());
        assert!(!entry.verify_hash());
    }

    #[test]
    fn test_genesis_entry() {
        let genesis = create_genesis_entry("registry-01");
        assert!(genesis.is_genesis());
        assert_eq!(genesis.sequence, 0);
        assert_eq!(genesis.previous_hash, ZERO_HASH);
        assert!(genesis.verify_hash());
        assert!(genesis.summary().contains("registry-01"));
    }
}
