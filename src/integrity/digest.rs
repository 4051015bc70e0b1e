//! Content digest computation and verification

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::record::{LogRecord, RecordPayload};

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Digest of the empty byte sequence
pub const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Compute the lowercase hex SHA-256 digest of a payload
pub fn content_digest(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

/// Check that a stored digest has the shape `content_digest` produces
pub fn is_well_formed_digest(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN
        && digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Outcome of recomputing a record's digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityCheck {
    /// Stored digest matches the stored payload
    Intact,
    /// Stored payload no longer hashes to the stored digest
    Tampered { stored: String, computed: String },
    /// Payload lives outside the ledger; only `verify_content` can check it
    External { stored: String },
}

impl IntegrityCheck {
    pub fn is_intact(&self) -> bool {
        matches!(self, IntegrityCheck::Intact)
    }

    pub fn summary(&self) -> String {
        match self {
            IntegrityCheck::Intact => "intact".to_string(),
            IntegrityCheck::Tampered { stored, computed } => {
                format!("tampered (stored {}, computed {})", stored, computed)
            }
            IntegrityCheck::External { stored } => {
                format!("external content, stored digest {}", stored)
            }
        }
    }
}

/// Recompute the digest of an inline payload and compare it to the stored one
pub fn check_integrity(record: &LogRecord) -> IntegrityCheck {
    match &record.payload {
        RecordPayload::RawContent { content } => {
            let computed = content_digest(content);
            if computed == record.content_digest {
                debug!("Integrity intact for log record {}", record.id);
                IntegrityCheck::Intact
            } else {
                warn!(
                    "Integrity mismatch for log record {}: stored {}, computed {}",
                    record.id, record.content_digest, computed
                );
                IntegrityCheck::Tampered {
                    stored: record.content_digest.clone(),
                    computed,
                }
            }
        }
        RecordPayload::NamedReference { .. } => IntegrityCheck::External {
            stored: record.content_digest.clone(),
        },
    }
}

/// Auditor entry point: true only when the inline payload still matches its digest
pub fn verify_integrity(record: &LogRecord) -> bool {
    check_integrity(record).is_intact()
}

/// Compare externally held content against the digest bound into the record
pub fn verify_content(record: &LogRecord, content: &[u8]) -> bool {
    content_digest(content) == record.content_digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_of_abc() {
        assert_eq!(
            content_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_empty_digest_is_well_known() {
        assert_eq!(content_digest(&[]), EMPTY_DIGEST);
        assert_eq!(content_digest(b""), content_digest(&[]));
    }

    #[test]
    fn test_digest_is_deterministic_lowercase_hex() {
        let payload = vec![0u8, 1, 2, 0xff, 0xfe];
        let first = content_digest(&payload);
        let second = content_digest(&payload);
        assert_eq!(first, second);
        assert_eq!(first.len(), DIGEST_HEX_LEN);
        assert!(is_well_formed_digest(&first));
        assert_eq!(first, first.to_lowercase());
    }

    #[test]
    fn test_well_formed_digest_rejects_prefix_and_uppercase() {
        assert!(!is_well_formed_digest(&format!("sha256:{}", EMPTY_DIGEST)));
        assert!(!is_well_formed_digest(&EMPTY_DIGEST.to_uppercase()));
        assert!(!is_well_formed_digest("abc"));
    }

    #[test]
    fn test_check_integrity_detects_tampering() {
        let mut record = LogRecord::raw("f1", b"abc".to_vec(), "OrgA", Some(vec!["OrgA".into()]));
        assert!(verify_integrity(&record));

        record.payload = RecordPayload::RawContent {
            content: b"abd".to_vec(),
        };
        match check_integrity(&record) {
            IntegrityCheck::Tampered { stored, computed } => {
                assert_eq!(stored, content_digest(b"abc"));
                assert_eq!(computed, content_digest(b"abd"));
            }
            other => panic!("expected tampered, got {:?}", other),
        }
        assert!(!verify_integrity(&record));
    }

    #[test]
    fn test_named_reference_needs_external_content() {
        let record =
            LogRecord::named("7", "data.csv", "content", "2006-01-02 15:04:05", "Test", None);
        assert!(matches!(check_integrity(&record), IntegrityCheck::External { .. }));
        assert!(!verify_integrity(&record));
        assert!(verify_content(&record, b"content"));
        assert!(!verify_content(&record, b"other"));
    }
}
