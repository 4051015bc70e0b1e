//! Integrity Verifier
//!
//! Deterministic SHA-256 content digests bound into log records at write time,
//! plus the audit-time recomputation used to detect tampered payloads.

pub mod digest;

pub use digest::{
    check_integrity, content_digest, is_well_formed_digest, verify_content, verify_integrity,
    IntegrityCheck, DIGEST_HEX_LEN, EMPTY_DIGEST,
};
