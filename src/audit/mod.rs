//! Transaction Audit Trail
//!
//! Tamper-evident journal of registry transactions. Each entry is hashed
//! over a canonical string and chained to the hash of the entry before it.

pub mod entry;
pub mod trail;
pub mod verify;

pub use entry::{create_genesis_entry, AuditEntry, AuditEvent, ZERO_HASH};
pub use trail::AuditTrail;
pub use verify::{
    find_tampered_entries, load_audit_trail_from_file, verify_audit_trail,
    verify_audit_trail_file, TrailSummary,
};
