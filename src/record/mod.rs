//! Record Store
//!
//! The log record schema and its marshalling to and from the ledger.

pub mod entry;
pub mod store;

pub use entry::{LogRecord, RecordPayload, SCHEMA_VERSION_NAMED, SCHEMA_VERSION_RAW};
pub use store::RecordStore;
