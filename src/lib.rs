pub mod audit;
pub mod authorization;
pub mod config;
pub mod contract;
pub mod error;
pub mod identity;
pub mod integrity;
pub mod ledger;
pub mod record;

pub use contract::LogContract;
pub use error::{ErrorKind, RegistryError, RegistryResult};
pub use record::{LogRecord, RecordPayload};
