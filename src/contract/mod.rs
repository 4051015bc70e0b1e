//! Transaction Handlers
//!
//! Entry points of the registry. Each call resolves the caller, consults the
//! authorization engine and goes through the record store, running inside a
//! single `Transaction` that ends committed or rejected.

pub mod bootstrap;
pub mod handlers;
pub mod transaction;

pub use bootstrap::{BootstrapSource, BOOTSTRAP_KEY};
pub use handlers::LogContract;
pub use transaction::{Operation, Transaction, TxState};
