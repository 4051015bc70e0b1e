//! Authorization Engine
//!
//! Decides whether a caller may write or read a log record, either against
//! the record's own access list or against a deployment-wide allow-list.

pub mod engine;
pub mod policy;

pub use engine::AuthorizationEngine;
pub use policy::{AllowList, PolicyMode};
