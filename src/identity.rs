//! Caller identity collaborators
//!
//! The identity of the transaction submitter is supplied by the surrounding
//! platform and resolved fresh for every transaction.

use std::env;

use crate::error::{RegistryError, RegistryResult};

/// Environment variable read by [`EnvIdentity::default`]
pub const IDENTITY_ENV_VAR: &str = "LOG_REGISTRY_IDENTITY";

/// Source of the current caller's identity
pub trait IdentityProvider {
    /// Identity of the submitter of the current transaction.
    fn current_caller_identity(&self) -> RegistryResult<String>;
}

/// Resolve the caller, rejecting provider failures and blank identities
pub fn resolve_caller(provider: &dyn IdentityProvider) -> RegistryResult<String> {
    let identity = provider.current_caller_identity()?;
    if identity.trim().is_empty() {
        return Err(RegistryError::Identity(
            "identity provider returned an empty identity".to_string(),
        ));
    }
    Ok(identity)
}

/// Fixed identity, e.g. an organization id configured for a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity(String);

impl StaticIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_caller_identity(&self) -> RegistryResult<String> {
        Ok(self.0.clone())
    }
}

/// Identity read from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvIdentity {
    var: String,
}

impl EnvIdentity {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvIdentity {
    fn default() -> Self {
        Self::new(IDENTITY_ENV_VAR)
    }
}

impl IdentityProvider for EnvIdentity {
    fn current_caller_identity(&self) -> RegistryResult<String> {
        env::var(&self.var)
            .map_err(|e| RegistryError::Identity(format!("{} is not available: {}", self.var, e)))
    }
}
