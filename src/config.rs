pub mod loader;

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::authorization::{AllowList, AuthorizationEngine, PolicyMode};
use crate::contract::BootstrapSource;
use crate::error::{RegistryError, RegistryResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_server_id")]
    pub server_id: String,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    #[serde(default)]
    pub bootstrap_path: Option<PathBuf>,
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    PerRecord,
    Global,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub mode: PolicyKind,
    #[serde(default)]
    pub allow_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_audit_path")]
    pub log_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_path(),
        }
    }
}

fn default_server_id() -> String {
    "log-registry-01".to_string()
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("data/ledger.jsonl")
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("data/audit.jsonl")
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            server_id: default_server_id(),
            policy: PolicyConfig::default(),
            ledger_path: default_ledger_path(),
            bootstrap_path: None,
            audit: AuditConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from `LOG_REGISTRY_*` environment variables
    pub fn load() -> RegistryResult<Self> {
        let server_id = env::var("LOG_REGISTRY_SERVER_ID").unwrap_or_else(|_| default_server_id());

        let mode = match env::var("LOG_REGISTRY_POLICY")
            .unwrap_or_else(|_| "per_record".to_string())
            .as_str()
        {
            "per_record" => PolicyKind::PerRecord,
            "global" => PolicyKind::Global,
            other => {
                return Err(RegistryError::Config(format!(
                    "Unknown policy mode '{}': expected per_record or global",
                    other
                )))
            }
        };

        let allow_list: Vec<String> = env::var("LOG_REGISTRY_ALLOW_LIST")
            .map(|value| {
                value
                    .split(',')
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let ledger_path = env::var("LOG_REGISTRY_LEDGER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_ledger_path());

        let bootstrap_path = env::var("LOG_REGISTRY_BOOTSTRAP_PATH").ok().map(PathBuf::from);

        let enabled = env::var("LOG_REGISTRY_AUDIT_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|e| RegistryError::Config(format!("LOG_REGISTRY_AUDIT_ENABLED: {}", e)))?;

        let log_path = env::var("LOG_REGISTRY_AUDIT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_audit_path());

        let config = RegistryConfig {
            server_id,
            policy: PolicyConfig { mode, allow_list },
            ledger_path,
            bootstrap_path,
            audit: AuditConfig { enabled, log_path },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RegistryResult<()> {
        if self.server_id.trim().is_empty() {
            return Err(RegistryError::Config("server_id must not be empty".to_string()));
        }
        self.policy_mode().map(|_| ())
    }

    /// Build the immutable policy mode injected into the authorization engine
    pub fn policy_mode(&self) -> RegistryResult<PolicyMode> {
        match self.policy.mode {
            PolicyKind::PerRecord => {
                if !self.policy.allow_list.is_empty() {
                    tracing::warn!("allow_list is ignored in per_record policy mode");
                }
                Ok(PolicyMode::PerRecord)
            }
            PolicyKind::Global => Ok(PolicyMode::Global(AllowList::new(
                self.policy.allow_list.iter().cloned(),
            )?)),
        }
    }

    pub fn authorization_engine(&self) -> RegistryResult<AuthorizationEngine> {
        Ok(AuthorizationEngine::new(self.policy_mode()?))
    }

    pub fn bootstrap_source(&self) -> BootstrapSource {
        match &self.bootstrap_path {
            Some(path) => BootstrapSource::File(path.clone()),
            None => BootstrapSource::Fixture,
        }
    }
}
