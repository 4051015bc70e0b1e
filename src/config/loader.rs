//! Configuration file loader
//! Loads a YAML registry configuration file

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};

/// Load and validate a registry configuration from a YAML file
pub fn load_from_file(path: &Path) -> RegistryResult<RegistryConfig> {
    info!("Loading registry configuration from: {:?}", path);

    if !path.exists() {
        return Err(RegistryError::Config(format!(
            "Configuration file not found: {:?}",
            path
        )));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| RegistryError::Config(format!("Failed to read {:?}: {}", path, e)))?;

    let config = parse(&contents)?;

    info!(
        "Loaded configuration for {} ({:?} policy)",
        config.server_id, config.policy.mode
    );
    Ok(config)
}

/// Parse and validate YAML configuration text
pub fn parse(contents: &str) -> RegistryResult<RegistryConfig> {
    let config: RegistryConfig = serde_yaml::from_str(contents)
        .map_err(|e| RegistryError::Config(format!("Failed to parse YAML: {}", e)))?;
    config.validate()?;
    Ok(config)
}
