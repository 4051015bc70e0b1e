//! Authorization policy modes

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};

/// Immutable set of identities allowed to read and write any record.
///
/// Built once from configuration and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    identities: Arc<BTreeSet<String>>,
}

impl AllowList {
    pub fn new<I, S>(identities: I) -> RegistryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for identity in identities {
            let identity = identity.into();
            if identity.trim().is_empty() {
                return Err(RegistryError::Config(
                    "allow-list entries must not be empty".to_string(),
                ));
            }
            set.insert(identity);
        }

        if set.is_empty() {
            return Err(RegistryError::Config(
                "global policy requires at least one allow-listed identity".to_string(),
            ));
        }

        Ok(Self {
            identities: Arc::new(set),
        })
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.identities.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(String::as_str)
    }
}

/// Policy mode, fixed per deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyMode {
    /// Writers become the sole initial reader of what they write
    PerRecord,
    /// A static allow-list governs every read and write
    Global(AllowList),
}

impl PolicyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyMode::PerRecord => "per_record",
            PolicyMode::Global(_) => "global",
        }
    }
}

impl std::fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
