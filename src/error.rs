use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Log record with ID '{key}' does not exist")]
    NotFound { key: String },

    #[error("Failed to encode log record: {0}")]
    Encoding(String),

    #[error("Failed to decode log record '{key}': {message}")]
    Decoding { key: String, message: String },

    #[error("Unauthorized access: {} is not permitted{}", .identity, key_suffix(.key))]
    Unauthorized {
        identity: String,
        key: Option<String>,
    },

    #[error("Failed to resolve caller identity: {0}")]
    Identity(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audit trail error: {0}")]
    Audit(String),
}

fn key_suffix(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(" to access log record '{}'", key),
        None => String::new(),
    }
}

/// Flat classification of a failure, recorded on rejected transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Encoding,
    Decoding,
    Unauthorized,
    Identity,
    Io,
    InvalidInput,
    Ledger,
    Config,
    Audit,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Decoding => "decoding",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Identity => "identity",
            ErrorKind::Io => "io",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Ledger => "ledger",
            ErrorKind::Config => "config",
            ErrorKind::Audit => "audit",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Decoding { .. } => ErrorKind::Decoding,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Identity(_) => ErrorKind::Identity,
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Ledger(_) => ErrorKind::Ledger,
            Self::Config(_) => ErrorKind::Config,
            Self::Audit(_) => ErrorKind::Audit,
        }
    }

    pub fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    pub fn unauthorized(identity: &str, key: Option<&str>) -> Self {
        Self::Unauthorized {
            identity: identity.to_string(),
            key: key.map(str::to_string),
        }
    }

    pub fn decoding(key: &str, message: impl std::fmt::Display) -> Self {
        Self::Decoding {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// True for failures that deny the caller rather than report a data problem
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Identity(_))
    }
}
