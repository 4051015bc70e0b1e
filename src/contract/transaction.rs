//! Per-call transaction state

use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::AuditEvent;
use crate::error::{ErrorKind, RegistryError};

/// Registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InitLedger,
    UploadLog,
    CreateLog,
    ReadLog,
    VerifyLog,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::InitLedger => "init_ledger",
            Operation::UploadLog => "upload_log",
            Operation::CreateLog => "create_log",
            Operation::ReadLog => "read_log",
            Operation::VerifyLog => "verify_log",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::InitLedger | Operation::UploadLog | Operation::CreateLog
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `Pending` until the handler finishes, then terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Pending,
    Committed,
    Rejected(ErrorKind),
}

impl TxState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxState::Pending)
    }

    pub fn label(&self) -> String {
        match self {
            TxState::Pending => "pending".to_string(),
            TxState::Committed => "committed".to_string(),
            TxState::Rejected(kind) => format!("rejected:{}", kind),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    id: Uuid,
    operation: Operation,
    key: String,
    identity: Option<String>,
    content_digest: Option<String>,
    state: TxState,
}

impl Transaction {
    pub fn begin(operation: Operation, key: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            key: key.to_string(),
            identity: None,
            content_digest: None,
            state: TxState::Pending,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn set_identity(&mut self, identity: &str) {
        self.identity = Some(identity.to_string());
    }

    pub fn set_content_digest(&mut self, digest: &str) {
        self.content_digest = Some(digest.to_string());
    }

    pub fn commit(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = TxState::Committed;
        info!(
            tx_id = %self.id,
            "Committed {} for {} by {}",
            self.operation,
            self.key,
            self.identity.as_deref().unwrap_or("<unresolved>")
        );
    }

    pub fn reject(&mut self, err: &RegistryError) {
        if self.state.is_terminal() {
            return;
        }
        self.state = TxState::Rejected(err.kind());
        warn!(tx_id = %self.id, "Rejected {} for {}: {}", self.operation, self.key, err);
    }

    pub fn to_audit_event(&self) -> AuditEvent {
        AuditEvent {
            tx_id: self.id.to_string(),
            operation: self.operation.as_str().to_string(),
            key: self.key.clone(),
            identity: self.identity.clone(),
            outcome: self.state.label(),
            content_digest: self.content_digest.clone(),
        }
    }
}
