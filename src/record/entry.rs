//! Log Record
//!
//! One schema covers both record shapes: inline raw content guarded by a
//! per-record access list, and a named file reference carrying caller metadata.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};
use crate::integrity::content_digest;

/// Schema version of records holding raw inline content
pub const SCHEMA_VERSION_RAW: u32 = 1;

/// Schema version of records holding a file name reference
pub const SCHEMA_VERSION_NAMED: u32 = 2;

/// Payload variants, tagged by `kind` in the stored JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordPayload {
    RawContent {
        #[serde(with = "base64_bytes")]
        content: Vec<u8>,
    },
    NamedReference {
        file_name: String,
        timestamp: String,
    },
}

impl RecordPayload {
    pub fn schema_version(&self) -> u32 {
        match self {
            RecordPayload::RawContent { .. } => SCHEMA_VERSION_RAW,
            RecordPayload::NamedReference { .. } => SCHEMA_VERSION_NAMED,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RecordPayload::RawContent { .. } => "raw_content",
            RecordPayload::NamedReference { .. } => "named_reference",
        }
    }
}

/// A log entry as persisted in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: String,
    pub schema_version: u32,
    pub payload: RecordPayload,
    pub content_digest: String,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_identities: Option<Vec<String>>,
}

impl LogRecord {
    /// Build a raw-content record, digesting the payload
    pub fn raw(
        id: impl Into<String>,
        content: Vec<u8>,
        owner: impl Into<String>,
        authorized_identities: Option<Vec<String>>,
    ) -> Self {
        let content_digest = content_digest(&content);
        Self {
            id: id.into(),
            schema_version: SCHEMA_VERSION_RAW,
            payload: RecordPayload::RawContent { content },
            content_digest,
            owner: owner.into(),
            authorized_identities,
        }
    }

    /// Build a named-reference record; only the digest of `content` is kept
    pub fn named(
        id: impl Into<String>,
        file_name: impl Into<String>,
        content: &str,
        timestamp: impl Into<String>,
        owner: impl Into<String>,
        authorized_identities: Option<Vec<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            schema_version: SCHEMA_VERSION_NAMED,
            payload: RecordPayload::NamedReference {
                file_name: file_name.into(),
                timestamp: timestamp.into(),
            },
            content_digest: content_digest(content.as_bytes()),
            owner: owner.into(),
            authorized_identities,
        }
    }

    /// Inline content, if this is a raw-content record
    pub fn content(&self) -> Option<&[u8]> {
        match &self.payload {
            RecordPayload::RawContent { content } => Some(content),
            RecordPayload::NamedReference { .. } => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match &self.payload {
            RecordPayload::NamedReference { file_name, .. } => Some(file_name),
            RecordPayload::RawContent { .. } => None,
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        match &self.payload {
            RecordPayload::NamedReference { timestamp, .. } => Some(timestamp),
            RecordPayload::RawContent { .. } => None,
        }
    }

    /// Exact-match membership in the per-record access list
    pub fn is_authorized(&self, identity: &str) -> bool {
        self.authorized_identities
            .as_ref()
            .map_or(false, |list| list.iter().any(|item| item == identity))
    }

    pub fn to_bytes(&self) -> RegistryResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            RegistryError::Encoding(format!("log record '{}': {}", self.id, e))
        })
    }

    /// Decode the bytes stored under `key` and check them against the schema
    pub fn from_bytes(key: &str, bytes: &[u8]) -> RegistryResult<Self> {
        let record: LogRecord =
            serde_json::from_slice(bytes).map_err(|e| RegistryError::decoding(key, e))?;

        if record.schema_version != record.payload.schema_version() {
            return Err(RegistryError::decoding(
                key,
                format!(
                    "schema version {} does not match payload kind {}",
                    record.schema_version,
                    record.payload.kind()
                ),
            ));
        }

        if record.id != key {
            return Err(RegistryError::decoding(
                key,
                format!("record id '{}' stored under a different key", record.id),
            ));
        }

        Ok(record)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_raw_record_serializes_content_as_base64() {
        let record = LogRecord::raw("f1", b"abc".to_vec(), "OrgA", Some(vec!["OrgA".into()]));
        let json: serde_json::Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();

        assert_eq!(json["id"], "f1");
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["payload"]["kind"], "raw_content");
        assert_eq!(json["payload"]["content"], "YWJj");
        assert_eq!(json["authorized_identities"][0], "OrgA");
    }

    #[test]
    fn test_named_record_omits_access_list() {
        let record =
            LogRecord::named("2", "run.log", "content", "2024-01-01 00:00:00", "Atlas", None);
        let json: serde_json::Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();

        assert_eq!(json["schema_version"], 2);
        assert_eq!(json["payload"]["file_name"], "run.log");
        assert!(json.get("authorized_identities").is_none());
        assert_eq!(record.content(), None);
        assert_eq!(record.timestamp(), Some("2024-01-01 00:00:00"));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let a = LogRecord::raw("f1", vec![1, 2, 3], "OrgA", Some(vec!["OrgA".into()]));
        let b = LogRecord::raw("f1", vec![1, 2, 3], "OrgA", Some(vec!["OrgA".into()]));
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }

    #[test]
    fn test_decode_round_trip() {
        let record =
            LogRecord::raw("f1", vec![0, 159, 146, 150], "OrgA", Some(vec!["OrgA".into()]));
        let decoded = LogRecord::from_bytes("f1", &record.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_rejects_mismatched_schema_version() {
        let bytes = br#"{"id":"f1","schema_version":2,"payload":{"kind":"raw_content","content":"YWJj"},"content_digest":"x","owner":"OrgA"}"#;
        let err = LogRecord::from_bytes("f1", bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn test_decode_rejects_garbage_and_foreign_key() {
        let err = LogRecord::from_bytes("f1", b"id,content\n1,abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);

        let record = LogRecord::raw("f1", vec![], "OrgA", None);
        let err = LogRecord::from_bytes("f2", &record.to_bytes().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn test_access_list_membership_is_exact() {
        let record = LogRecord::raw("f1", vec![], "OrgA", Some(vec!["OrgA".into()]));
        assert!(record.is_authorized("OrgA"));
        assert!(!record.is_authorized("orga"));
        assert!(!record.is_authorized("OrgA "));
        assert!(!record.is_authorized(""));

        let open = LogRecord::named("2", "f", "c", "t", "o", None);
        assert!(!open.is_authorized("o"));
    }
}
