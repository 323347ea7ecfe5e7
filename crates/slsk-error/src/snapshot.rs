//! Serializable form of a [`ClientError`]
//!
//! A snapshot keeps the kind and message as-is and flattens the cause chain
//! into the display text of each link. Restoring a snapshot rebuilds a chain
//! of [`RecordedCause`] values with the same text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

use crate::error::{Cause, ClientError};
use crate::kind::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSnapshot {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Display text of each cause, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorSnapshot {
    pub fn into_error(self) -> ClientError {
        let cause = self
            .causes
            .into_iter()
            .rev()
            .fold(None, |source: Option<RecordedCause>, text| {
                Some(RecordedCause {
                    text,
                    source: source.map(Box::new),
                })
            })
            .map(|cause| Arc::new(cause) as Cause);

        ClientError::from_parts(self.kind, self.message, cause)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl ClientError {
    pub fn snapshot(&self) -> ErrorSnapshot {
        ErrorSnapshot {
            kind: self.kind(),
            message: self.message().map(str::to_string),
            causes: self.chain().skip(1).map(|e| e.to_string()).collect(),
        }
    }
}

impl From<ErrorSnapshot> for ClientError {
    fn from(snapshot: ErrorSnapshot) -> Self {
        snapshot.into_error()
    }
}

impl From<&ClientError> for ErrorSnapshot {
    fn from(err: &ClientError) -> Self {
        err.snapshot()
    }
}

impl Serialize for ClientError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClientError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ErrorSnapshot::deserialize(deserializer).map(ErrorSnapshot::into_error)
    }
}

/// A cause restored from its recorded text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCause {
    text: String,
    source: Option<Box<RecordedCause>>,
}

impl RecordedCause {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for RecordedCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl std::error::Error for RecordedCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    fn nested() -> ClientError {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        let read = ClientError::with_cause(ErrorKind::ConnectionRead, "reading file data", io_err);
        ClientError::with_cause(ErrorKind::Download, "bob:/music/song.flac", read)
    }

    #[test]
    fn test_snapshot_flattens_chain() {
        let snapshot = nested().snapshot();
        assert_eq!(snapshot.kind, ErrorKind::Download);
        assert_eq!(snapshot.message.as_deref(), Some("bob:/music/song.flac"));
        assert_eq!(
            snapshot.causes,
            vec![
                "connection read failed: reading file data".to_string(),
                "reset by peer".to_string(),
            ]
        );
    }

    #[test]
    fn test_restored_error_is_equivalent() {
        let original = nested();
        let restored = original.snapshot().into_error();

        assert_eq!(restored.kind(), original.kind());
        assert_eq!(restored.message(), original.message());
        assert_eq!(restored.to_string(), original.to_string());
        assert_eq!(restored.snapshot(), original.snapshot());

        let cause = restored.cause().unwrap();
        assert_eq!(cause.to_string(), "connection read failed: reading file data");
        assert_eq!(cause.source().unwrap().to_string(), "reset by peer");
    }

    #[test]
    fn test_json_round_trip() {
        let original = nested();
        let json = serde_json::to_string(&original).unwrap();
        let restored: ClientError = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn test_bare_error_serializes_compactly() {
        let json = ClientError::download().snapshot().to_json().unwrap();
        assert_eq!(json, r#"{"kind":"download"}"#);

        let snapshot = ErrorSnapshot::from_json(&json).unwrap();
        assert!(snapshot.message.is_none());
        assert!(snapshot.causes.is_empty());

        let restored = snapshot.into_error();
        assert!(restored.message().is_none());
        assert!(restored.cause().is_none());
    }

    #[test]
    fn test_message_only_round_trip() {
        let original = ClientError::download_msg("Cancelled");
        let restored = ErrorSnapshot::from(&original).into_error();
        assert_eq!(restored.message(), Some("Cancelled"));
        assert!(restored.cause().is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(ErrorSnapshot::from_json(r#"{"kind":"exploded"}"#).is_err());
    }
}
