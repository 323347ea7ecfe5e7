//! The client failure value

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::kind::ErrorKind;

/// Shared handle to an underlying failure
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// A client operation could not complete.
///
/// Carries the failure [`ErrorKind`], an optional message and an optional
/// chained cause. The value is immutable once built; cloning shares the cause
/// rather than copying it.
#[derive(Debug, Clone)]
pub struct ClientError {
    kind: ErrorKind,
    message: Option<String>,
    cause: Option<Cause>,
}

impl ClientError {
    /// Failure of `kind` with no message and no cause
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            cause: None,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            cause: None,
        }
    }

    pub fn with_cause<E>(kind: ErrorKind, message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::with_shared_cause(kind, message, Arc::new(cause))
    }

    /// Like [`ClientError::with_cause`], keeping the caller's allocation
    pub fn with_shared_cause(kind: ErrorKind, message: impl Into<String>, cause: Cause) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            cause: Some(cause),
        }
    }

    pub(crate) fn from_parts(
        kind: ErrorKind,
        message: Option<String>,
        cause: Option<Cause>,
    ) -> Self {
        Self {
            kind,
            message,
            cause,
        }
    }

    pub fn download() -> Self {
        Self::new(ErrorKind::Download)
    }

    pub fn download_msg(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Download, message)
    }

    pub fn download_caused_by<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::with_cause(ErrorKind::Download, message, cause)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Whether this failure is of `kind` or one of its specializations
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind.is_a(kind)
    }

    /// This error followed by every error in its cause chain
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: Some(self as &(dyn StdError + 'static)),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind.description(), message),
            None => write!(f, "{}", self.kind.description()),
        }
    }
}

impl StdError for ClientError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for ClientError {
    fn from(kind: ErrorKind) -> Self {
        ClientError::new(kind)
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::TimedOut => ErrorKind::Timeout,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe => ErrorKind::Connection,
            io::ErrorKind::UnexpectedEof => ErrorKind::ConnectionRead,
            io::ErrorKind::WriteZero => ErrorKind::ConnectionWrite,
            io::ErrorKind::Interrupted => ErrorKind::Cancelled,
            _ => ErrorKind::Client,
        };
        ClientError::from_parts(kind, None, Some(Arc::new(err)))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::from_parts(ErrorKind::Message, None, Some(Arc::new(err)))
    }
}

/// Iterator returned by [`ClientError::chain`]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "peer refused the connection")
        }
    }

    impl StdError for Refused {}

    #[test]
    fn test_no_arguments() {
        let err = ClientError::download();
        assert_eq!(err.kind(), ErrorKind::Download);
        assert!(err.message().is_none());
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "download failed");
    }

    #[test]
    fn test_with_message() {
        let err = ClientError::download_msg("remote queue is full");
        assert_eq!(err.message(), Some("remote queue is full"));
        assert!(err.cause().is_none());
        assert_eq!(err.to_string(), "download failed: remote queue is full");
    }

    #[test]
    fn test_empty_message_is_kept() {
        let err = ClientError::with_message(ErrorKind::Search, "");
        assert_eq!(err.message(), Some(""));
    }

    #[test]
    fn test_cause_identity_is_preserved() {
        let cause: Cause = Arc::new(Refused);
        let err = ClientError::with_shared_cause(
            ErrorKind::Download,
            "could not reach alice",
            Arc::clone(&cause),
        );

        assert_eq!(err.message(), Some("could not reach alice"));
        assert!(Arc::ptr_eq(err.cause().unwrap(), &cause));

        // Clones share the same cause
        let copy = err.clone();
        assert!(Arc::ptr_eq(copy.cause().unwrap(), &cause));
    }

    #[test]
    fn test_source_is_the_cause() {
        let err = ClientError::download_caused_by("could not reach alice", Refused);
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<Refused>().is_some());
        assert_eq!(source.to_string(), "peer refused the connection");
    }

    #[test]
    fn test_chain_walks_nested_causes() {
        let inner = ClientError::with_cause(ErrorKind::PeerOffline, "alice is away", Refused);
        let outer = ClientError::with_cause(ErrorKind::Download, "giving up", inner);

        let rendered: Vec<String> = outer.chain().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "download failed: giving up".to_string(),
                "peer offline: alice is away".to_string(),
                "peer refused the connection".to_string(),
            ]
        );
    }

    #[test]
    fn test_hierarchy_queries() {
        let err = ClientError::with_message(ErrorKind::TransferRejected, "File not shared.");
        assert!(err.is(ErrorKind::TransferRejected));
        assert!(err.is(ErrorKind::Transfer));
        assert!(err.is(ErrorKind::Client));
        assert!(!err.is(ErrorKind::Download));
    }

    #[test]
    fn test_from_kind() {
        let err: ClientError = ErrorKind::NoResponse.into();
        assert_eq!(err.kind(), ErrorKind::NoResponse);
        assert!(err.message().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let err: ClientError = io::Error::new(io::ErrorKind::TimedOut, "deadline").into();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.message().is_none());
        assert!(err.source().unwrap().downcast_ref::<io::Error>().is_some());

        let err: ClientError = io::Error::from(io::ErrorKind::ConnectionReset).into();
        assert_eq!(err.kind(), ErrorKind::Connection);

        let err: ClientError = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert!(err.is(ErrorKind::Connection));

        let err: ClientError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert_eq!(err.kind(), ErrorKind::Client);
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: ClientError = json_err.into();
        assert_eq!(err.kind(), ErrorKind::Message);
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<ClientError>();
    }
}
