//! Failure categories
//!
//! Every failure the client raises belongs to exactly one kind. Kinds form a
//! shallow tree rooted at [`ErrorKind::Client`]:
//!
//! ```text
//! Client
//!   ├─ Transfer ── Download, Upload, TransferRejected, TransferSizeMismatch,
//!   │              TransferNotFound, DuplicateTransfer
//!   ├─ Connection ── ConnectionRead, ConnectionWrite, PeerOffline
//!   ├─ Message ── MessageCompression, MessageRead
//!   ├─ Login ── LoginRejected
//!   └─ everything else
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Generic client failure, the root of the tree
    Client,
    Address,
    Browse,
    Connection,
    ConnectionRead,
    ConnectionWrite,
    DirectoryContents,
    /// A download could not complete
    Download,
    DuplicateToken,
    DuplicateTransfer,
    /// The listener could not be bound or accepted on
    Listen,
    Login,
    /// The server answered the login with a rejection
    LoginRejected,
    Message,
    MessageCompression,
    MessageRead,
    /// The remote side never answered
    NoResponse,
    PeerOffline,
    RoomJoinForbidden,
    Search,
    Timeout,
    Cancelled,
    Transfer,
    TransferRejected,
    TransferSizeMismatch,
    TransferNotFound,
    Upload,
    UserEndPoint,
    UserInfo,
    UserNotFound,
    UserStatus,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 31] = [
        ErrorKind::Client,
        ErrorKind::Address,
        ErrorKind::Browse,
        ErrorKind::Connection,
        ErrorKind::ConnectionRead,
        ErrorKind::ConnectionWrite,
        ErrorKind::DirectoryContents,
        ErrorKind::Download,
        ErrorKind::DuplicateToken,
        ErrorKind::DuplicateTransfer,
        ErrorKind::Listen,
        ErrorKind::Login,
        ErrorKind::LoginRejected,
        ErrorKind::Message,
        ErrorKind::MessageCompression,
        ErrorKind::MessageRead,
        ErrorKind::NoResponse,
        ErrorKind::PeerOffline,
        ErrorKind::RoomJoinForbidden,
        ErrorKind::Search,
        ErrorKind::Timeout,
        ErrorKind::Cancelled,
        ErrorKind::Transfer,
        ErrorKind::TransferRejected,
        ErrorKind::TransferSizeMismatch,
        ErrorKind::TransferNotFound,
        ErrorKind::Upload,
        ErrorKind::UserEndPoint,
        ErrorKind::UserInfo,
        ErrorKind::UserNotFound,
        ErrorKind::UserStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Client => "client",
            ErrorKind::Address => "address",
            ErrorKind::Browse => "browse",
            ErrorKind::Connection => "connection",
            ErrorKind::ConnectionRead => "connection_read",
            ErrorKind::ConnectionWrite => "connection_write",
            ErrorKind::DirectoryContents => "directory_contents",
            ErrorKind::Download => "download",
            ErrorKind::DuplicateToken => "duplicate_token",
            ErrorKind::DuplicateTransfer => "duplicate_transfer",
            ErrorKind::Listen => "listen",
            ErrorKind::Login => "login",
            ErrorKind::LoginRejected => "login_rejected",
            ErrorKind::Message => "message",
            ErrorKind::MessageCompression => "message_compression",
            ErrorKind::MessageRead => "message_read",
            ErrorKind::NoResponse => "no_response",
            ErrorKind::PeerOffline => "peer_offline",
            ErrorKind::RoomJoinForbidden => "room_join_forbidden",
            ErrorKind::Search => "search",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Transfer => "transfer",
            ErrorKind::TransferRejected => "transfer_rejected",
            ErrorKind::TransferSizeMismatch => "transfer_size_mismatch",
            ErrorKind::TransferNotFound => "transfer_not_found",
            ErrorKind::Upload => "upload",
            ErrorKind::UserEndPoint => "user_end_point",
            ErrorKind::UserInfo => "user_info",
            ErrorKind::UserNotFound => "user_not_found",
            ErrorKind::UserStatus => "user_status",
        }
    }

    /// Short phrase used as the lead of an error's display text
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Client => "client operation failed",
            ErrorKind::Address => "address lookup failed",
            ErrorKind::Browse => "browse failed",
            ErrorKind::Connection => "connection failed",
            ErrorKind::ConnectionRead => "connection read failed",
            ErrorKind::ConnectionWrite => "connection write failed",
            ErrorKind::DirectoryContents => "directory contents request failed",
            ErrorKind::Download => "download failed",
            ErrorKind::DuplicateToken => "duplicate token",
            ErrorKind::DuplicateTransfer => "duplicate transfer",
            ErrorKind::Listen => "listen failed",
            ErrorKind::Login => "login failed",
            ErrorKind::LoginRejected => "login rejected",
            ErrorKind::Message => "message handling failed",
            ErrorKind::MessageCompression => "message compression failed",
            ErrorKind::MessageRead => "message read failed",
            ErrorKind::NoResponse => "no response",
            ErrorKind::PeerOffline => "peer offline",
            ErrorKind::RoomJoinForbidden => "room join forbidden",
            ErrorKind::Search => "search failed",
            ErrorKind::Timeout => "operation timed out",
            ErrorKind::Cancelled => "operation cancelled",
            ErrorKind::Transfer => "transfer failed",
            ErrorKind::TransferRejected => "transfer rejected",
            ErrorKind::TransferSizeMismatch => "transfer size mismatch",
            ErrorKind::TransferNotFound => "transfer not found",
            ErrorKind::Upload => "upload failed",
            ErrorKind::UserEndPoint => "user endpoint lookup failed",
            ErrorKind::UserInfo => "user info request failed",
            ErrorKind::UserNotFound => "user not found",
            ErrorKind::UserStatus => "user status request failed",
        }
    }

    /// The broader category this kind specializes. Only `Client` has none.
    pub fn parent(&self) -> Option<ErrorKind> {
        match self {
            ErrorKind::Client => None,

            ErrorKind::Download
            | ErrorKind::Upload
            | ErrorKind::TransferRejected
            | ErrorKind::TransferSizeMismatch
            | ErrorKind::TransferNotFound
            | ErrorKind::DuplicateTransfer => Some(ErrorKind::Transfer),

            ErrorKind::ConnectionRead | ErrorKind::ConnectionWrite | ErrorKind::PeerOffline => {
                Some(ErrorKind::Connection)
            }

            ErrorKind::MessageCompression | ErrorKind::MessageRead => Some(ErrorKind::Message),

            ErrorKind::LoginRejected => Some(ErrorKind::Login),

            _ => Some(ErrorKind::Client),
        }
    }

    /// Whether this kind is `other` or specializes it
    pub fn is_a(&self, other: ErrorKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Every ancestor of this kind, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = ErrorKind> {
        std::iter::successors(self.parent(), ErrorKind::parent)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown error kind: {}", s))
    }
}
