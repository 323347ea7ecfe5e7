//! SLSK Error
//!
//! Failure taxonomy for the Soulseek client library.
//! Every failing operation returns a [`ClientError`]: one [`ErrorKind`]
//! discriminant, an optional message and an optional chained cause.

mod error;
mod kind;
mod report;
mod snapshot;

pub use error::{Cause, Chain, ClientError};
pub use kind::ErrorKind;
pub use snapshot::{ErrorSnapshot, RecordedCause};

pub type Result<T> = std::result::Result<T, ClientError>;
