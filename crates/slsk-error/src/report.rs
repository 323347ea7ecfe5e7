//! Rendering and logging of failures

use std::fmt::Write;

use crate::error::ClientError;

impl ClientError {
    /// Multi-line rendering of the error and its whole cause chain
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        for cause in self.chain().skip(1) {
            let _ = write!(out, "\n  caused by: {}", cause);
        }
        out
    }

    /// Emit this failure as a single `warn` event
    pub fn log(&self) {
        tracing::warn!(
            kind = %self.kind(),
            detail = self.message().unwrap_or_default(),
            cause = ?self.cause().map(|c| c.to_string()),
            report = %self.report(),
            "Client operation failed"
        );
    }
}
