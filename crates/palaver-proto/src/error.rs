//! Protocol error types.
//!
//! Decode failures are recoverable by design: the session drops the offending
//! frame and keeps the stream alive, so these errors must stay cheap to
//! clone and compare. We stringify the underlying `serde_json` error instead
//! of carrying it, same trade as the rest of the error surface.

use thiserror::Error;

/// Errors produced while encoding or decoding wire frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame was not valid JSON or did not match the expected payload shape.
    #[error("malformed frame: {reason}")]
    Malformed {
        /// Parser description of what went wrong.
        reason: String,
    },

    /// Frame parsed as JSON but carries no `type` tag to classify it.
    #[error("frame has no type tag")]
    MissingTag,

    /// Outbound frame could not be serialized.
    #[error("encode failed: {reason}")]
    Encode {
        /// Serializer description of what went wrong.
        reason: String,
    },
}

impl ProtocolError {
    pub(crate) fn malformed(err: &serde_json::Error) -> Self {
        Self::Malformed { reason: err.to_string() }
    }
}
