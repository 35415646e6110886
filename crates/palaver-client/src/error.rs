//! Session error types.
//!
//! Only caller mistakes surface as errors. Transport trouble is a status
//! change, a bad inbound frame is a non-fatal action, and a stale frame is
//! silently dropped; none of those are `Err`.

use palaver_proto::ProtocolError;
use thiserror::Error;

use crate::connection::ConnectionStatus;

/// Errors reported synchronously to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Submitted body was empty or whitespace-only.
    #[error("message body is empty")]
    EmptyBody,

    /// Submit attempted while the connection cannot carry it.
    #[error("not connected (status {status:?})")]
    NotConnected {
        /// Status at the time of the attempt.
        status: ConnectionStatus,
    },

    /// Outbound frame could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
