//! Application input events.
//!
//! [`AppEvent`]s are session notifications translated by the
//! [`crate::Bridge`]; user interactions enter through [`crate::App`] methods
//! instead.

use palaver_client::ConnectionStatus;
use palaver_proto::MessageRecord;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Connectivity changed.
    StatusChanged {
        /// The new status.
        status: ConnectionStatus,
    },

    /// The backlog snapshot (or a wholesale log replacement) arrived.
    BacklogLoaded {
        /// The full log, oldest first.
        messages: Vec<MessageRecord>,
    },

    /// One live message arrived.
    MessageReceived {
        /// The appended record.
        message: MessageRecord,
    },

    /// A submit was rejected before reaching the wire.
    SendRejected {
        /// Why the submit was rejected.
        reason: String,
    },

    /// An inbound frame failed to decode; the stream continues.
    DecodeFailure {
        /// Parser description of what went wrong.
        reason: String,
    },
}
