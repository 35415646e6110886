//! Session events and actions.

use chrono::{DateTime, Utc};

use crate::{address::ChannelAddress, identity::SessionIdentity};

/// Events the caller feeds into the session.
///
/// The caller is responsible for:
/// - Driving the transport and reporting its outcomes back here
/// - Tagging every transport-originated event with the generation returned
///   by the [`crate::SessionAction::Dial`] that created that transport
/// - Forwarding application intents (connect, submit, switch, close)
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Caller asks for the connection to be opened. Idempotent: while an
    /// attempt is in flight or a connection is up, this is a no-op.
    Connect,

    /// Caller submits a message for sending.
    Submit {
        /// Message text.
        body: String,
        /// Wall-clock stamp captured at submit time. Display-only; never an
        /// ordering authority.
        sent_at: DateTime<Utc>,
    },

    /// Caller rebinds the session to a different channel.
    ///
    /// A no-op if the identity is unchanged; otherwise the old connection is
    /// torn down, the log discarded, and a new connection dialed.
    Switch {
        /// The new binding.
        identity: SessionIdentity,
    },

    /// Caller tears the session down.
    Close,

    /// Transport reports the link is up.
    TransportUp {
        /// Generation of the transport reporting.
        generation: u64,
    },

    /// Transport delivers one raw text frame, in strict receipt order.
    FrameReceived {
        /// Generation of the transport reporting.
        generation: u64,
        /// The raw frame text.
        text: String,
    },

    /// Transport reports an error or closure (its last event).
    TransportDown {
        /// Generation of the transport reporting.
        generation: u64,
    },
}

/// Actions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a transport to this address and tag everything it reports with
    /// this generation.
    Dial {
        /// Generation identifying the transport being created.
        generation: u64,
        /// Resolved connection target.
        address: ChannelAddress,
    },

    /// Write this text frame to the transport of this generation.
    SendFrame {
        /// Generation of the transport to write to.
        generation: u64,
        /// The raw frame text.
        text: String,
    },

    /// Release the transport of this generation. Safe to execute when the
    /// transport is already gone.
    CloseTransport {
        /// Generation of the transport to release.
        generation: u64,
    },

    /// An inbound frame failed to decode. Non-fatal: the stream continues
    /// and the log is untouched; surface it however the caller logs things.
    DecodeFailure {
        /// Parser description of what went wrong.
        reason: String,
    },
}
