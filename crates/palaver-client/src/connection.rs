//! Connection status state machine.
//!
//! Tracks the lifecycle of one physical connection. Pure state, no I/O: the
//! driver reports transport outcomes and this machine decides what they mean
//! for the session.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐  open   ┌────────────┐  transport up  ┌───────────┐
//! │ Disconnected │────────>│ Connecting │───────────────>│ Connected │
//! └──────────────┘         └────────────┘                └───────────┘
//!        ^                       │ transport lost              │ transport lost
//!        │                       ↓                             │ or close()
//!        │ open             ┌────────┐                         ↓
//!        └──────────────────│ Failed │               ┌──────────────┐
//!                           └────────┘               │ Disconnected │
//!                                                    └──────────────┘
//! ```
//!
//! A loss before ever reaching `Connected` lands in `Failed` (the attempt
//! never worked); a loss afterwards lands back in `Disconnected` (the
//! connection worked and then went away). The caller can tell the two apart
//! to render the right affordance. Recovery from either is a fresh `open`;
//! retry policy belongs to the caller, never here.

/// Connectivity of one physical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No connection, none in flight.
    #[default]
    Disconnected,
    /// Dial issued, transport not yet up.
    Connecting,
    /// Transport up; the only state that permits sends.
    Connected,
    /// Dial never reached `Connected` before the transport gave up.
    Failed,
}

/// State machine for one physical connection's lifecycle.
#[derive(Debug, Clone, Default)]
pub struct Connection {
    status: ConnectionStatus,
}

impl Connection {
    /// Fresh connection in [`ConnectionStatus::Disconnected`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Whether outbound sends are permitted right now.
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Begin a connection attempt.
    ///
    /// Returns `true` if a physical dial should be issued. Idempotent: while
    /// `Connecting` or `Connected` this is a no-op returning `false`, so
    /// repeated opens produce exactly one attempt.
    pub fn open(&mut self) -> bool {
        match self.status {
            ConnectionStatus::Disconnected | ConnectionStatus::Failed => {
                self.status = ConnectionStatus::Connecting;
                true
            },
            ConnectionStatus::Connecting | ConnectionStatus::Connected => false,
        }
    }

    /// Transport reports the link is up.
    pub fn established(&mut self) {
        if self.status == ConnectionStatus::Connecting {
            self.status = ConnectionStatus::Connected;
        }
    }

    /// Transport reports an error or abrupt peer closure.
    ///
    /// Lands in `Failed` if the attempt never reached `Connected`, otherwise
    /// back in `Disconnected`. Either way sends stay rejected until a new
    /// `open` succeeds.
    pub fn lost(&mut self) {
        self.status = match self.status {
            ConnectionStatus::Connected => ConnectionStatus::Disconnected,
            ConnectionStatus::Connecting => ConnectionStatus::Failed,
            unchanged => unchanged,
        };
    }

    /// Caller-initiated release.
    ///
    /// Safe from any state, including when already closed; every exit path
    /// may call this.
    pub fn close(&mut self) {
        self.status = ConnectionStatus::Disconnected;
    }
}
