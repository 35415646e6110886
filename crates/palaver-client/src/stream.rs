//! Message stream state machine.
//!
//! Consumes classified inbound frames and maintains the ordered message log.
//! A fresh stream waits for the backlog snapshot; receiving one replaces the
//! log wholesale in a single step and moves the stream to `Live`. Live events
//! append one at a time in receipt order. Unknown frame types fall through
//! with no state effect.
//!
//! The protocol assumes exactly one backlog per connection. If a second one
//! arrives anyway it silently replaces the log (the same rule, applied
//! again) rather than inventing a merge the server never specified.

use palaver_proto::{Inbound, MessageRecord};

/// Where the stream is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPhase {
    /// Connected (or connecting) but the backlog snapshot has not arrived.
    #[default]
    AwaitingBacklog,
    /// Backlog received; subsequent events append.
    Live,
}

/// What applying one frame did to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEffect {
    /// Backlog snapshot replaced the log.
    BacklogLoaded {
        /// Number of records now in the log.
        count: usize,
    },
    /// One live record appended.
    Appended,
    /// Frame had no effect (unrecognized type).
    Ignored,
}

/// The stream state machine and the log it owns.
///
/// The log is append-only from the caller's perspective; only this machine
/// mutates it, by appending or by the one-step backlog replacement.
#[derive(Debug, Clone, Default)]
pub struct MessageStream {
    phase: StreamPhase,
    log: Vec<MessageRecord>,
}

impl MessageStream {
    /// Fresh stream in [`StreamPhase::AwaitingBacklog`] with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// The ordered message log: backlog entries first, in server order, then
    /// live entries in receipt order.
    #[must_use]
    pub fn messages(&self) -> &[MessageRecord] {
        &self.log
    }

    /// Apply one classified frame.
    pub fn apply(&mut self, frame: Inbound) -> StreamEffect {
        match frame {
            Inbound::MessageHistory { messages } => {
                // Single assignment: callers can never observe a partially
                // replaced log.
                self.log = messages;
                self.phase = StreamPhase::Live;
                StreamEffect::BacklogLoaded { count: self.log.len() }
            },
            Inbound::ChatMessage(record) => {
                self.log.push(record);
                StreamEffect::Appended
            },
            Inbound::Unknown { .. } => StreamEffect::Ignored,
        }
    }

    /// Discard the log and return to [`StreamPhase::AwaitingBacklog`].
    ///
    /// Used at session teardown; a new identity must never see the old log.
    pub fn reset(&mut self) {
        self.phase = StreamPhase::AwaitingBacklog;
        self.log.clear();
    }
}
