//! Observable application state types.
//!
//! The "View Model" for a chat surface: the subset of session state a
//! renderer needs, without exposing the session mechanics underneath.

use palaver_client::{ChannelKind, ConnectionStatus, SessionIdentity};
use palaver_proto::MessageRecord;

/// View of the currently open conversation.
#[derive(Debug, Clone)]
pub struct ChatView {
    /// The binding this view shows.
    pub identity: SessionIdentity,
    /// Messages to render, oldest first.
    pub messages: Vec<MessageRecord>,
    /// Whether the backlog has arrived yet (renderers show a loading state
    /// until it has).
    pub loaded: bool,
}

impl ChatView {
    /// Empty view for a binding.
    pub fn new(identity: SessionIdentity) -> Self {
        Self { identity, messages: Vec::new(), loaded: false }
    }

    /// Header title: `#room` for groups, `@peer` for direct messages.
    pub fn title(&self) -> String {
        match self.identity.kind {
            ChannelKind::Group => format!("#{}", self.identity.target),
            ChannelKind::Direct => format!("@{}", self.identity.target),
        }
    }

    /// Header subtitle naming the channel kind.
    pub fn subtitle(&self) -> &'static str {
        match self.identity.kind {
            ChannelKind::Group => "Group Chat",
            ChannelKind::Direct => "Direct Message",
        }
    }

    /// Whether a message was authored by this participant (for own-message
    /// styling).
    pub fn is_own(&self, message: &MessageRecord) -> bool {
        message.sender == self.identity.user
    }
}

/// Human-readable label for a connection status.
pub fn status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Disconnected => "Disconnected",
        ConnectionStatus::Connecting => "Connecting…",
        ConnectionStatus::Connected => "Connected",
        ConnectionStatus::Failed => "Connection failed",
    }
}
