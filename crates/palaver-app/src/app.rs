//! Application state machine.
//!
//! Pure view-state machine for a chat surface: it consumes [`AppEvent`]
//! inputs and user intents and produces [`AppAction`] instructions for the
//! runtime to execute. No I/O dependencies.
//!
//! # Responsibilities
//!
//! - Tracks the open conversation, its messages, and connectivity for UI
//!   feedback (the input affordance is disabled unless connected).
//! - Switching conversations emits [`AppAction::OpenSession`], which the
//!   runtime routes to the session's rebind path.

use palaver_client::{ConnectionStatus, SessionIdentity};

use crate::{AppAction, AppEvent, ChatView};

/// Application state machine.
#[derive(Debug, Clone)]
pub struct App {
    /// Username of this participant.
    user: String,
    /// Connectivity mirrored from the session.
    status: ConnectionStatus,
    /// The open conversation. `None` until one is selected.
    chat: Option<ChatView>,
    /// Transient status message. `None` if no message.
    status_line: Option<String>,
}

impl App {
    /// Create an App for the given participant, with no conversation open.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            status: ConnectionStatus::Disconnected,
            chat: None,
            status_line: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::StatusChanged { status } => {
                self.status = status;
                vec![AppAction::Render]
            },
            AppEvent::BacklogLoaded { messages } => {
                if let Some(chat) = self.chat.as_mut() {
                    chat.messages = messages;
                    chat.loaded = true;
                }
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived { message } => {
                if let Some(chat) = self.chat.as_mut() {
                    chat.messages.push(message);
                }
                vec![AppAction::Render]
            },
            AppEvent::SendRejected { reason } => {
                self.status_line = Some(format!("Not sent: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::DecodeFailure { reason } => {
                self.status_line = Some(format!("Dropped a malformed frame: {reason}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Open (or switch to) a group room.
    pub fn open_group(&mut self, room: impl Into<String>) -> Vec<AppAction> {
        self.open(SessionIdentity::group(room, self.user.clone()))
    }

    /// Open (or switch to) a direct conversation with `peer`.
    pub fn open_direct(&mut self, peer: impl Into<String>) -> Vec<AppAction> {
        self.open(SessionIdentity::direct(peer, self.user.clone()))
    }

    fn open(&mut self, identity: SessionIdentity) -> Vec<AppAction> {
        if self.chat.as_ref().is_some_and(|c| c.identity == identity) {
            return vec![];
        }

        self.chat = Some(ChatView::new(identity.clone()));
        self.status_line = None;
        vec![AppAction::OpenSession { identity }, AppAction::Render]
    }

    /// Submit the composed message.
    ///
    /// Mirrors the form affordance: nothing happens on an empty compose box
    /// or while the connection cannot carry a send.
    pub fn submit(&mut self, input: &str) -> Vec<AppAction> {
        if input.trim().is_empty() {
            return vec![];
        }

        if self.status != ConnectionStatus::Connected {
            self.status_line = Some("Not connected".to_string());
            return vec![AppAction::Render];
        }

        vec![AppAction::SendMessage { body: input.to_string() }, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Username of this participant.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Connectivity mirrored from the session.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Whether the send affordance should be enabled.
    pub fn can_send(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// The open conversation. `None` until one is selected.
    pub fn chat(&self) -> Option<&ChatView> {
        self.chat.as_ref()
    }

    /// Transient status message. `None` if no message.
    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }
}
