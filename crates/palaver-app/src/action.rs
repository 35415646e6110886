//! Application side-effects and intents.

use palaver_client::SessionIdentity;

/// Actions produced by the App state machine for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Bind the session to this channel (tears down any previous binding).
    OpenSession {
        /// The binding to open.
        identity: SessionIdentity,
    },

    /// Send a message through the session.
    SendMessage {
        /// Message text.
        body: String,
    },
}
