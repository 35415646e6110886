//! Session-to-application translation layer.
//!
//! The [`Bridge`] wraps the Sans-IO [`palaver_client::Session`] and adapts it
//! to the application lifecycle:
//!
//! - Converts high-level intents ([`crate::AppAction`]) into session events.
//! - Accumulates transport commands ([`palaver_client::SessionAction`]) for
//!   the driver to execute in its next I/O cycle.
//! - Interprets what each event did to the session (status moves, log
//!   changes) and reports it back as [`crate::AppEvent`]s for the UI.
//!
//! The session exposes its log as state rather than emitting deltas, so the
//! bridge observes it around each event to produce change notifications.

use chrono::Utc;
use palaver_client::{
    Endpoint, Session, SessionAction, SessionEvent, SessionIdentity, StreamPhase,
};

use crate::AppEvent;

/// Bridge between App intents and session protocol logic.
pub struct Bridge {
    session: Session,
    outgoing: Vec<SessionAction>,
}

impl Bridge {
    /// Create a bridge with a session bound to `identity`.
    pub fn new(endpoint: Endpoint, identity: SessionIdentity) -> Self {
        Self { session: Session::new(endpoint, identity), outgoing: Vec::new() }
    }

    /// The wrapped session (read-only).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Ask the session to open its connection.
    pub fn open(&mut self) -> Vec<AppEvent> {
        self.run(SessionEvent::Connect)
    }

    /// Rebind the session to a different channel.
    pub fn switch(&mut self, identity: SessionIdentity) -> Vec<AppEvent> {
        self.run(SessionEvent::Switch { identity })
    }

    /// Submit a message, stamping it with the current wall-clock time.
    pub fn submit(&mut self, body: String) -> Vec<AppEvent> {
        self.run(SessionEvent::Submit { body, sent_at: Utc::now() })
    }

    /// Tear the session down.
    pub fn close(&mut self) -> Vec<AppEvent> {
        self.run(SessionEvent::Close)
    }

    /// Transport for `generation` came up.
    pub fn transport_up(&mut self, generation: u64) -> Vec<AppEvent> {
        self.run(SessionEvent::TransportUp { generation })
    }

    /// Transport for `generation` delivered one raw frame.
    pub fn frame_received(&mut self, generation: u64, text: String) -> Vec<AppEvent> {
        self.run(SessionEvent::FrameReceived { generation, text })
    }

    /// Transport for `generation` errored or closed.
    pub fn transport_down(&mut self, generation: u64) -> Vec<AppEvent> {
        self.run(SessionEvent::TransportDown { generation })
    }

    /// Take pending transport commands for the driver to execute.
    pub fn take_outgoing(&mut self) -> Vec<SessionAction> {
        std::mem::take(&mut self.outgoing)
    }

    fn run(&mut self, event: SessionEvent) -> Vec<AppEvent> {
        let status_before = self.session.status();
        let phase_before = self.session.phase();
        let len_before = self.session.messages().len();

        let mut events = Vec::new();

        match self.session.handle(event) {
            Ok(actions) => {
                for action in actions {
                    match action {
                        SessionAction::DecodeFailure { reason } => {
                            tracing::warn!(%reason, "dropped malformed inbound frame");
                            events.push(AppEvent::DecodeFailure { reason });
                        },
                        command @ (SessionAction::Dial { .. }
                        | SessionAction::SendFrame { .. }
                        | SessionAction::CloseTransport { .. }) => {
                            self.outgoing.push(command);
                        },
                    }
                }
            },
            Err(e) => events.push(AppEvent::SendRejected { reason: e.to_string() }),
        }

        events.extend(self.observe_log(phase_before, len_before));

        let status = self.session.status();
        if status != status_before {
            events.push(AppEvent::StatusChanged { status });
        }

        events
    }

    /// Translate log movement into change notifications.
    ///
    /// One appended record reports as `MessageReceived`; anything else that
    /// moved the log (the backlog snapshot, or a wholesale replacement)
    /// reports the full log as `BacklogLoaded`.
    fn observe_log(&self, phase_before: StreamPhase, len_before: usize) -> Vec<AppEvent> {
        let len = self.session.messages().len();
        let went_live =
            phase_before == StreamPhase::AwaitingBacklog && self.session.phase() == StreamPhase::Live;

        if went_live {
            return vec![AppEvent::BacklogLoaded { messages: self.session.messages().to_vec() }];
        }

        if len == len_before {
            return vec![];
        }

        if len == len_before + 1 {
            // Appends always grow by one; a same-size replacement is
            // indistinguishable here and resolves on the next snapshot.
            if let Some(last) = self.session.messages().last() {
                return vec![AppEvent::MessageReceived { message: last.clone() }];
            }
        }

        vec![AppEvent::BacklogLoaded { messages: self.session.messages().to_vec() }]
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("status", &self.session.status())
            .field("pending", &self.outgoing.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use palaver_client::ConnectionStatus;

    use super::*;

    fn dialed_bridge() -> (Bridge, u64) {
        let mut bridge =
            Bridge::new(Endpoint::default(), SessionIdentity::group("lobby", "alice"));
        bridge.open();

        let generation = match bridge.take_outgoing().as_slice() {
            [SessionAction::Dial { generation, .. }] => *generation,
            other => panic!("expected Dial, got {other:?}"),
        };
        (bridge, generation)
    }

    fn history_text() -> String {
        serde_json::json!({
            "type": "message_history",
            "messages": [
                {"username": "bob", "message": "hi", "timestamp": "2024-03-01T12:00:00Z"},
            ],
        })
        .to_string()
    }

    fn chat_text(body: &str) -> String {
        serde_json::json!({
            "type": "chat_message",
            "username": "bob",
            "message": body,
            "timestamp": "2024-03-01T12:00:05Z",
        })
        .to_string()
    }

    #[test]
    fn open_queues_a_dial_and_reports_connecting() {
        let mut bridge =
            Bridge::new(Endpoint::default(), SessionIdentity::group("lobby", "alice"));

        let events = bridge.open();

        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::StatusChanged { status: ConnectionStatus::Connecting }
        )));
        assert!(matches!(bridge.take_outgoing().as_slice(), [SessionAction::Dial { .. }]));
    }

    #[test]
    fn backlog_reports_as_one_snapshot_event() {
        let (mut bridge, generation) = dialed_bridge();
        bridge.transport_up(generation);

        let events = bridge.frame_received(generation, history_text());

        assert!(matches!(
            events.as_slice(),
            [AppEvent::BacklogLoaded { messages }] if messages.len() == 1
        ));
    }

    #[test]
    fn live_message_reports_as_append() {
        let (mut bridge, generation) = dialed_bridge();
        bridge.transport_up(generation);
        bridge.frame_received(generation, history_text());

        let events = bridge.frame_received(generation, chat_text("yo"));

        assert!(matches!(
            events.as_slice(),
            [AppEvent::MessageReceived { message }] if message.body == "yo"
        ));
    }

    #[test]
    fn rejected_submit_reports_without_queueing() {
        let (mut bridge, _generation) = dialed_bridge();

        // Still Connecting: the session refuses the send.
        let events = bridge.submit("hello".to_string());

        assert!(matches!(events.as_slice(), [AppEvent::SendRejected { .. }]));
        assert!(bridge.take_outgoing().is_empty());
    }

    #[test]
    fn accepted_submit_queues_a_frame() {
        let (mut bridge, generation) = dialed_bridge();
        bridge.transport_up(generation);

        let events = bridge.submit("hello".to_string());

        assert!(events.is_empty());
        assert!(matches!(bridge.take_outgoing().as_slice(), [SessionAction::SendFrame { .. }]));
    }

    #[test]
    fn switch_queues_teardown_then_dial() {
        let (mut bridge, generation) = dialed_bridge();
        bridge.transport_up(generation);

        bridge.switch(SessionIdentity::direct("bob", "alice"));

        match bridge.take_outgoing().as_slice() {
            [SessionAction::CloseTransport { generation: old }, SessionAction::Dial { generation: new, .. }] =>
            {
                assert_eq!(*old, generation);
                assert!(*new > *old);
            },
            other => panic!("expected CloseTransport then Dial, got {other:?}"),
        }
    }

    #[test]
    fn decode_failure_surfaces_as_event() {
        let (mut bridge, generation) = dialed_bridge();
        bridge.transport_up(generation);

        let events = bridge.frame_received(generation, "{broken".to_string());

        assert!(matches!(events.as_slice(), [AppEvent::DecodeFailure { .. }]));
    }
}
