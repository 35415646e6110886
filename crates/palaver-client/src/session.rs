//! Session lifecycle controller.
//!
//! The [`Session`] owns the binding between one [`SessionIdentity`] and its
//! connection + message stream. It is the top-level state machine: the caller
//! feeds it [`SessionEvent`]s and executes the [`SessionAction`]s it returns.
//! No I/O happens here.
//!
//! # Generations
//!
//! Every dial gets a fresh generation number, and every transport-originated
//! event carries the generation of the transport that produced it. Events
//! whose generation is not current are dropped before they can touch state.
//! This is what makes teardown safe under races: a transport that keeps
//! delivering after the session rebound to a new identity cannot leak frames
//! into the new log, because its generation is stale by then.

use chrono::{DateTime, Utc};
use palaver_proto::{Inbound, MessageRecord, Outbound};

use crate::{
    address::{ChannelAddress, Endpoint},
    connection::{Connection, ConnectionStatus},
    error::SessionError,
    event::{SessionAction, SessionEvent},
    identity::SessionIdentity,
    stream::{MessageStream, StreamPhase},
};

/// Realtime session state machine.
///
/// At most one transport is current at any time: a new [`SessionAction::Dial`]
/// is only ever issued together with (or after) the
/// [`SessionAction::CloseTransport`] for its predecessor, and the generation
/// check retires the predecessor's events even if the driver releases it
/// lazily.
#[derive(Debug, Clone)]
pub struct Session {
    /// Server location, fixed for the session manager's lifetime.
    endpoint: Endpoint,
    /// Current binding. Replaced wholesale on switch, never mutated.
    identity: SessionIdentity,
    /// Generation of the current (or most recent) transport. 0 = never
    /// dialed.
    generation: u64,
    /// Connection status machine.
    connection: Connection,
    /// Stream state machine and message log.
    stream: MessageStream,
}

impl Session {
    /// Create a session for `identity`. Nothing is dialed until the caller
    /// feeds [`SessionEvent::Connect`].
    pub fn new(endpoint: Endpoint, identity: SessionIdentity) -> Self {
        Self {
            endpoint,
            identity,
            generation: 0,
            connection: Connection::new(),
            stream: MessageStream::new(),
        }
    }

    /// Current binding.
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Connectivity of the current connection.
    pub fn status(&self) -> ConnectionStatus {
        self.connection.status()
    }

    /// Where the stream is in its lifetime.
    pub fn phase(&self) -> StreamPhase {
        self.stream.phase()
    }

    /// The ordered message log.
    pub fn messages(&self) -> &[MessageRecord] {
        self.stream.messages()
    }

    /// Generation of the current transport. 0 if never dialed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// Only [`SessionEvent::Submit`] can fail: [`SessionError::EmptyBody`],
    /// [`SessionError::NotConnected`], or an encode failure. A rejected
    /// submit leaves all state untouched and sends nothing.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Vec<SessionAction>, SessionError> {
        match event {
            SessionEvent::Connect => Ok(self.handle_connect()),
            SessionEvent::Submit { body, sent_at } => self.handle_submit(&body, sent_at),
            SessionEvent::Switch { identity } => Ok(self.handle_switch(identity)),
            SessionEvent::Close => Ok(self.handle_close()),
            SessionEvent::TransportUp { generation } => {
                if self.is_current(generation) {
                    self.connection.established();
                }
                Ok(vec![])
            },
            SessionEvent::FrameReceived { generation, text } => {
                Ok(self.handle_frame(generation, &text))
            },
            SessionEvent::TransportDown { generation } => {
                if self.is_current(generation) {
                    self.connection.lost();
                }
                Ok(vec![])
            },
        }
    }

    fn handle_connect(&mut self) -> Vec<SessionAction> {
        if !self.connection.open() {
            // Already connecting or connected: exactly one physical attempt.
            return vec![];
        }

        vec![self.dial()]
    }

    fn handle_submit(
        &mut self,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if body.trim().is_empty() {
            return Err(SessionError::EmptyBody);
        }

        if !self.connection.can_send() {
            return Err(SessionError::NotConnected { status: self.connection.status() });
        }

        // No optimistic append: the record enters the log when the server
        // echoes it back through the live-event path, keeping the log the
        // single source of truth.
        let frame =
            Outbound { body: body.to_string(), sender: self.identity.user.clone(), sent_at };

        Ok(vec![SessionAction::SendFrame { generation: self.generation, text: frame.encode()? }])
    }

    fn handle_switch(&mut self, identity: SessionIdentity) -> Vec<SessionAction> {
        if identity == self.identity {
            return vec![];
        }

        let mut actions = self.release_transport();

        self.stream.reset();
        self.identity = identity;

        self.connection.open();
        actions.push(self.dial());
        actions
    }

    fn handle_close(&mut self) -> Vec<SessionAction> {
        // The log survives a plain close; only a switch discards it.
        self.release_transport()
    }

    fn handle_frame(&mut self, generation: u64, text: &str) -> Vec<SessionAction> {
        if !self.is_current(generation) {
            // Stale delivery from a superseded transport.
            return vec![];
        }

        if matches!(
            self.connection.status(),
            ConnectionStatus::Disconnected | ConnectionStatus::Failed
        ) {
            // Current generation but close() already ran; the transport is
            // being released and its frames no longer apply.
            return vec![];
        }

        match Inbound::decode(text) {
            Ok(frame) => {
                self.stream.apply(frame);
                vec![]
            },
            Err(e) => vec![SessionAction::DecodeFailure { reason: e.to_string() }],
        }
    }

    /// Close the current connection and tell the driver to release its
    /// transport, if one was ever dialed.
    fn release_transport(&mut self) -> Vec<SessionAction> {
        self.connection.close();

        if self.generation == 0 {
            return vec![];
        }

        vec![SessionAction::CloseTransport { generation: self.generation }]
    }

    /// Mint the next generation and the dial action for the current identity.
    fn dial(&mut self) -> SessionAction {
        self.generation += 1;

        SessionAction::Dial {
            generation: self.generation,
            address: ChannelAddress::resolve(&self.endpoint, &self.identity),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        generation != 0 && generation == self.generation
    }
}
