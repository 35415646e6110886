//! Client
//!
//! Sans-IO realtime session state machine for the Palaver chat service. Owns
//! the connection lifecycle, the backlog/live message-stream state machine,
//! and the ordering guarantees between historical and live messages.
//!
//! # Architecture
//!
//! The session follows the event→action pattern: it receives events
//! ([`SessionEvent`]), processes them through pure state machine logic, and
//! returns actions ([`SessionAction`]) for the caller to execute. No I/O
//! happens in this layer, which makes every failure mode testable without a
//! network.
//!
//! # Components
//!
//! - [`Session`]: lifecycle controller binding an identity to a connection
//!   and stream, with generation-checked event intake
//! - [`Connection`]: connection status state machine
//! - [`MessageStream`]: backlog/live stream state machine and message log
//! - [`ChannelAddress`]: pure resolver from identity to connection target
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedChannel`]: channel-based WebSocket handle
//! - [`transport::connect`]: open a WebSocket to a resolved address

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod address;
mod connection;
mod error;
mod event;
mod identity;
mod session;
mod stream;

#[cfg(feature = "transport")]
pub mod transport;

pub use address::{ChannelAddress, Endpoint};
pub use connection::{Connection, ConnectionStatus};
pub use error::SessionError;
pub use event::{SessionAction, SessionEvent};
pub use identity::{ChannelKind, SessionIdentity};
pub use palaver_proto::{Inbound, MessageRecord, Outbound, ProtocolError};
pub use session::Session;
pub use stream::{MessageStream, StreamEffect, StreamPhase};
