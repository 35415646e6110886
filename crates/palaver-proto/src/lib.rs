//! Wire format for the Palaver realtime chat protocol.
//!
//! Every frame on the channel connection is a single JSON text message.
//! Inbound frames carry a `type` tag that selects the payload shape; outbound
//! frames are untagged (the server accepts exactly one shape per channel).
//!
//! We keep JSON rather than a binary encoding because the server already
//! speaks it and it is self-describing: unknown fields are skipped and
//! unknown `type` tags classify as [`Inbound::Unknown`] instead of failing,
//! which keeps old clients working when the server grows new frame types.
//!
//! # Invariants
//!
//! - Classification is driven by the `type` tag alone, never by payload shape
//!   or message count.
//! - Decoding never panics; malformed input surfaces as [`ProtocolError`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod frame;

pub use error::ProtocolError;
pub use frame::{Inbound, MessageRecord, Outbound};
