//! Fuzz target for the session state machine
//!
//! Feeds arbitrary event sequences through a Session to find:
//! - Panics on any event in any state
//! - Generation confusion (stale transports touching current state)
//! - Status/stream combinations that should be unrepresentable
//!
//! # Invariants
//!
//! - handle() never panics, whatever order events arrive in
//! - The generation counter never moves backwards
//! - A send is only ever accepted while Connected

#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use palaver_client::{
    ConnectionStatus, Endpoint, Session, SessionError, SessionEvent, SessionIdentity,
};

#[derive(Debug, Clone, Arbitrary)]
enum FuzzEvent {
    Connect,
    Submit { body: String },
    SwitchGroup { target: u8 },
    SwitchDirect { peer: u8 },
    Close,
    TransportUp { generation: u64 },
    FrameReceived { generation: u64, text: String },
    TransportDown { generation: u64 },
}

fuzz_target!(|events: Vec<FuzzEvent>| {
    let mut session =
        Session::new(Endpoint::default(), SessionIdentity::group("room-0", "fuzzer"));

    let mut last_generation = 0;

    for event in events {
        let status_before = session.status();

        let event = match event {
            FuzzEvent::Connect => SessionEvent::Connect,
            FuzzEvent::Submit { body } => SessionEvent::Submit {
                body,
                sent_at: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
            },
            FuzzEvent::SwitchGroup { target } => SessionEvent::Switch {
                identity: SessionIdentity::group(format!("room-{target}"), "fuzzer"),
            },
            FuzzEvent::SwitchDirect { peer } => SessionEvent::Switch {
                identity: SessionIdentity::direct(format!("peer-{peer}"), "fuzzer"),
            },
            FuzzEvent::Close => SessionEvent::Close,
            FuzzEvent::TransportUp { generation } => SessionEvent::TransportUp { generation },
            FuzzEvent::FrameReceived { generation, text } => {
                SessionEvent::FrameReceived { generation, text }
            },
            FuzzEvent::TransportDown { generation } => SessionEvent::TransportDown { generation },
        };

        let was_submit = matches!(event, SessionEvent::Submit { .. });
        let result = session.handle(event);

        // A send is only accepted while Connected
        if was_submit && status_before != ConnectionStatus::Connected {
            assert!(matches!(
                result,
                Err(SessionError::NotConnected { .. }) | Err(SessionError::EmptyBody)
            ));
        }

        // Generations never move backwards
        assert!(session.generation() >= last_generation);
        last_generation = session.generation();
    }
});
