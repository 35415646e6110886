//! Property-based tests for the message log ordering guarantee.
//!
//! For any sequence of inbound frames, the log after processing equals the
//! messages of the most recent backlog snapshot (if any), in server order,
//! followed by every live event received after it, in receipt order, with all
//! other inputs having zero effect.

use palaver_client::{
    ConnectionStatus, Endpoint, Session, SessionAction, SessionEvent, SessionIdentity,
    StreamPhase,
};
use proptest::prelude::*;

/// One scripted inbound delivery.
#[derive(Debug, Clone)]
enum Delivery {
    History(Vec<(String, String)>),
    Chat(String, String),
    Foreign(String),
    Garbage(String),
}

fn sender() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn body() -> impl Strategy<Value = String> {
    "[ -~]{0,32}"
}

fn delivery() -> impl Strategy<Value = Delivery> {
    prop_oneof![
        prop::collection::vec((sender(), body()), 0..6).prop_map(Delivery::History),
        (sender(), body()).prop_map(|(s, b)| Delivery::Chat(s, b)),
        "[a-z_]{1,16}"
            .prop_filter("foreign tags only", |t| t != "message_history" && t != "chat_message")
            .prop_map(Delivery::Foreign),
        "[^{]{0,16}".prop_map(Delivery::Garbage),
    ]
}

fn frame_text(delivery: &Delivery) -> String {
    match delivery {
        Delivery::History(entries) => {
            let messages: Vec<serde_json::Value> = entries
                .iter()
                .map(|(sender, body)| {
                    serde_json::json!({
                        "username": sender,
                        "message": body,
                        "timestamp": "2024-03-01T12:00:00Z",
                    })
                })
                .collect();
            serde_json::json!({ "type": "message_history", "messages": messages }).to_string()
        },
        Delivery::Chat(sender, body) => serde_json::json!({
            "type": "chat_message",
            "username": sender,
            "message": body,
            "timestamp": "2024-03-01T12:00:00Z",
        })
        .to_string(),
        Delivery::Foreign(tag) => serde_json::json!({ "type": tag }).to_string(),
        Delivery::Garbage(text) => text.clone(),
    }
}

#[test]
fn prop_log_is_last_backlog_then_live_suffix() {
    proptest!(|(deliveries in prop::collection::vec(delivery(), 0..24))| {
        let mut session =
            Session::new(Endpoint::default(), SessionIdentity::group("lobby", "carol"));
        let actions = session.handle(SessionEvent::Connect).unwrap();
        let generation = match actions.as_slice() {
            [SessionAction::Dial { generation, .. }] => *generation,
            other => panic!("expected Dial, got {other:?}"),
        };
        session.handle(SessionEvent::TransportUp { generation }).unwrap();

        // Reference model: replace on snapshot, append on live event,
        // ignore everything else.
        let mut expected: Vec<(String, String)> = Vec::new();
        let mut saw_backlog = false;

        for delivery in &deliveries {
            session
                .handle(SessionEvent::FrameReceived {
                    generation,
                    text: frame_text(delivery),
                })
                .unwrap();

            match delivery {
                Delivery::History(entries) => {
                    expected = entries.clone();
                    saw_backlog = true;
                },
                Delivery::Chat(sender, b) => expected.push((sender.clone(), b.clone())),
                Delivery::Foreign(_) | Delivery::Garbage(_) => {},
            }
        }

        let log: Vec<(String, String)> = session
            .messages()
            .iter()
            .map(|m| (m.sender.clone(), m.body.clone()))
            .collect();
        prop_assert_eq!(log, expected);

        // Garbage and foreign frames never knocked the connection over, and
        // the phase reflects exactly whether a snapshot was seen.
        prop_assert_eq!(session.status(), ConnectionStatus::Connected);
        let expected_phase =
            if saw_backlog { StreamPhase::Live } else { StreamPhase::AwaitingBacklog };
        prop_assert_eq!(session.phase(), expected_phase);
    });
}
