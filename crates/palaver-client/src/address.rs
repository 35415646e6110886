//! Channel address resolution.
//!
//! Maps a [`SessionIdentity`] onto the connection target. Pure and
//! infallible: identifiers pass through as opaque path segments, so a
//! malformed room name produces a malformed URL the server rejects, not a
//! client-side failure mode.

use crate::identity::{ChannelKind, SessionIdentity};

/// Where the chat server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host (and optional port) of the server.
    pub host: String,
    /// Use `wss` instead of `ws`.
    pub secure: bool,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self { host: "localhost:8000".to_string(), secure: false }
    }
}

impl Endpoint {
    /// Endpoint for the given host, plaintext `ws`.
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into(), secure: false }
    }
}

/// A resolved connection target.
///
/// Derived from an identity, never stored on the session: the session keeps
/// the identity and re-resolves on switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAddress {
    /// `ws` or `wss`.
    pub scheme: &'static str,
    /// Host (and optional port).
    pub host: String,
    /// Channel path, kind-namespaced.
    pub path: String,
    /// Query string carrying the participant identity.
    pub query: String,
}

impl ChannelAddress {
    /// Resolve the address for `identity` against `endpoint`.
    ///
    /// Group channels live under `/channel/group/`, direct channels under
    /// `/channel/dm/`. The participant identity always travels as the `user`
    /// query parameter, never as part of the path.
    pub fn resolve(endpoint: &Endpoint, identity: &SessionIdentity) -> Self {
        let namespace = match identity.kind {
            ChannelKind::Group => "group",
            ChannelKind::Direct => "dm",
        };

        Self {
            scheme: if endpoint.secure { "wss" } else { "ws" },
            host: endpoint.host.clone(),
            path: format!("/channel/{namespace}/{}/", identity.target),
            query: format!("user={}", identity.user),
        }
    }

    /// Full URL rendering of this address.
    pub fn url(&self) -> String {
        format!("{}://{}{}?{}", self.scheme, self.host, self.path, self.query)
    }
}
