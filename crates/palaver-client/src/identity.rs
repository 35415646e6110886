//! Session identity: the (channel, participant, kind) binding.

/// The kind of channel a session is bound to.
///
/// The two kinds resolve to distinct path namespaces so the server can route
/// them to different backing stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Multi-party named room.
    Group,
    /// Two-party pairing, keyed by the peer's username.
    Direct,
}

/// One logical session binding.
///
/// Immutable for the lifetime of a session: changing any field means tearing
/// the session down and creating a new one, never mutating in place. Equality
/// over all three fields is what the lifecycle controller uses to decide
/// whether a switch is a real change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionIdentity {
    /// Room name (Group) or peer username (Direct). Opaque to the client;
    /// validation belongs to whatever collected it.
    pub target: String,

    /// Username of the participant on this end.
    pub user: String,

    /// Which path namespace the channel lives in.
    pub kind: ChannelKind,
}

impl SessionIdentity {
    /// Identity for a named group room.
    pub fn group(target: impl Into<String>, user: impl Into<String>) -> Self {
        Self { target: target.into(), user: user.into(), kind: ChannelKind::Group }
    }

    /// Identity for a direct-message pairing with `peer`.
    pub fn direct(peer: impl Into<String>, user: impl Into<String>) -> Self {
        Self { target: peer.into(), user: user.into(), kind: ChannelKind::Direct }
    }
}
