//! Identifier newtypes shared across the whole stack.
//!
//! Every entity in Parlor is referenced by an opaque identifier, wrapped in
//! a newtype so a `RoomId` can never be passed where a `UserId` is expected.
//! User and room identifiers are strings because they are minted by external
//! collaborators (the identity service and the matchmaking service); the
//! server never parses or validates their contents.
//!
//! `#[serde(transparent)]` makes each newtype serialize as its bare inner
//! value, so a `UserId("u-1")` is just `"u-1"` on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user identifier issued by the external identity service.
///
/// Trusted as-is for the lifetime of the connection that presented it.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A room identifier assigned by the external matchmaking service.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A server-minted invite identifier.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct InviteId(pub String);

impl fmt::Display for InviteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InviteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A game session identifier.
///
/// A session is created by accepting an invite and keeps the invite's id,
/// so clients that tracked the invite can address the session directly.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<InviteId> for SessionId {
    fn from(id: InviteId) -> Self {
        Self(id.0)
    }
}

/// The three mini-game variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    /// 3×3 marker-placement game.
    Grid,
    /// Collaborative turn-based text game.
    Story,
    /// Letter-guessing (hangman-style) game.
    Letters,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid"),
            Self::Story => f.write_str("story"),
            Self::Letters => f.write_str("letters"),
        }
    }
}
