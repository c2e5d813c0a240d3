//! Wire protocol for Parlor.
//!
//! This crate defines the language clients and the coordination server
//! speak:
//!
//! - **Identifiers** ([`UserId`], [`RoomId`], [`InviteId`], [`SessionId`],
//!   [`GameKind`]) — opaque newtypes shared across the stack.
//! - **Frames** ([`Envelope`], [`ClientFrame`], [`ServerFrame`],
//!   [`GameAction`]) — the event structures that travel on the wire.
//! - **Game state** ([`GameSnapshot`] and the per-engine state types) —
//!   broadcast in full after every accepted action.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how frames become bytes.
//!
//! The protocol layer sits between transport (raw bytes) and the
//! coordination logic; it knows nothing about rooms, sessions, or game
//! rules.

mod codec;
mod error;
mod frames;
mod ids;
mod state;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use frames::{
    ClientFrame, Envelope, GameAction, Invite, RosterEntry,
    ServerFrame, SessionEndReason,
};
pub use ids::{GameKind, InviteId, RoomId, SessionId, UserId};
pub use parlor_transport::ConnectionId;
pub use state::{
    GameResult, GameSnapshot, GridState, LettersState, Marker, StoryLine,
    StoryState,
};
