//! # Parlor
//!
//! Real-time coordination server for two-party rooms with embedded
//! mini-games.
//!
//! An external matchmaking service pairs users and assigns them a room id;
//! Parlor takes it from there: it tracks who is present in each room, lets
//! members invite each other to mini-games (grid, story, letters), and runs
//! each game session turn by turn, broadcasting full state after every
//! accepted action.
//!
//! All state lives in a single coordinator task fed by one command stream,
//! so every client action is applied in arrival order — no locks, no lost
//! updates, one interleaving per game.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! # async fn run() -> Result<(), ParlorError> {
//! let server = ParlorServer::builder().bind("0.0.0.0:8080").build().await?;
//! server.run().await
//! # }
//! ```

mod coordinator;
mod error;
mod handler;
mod registry;
mod server;

pub use error::ParlorError;
pub use registry::{ConnEntry, ConnectionRegistry};
pub use server::{ParlorServer, ParlorServerBuilder};

/// The types most servers and tests need, in one import.
pub mod prelude {
    pub use crate::{ParlorError, ParlorServer, ParlorServerBuilder};
    pub use parlor_games::{GameConfig, WordEntry};
    pub use parlor_protocol::{
        ClientFrame, Codec, Envelope, GameAction, GameKind, GameResult,
        GameSnapshot, Invite, InviteId, JsonCodec, RoomId, RosterEntry,
        ServerFrame, SessionEndReason, SessionId, UserId,
    };
}
