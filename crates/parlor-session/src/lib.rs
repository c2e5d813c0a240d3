//! Invite brokering and game session management for Parlor.
//!
//! This crate owns the path from "want to play?" to a finished game:
//!
//! 1. **Invites** — one room member asks another ([`InviteBroker`])
//! 2. **Sessions** — an accepted invite becomes a two-player game
//!    ([`SessionManager`]), activated once both participants join
//! 3. **Id minting** — invite ids (and through them session ids) come from
//!    a single injected [`IdMint`]
//!
//! Everything here is synchronous, single-owner state; the coordinator task
//! above serializes access.

mod error;
mod invites;
mod mint;
mod sessions;

pub use error::{InviteError, SessionError};
pub use invites::InviteBroker;
pub use mint::{CounterMint, IdMint, SequentialMint};
pub use sessions::{GameSession, SessionManager, SessionStatus};
