//! Error types for the invite and session layer.

use parlor_games::ActionError;
use parlor_protocol::{InviteId, SessionId, UserId};

/// Errors from the invite broker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InviteError {
    /// The recipient (or the sender) is not a member of the room, or the
    /// sender tried to invite themselves.
    #[error("invalid recipient {0}")]
    InvalidRecipient(UserId),

    /// The invite id does not resolve: never sent, already responded to,
    /// or cancelled by a disconnect.
    #[error("unknown invite {0}")]
    UnknownInvite(InviteId),
}

/// Errors from the session manager.
///
/// `UnknownSession` covers both a missing id and a caller who is not a
/// participant: the session does not exist as far as they are concerned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),

    /// A game action arrived before both participants joined.
    #[error("session {0} has not started")]
    NotStarted(SessionId),

    /// A second join from a participant who already joined.
    #[error("already joined session {0}")]
    AlreadyJoined(SessionId),

    /// A join arrived after the session went active.
    #[error("session {0} is already running")]
    AlreadyStarted(SessionId),

    /// The engine rejected the action; state is unchanged.
    #[error(transparent)]
    Action(#[from] ActionError),
}
