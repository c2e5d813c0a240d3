//! Event frames: everything that travels between a client and the server.
//!
//! Each direction has one enumerated frame type ([`ClientFrame`] inbound,
//! [`ServerFrame`] outbound), internally tagged so the JSON carries a
//! `"type"` field. Frames are wrapped in an [`Envelope`] with a sequence
//! number and timestamp.
//!
//! The inbound enum doubles as the server's dispatch table: the coordinator
//! matches on it in one place, which keeps every client action flowing
//! through a single serialized router.

use serde::{Deserialize, Serialize};

use parlor_transport::ConnectionId;

use crate::{
    GameKind, GameResult, GameSnapshot, InviteId, RoomId, SessionId, UserId,
};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level wrapper for every message on the wire.
///
/// `seq` is an auto-incrementing counter maintained independently by each
/// side, for spotting missing or reordered frames in logs. `timestamp` is
/// milliseconds since the sender started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<F> {
    pub seq: u64,
    pub timestamp: u64,
    pub frame: F,
}

// ---------------------------------------------------------------------------
// Supporting wire structures
// ---------------------------------------------------------------------------

/// One member of a room roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user_id: UserId,
    pub display_name: String,
    /// The member's current connection, so peers can address each other.
    pub connection_id: ConnectionId,
}

/// A pending game invitation from one room member to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub id: InviteId,
    pub game: GameKind,
    pub sender: UserId,
    pub recipient: UserId,
    pub room_id: RoomId,
}

/// A player action inside a game session.
///
/// `Join` is common to all three engines (a session activates once both
/// participants have joined); the rest are engine-specific and rejected by
/// engines they don't apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameAction {
    /// Enter the session. The second distinct join activates it.
    Join,
    /// Grid: place the acting player's marker at `cell` (0..9, row-major).
    Place { cell: usize },
    /// Story: contribute the next line.
    SubmitLine { text: String },
    /// Letters: guess a letter.
    GuessLetter { letter: char },
    /// Start over mid-game: grid clears the board, story clears the lines,
    /// letters draws a fresh word. Participants and turn origin are kept.
    Restart,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason")]
pub enum SessionEndReason {
    /// The engine reported a terminal result.
    Completed { result: GameResult },
    /// A participant disconnected mid-session.
    OpponentLeft,
    /// A participant left the session explicitly.
    ExplicitExit,
}

// ---------------------------------------------------------------------------
// ClientFrame — connection → server
// ---------------------------------------------------------------------------

/// Everything a client can send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    /// Must be the first frame on every connection. Carries the identity
    /// issued by the external auth service; the server trusts it for the
    /// connection's lifetime.
    Hello {
        user_id: UserId,
        display_name: String,
    },

    /// Enter the room assigned by the external matchmaking service.
    JoinRoom { room_id: RoomId },

    /// Propose a game to another member of the current room.
    SendInvite {
        recipient: UserId,
        game: GameKind,
    },

    /// Accept or decline a received invite.
    RespondInvite {
        invite_id: InviteId,
        accept: bool,
    },

    /// Act inside a game session.
    GameAction {
        session_id: SessionId,
        action: GameAction,
    },

    /// Leave a game session explicitly (the session ends for both).
    LeaveSession { session_id: SessionId },
}

// ---------------------------------------------------------------------------
// ServerFrame — server → connection(s)
// ---------------------------------------------------------------------------

/// Everything the server can push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    /// Sent once when the connection is accepted, before `Hello`.
    Welcome { connection_id: ConnectionId },

    /// Full roster of a room, pushed to every member after any change.
    /// Order is first-join order.
    Roster {
        room_id: RoomId,
        members: Vec<RosterEntry>,
    },

    /// Delivered to the invite's recipient only.
    InviteReceived { invite: Invite },

    /// Delivered to the invite's sender when the recipient responds.
    InviteResolved {
        invite_id: InviteId,
        accepted: bool,
    },

    /// A session was created from an accepted invite. Sent to both
    /// participants; the session waits for both to send `Join`.
    SessionStarted {
        session_id: SessionId,
        game: GameKind,
        participants: [UserId; 2],
    },

    /// Full engine state, pushed to all session participants after every
    /// accepted action.
    GameState {
        session_id: SessionId,
        state: GameSnapshot,
    },

    /// The session is gone. Sent with the reason to whoever remains.
    SessionEnded {
        session_id: SessionId,
        #[serde(flatten)]
        end: SessionEndReason,
    },

    /// A single action was rejected. Sent only to the acting connection;
    /// nothing else changes. Codes follow HTTP conventions (400 invalid
    /// action, 404 unknown invite/session, 409 invalid recipient).
    Rejected { code: u16, message: String },
}
