//! The shared engine contract.
//!
//! Every engine is a set of pure transition functions over a state value
//! from `parlor-protocol`: `start` builds the initial state from the two
//! participants in join order, `apply` validates one player action and
//! either mutates the state or leaves it untouched. No engine holds hidden
//! state, which is what makes the session manager the sole writer and the
//! transitions deterministic under test.

use parlor_protocol::{GameAction, GameResult};

/// What an accepted action did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Play continues; broadcast the new state.
    Continue,
    /// The game reached a terminal result; the session is over.
    Finished(GameResult),
}

/// Why an action was rejected. The state is guaranteed unchanged.
///
/// These are surfaced only to the acting connection as a rejection of that
/// single action; they never affect the session or anyone else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("not your turn")]
    OutOfTurn,

    #[error("the game is already over")]
    GameOver,

    #[error("cell {0} is out of range")]
    CellOutOfRange(usize),

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("line is empty")]
    EmptyLine,

    #[error("'{0}' was already guessed")]
    AlreadyGuessed(char),

    #[error("'{0}' is not a letter")]
    NotALetter(char),

    #[error("action '{0}' does not apply to this game")]
    Unsupported(&'static str),
}

/// Short name of an action, for rejection messages.
pub(crate) fn action_name(action: &GameAction) -> &'static str {
    match action {
        GameAction::Join => "join",
        GameAction::Place { .. } => "place",
        GameAction::SubmitLine { .. } => "submit-line",
        GameAction::GuessLetter { .. } => "guess-letter",
        GameAction::Restart => "restart",
    }
}
