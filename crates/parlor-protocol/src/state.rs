//! Game-state wire types.
//!
//! Engine state is broadcast in full to both session participants after
//! every accepted action, so the state structures are wire types and live
//! here. The transition logic that mutates them lives in `parlor-games`;
//! these are plain data.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::UserId;

/// The two player markers of the grid game.
///
/// Marker `A` goes to the first participant who joins the session, `B` to
/// the second. `A` always moves first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum Marker {
    A,
    B,
}

impl Marker {
    /// Returns the opposing marker.
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// The terminal result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameResult {
    /// Grid: one marker completed a line.
    Winner { marker: Marker },
    /// Grid: all nine cells filled with no line.
    Draw,
    /// Story: the line limit was reached.
    Completed,
    /// Letters: every distinct letter of the word was revealed.
    Solved,
    /// Letters: the wrong-guess limit was reached.
    OutOfGuesses,
}

/// State of the grid game: a 3×3 board played with two markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    /// Nine cells in row-major order; `None` is empty.
    pub board: [Option<Marker>; 9],
    /// Marker assignment: `markers[0]` holds `A`, `markers[1]` holds `B`,
    /// in session join order.
    pub markers: [UserId; 2],
    /// Whose marker moves next.
    pub turn: Marker,
    /// Set once the game finishes; `None` while play continues.
    pub result: Option<GameResult>,
}

/// One contributed line of the story game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryLine {
    pub author: UserId,
    pub text: String,
    /// Unix timestamp in milliseconds, recorded when the server accepted
    /// the line.
    pub at: u64,
}

/// State of the collaborative story game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryState {
    pub lines: Vec<StoryLine>,
    /// Join order; turn rotation starts at index 0 and wraps.
    pub participants: [UserId; 2],
    /// Index into `participants` of whoever writes next.
    pub turn: usize,
    /// The story finishes when `lines.len()` reaches this.
    pub max_lines: usize,
    pub result: Option<GameResult>,
}

/// State of the letter-guessing game.
///
/// The full state, secret word included, is broadcast to both participants;
/// hiding unrevealed letters is the client's rendering concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LettersState {
    /// The secret word, uppercase.
    pub word: String,
    pub hint: String,
    pub category: String,
    /// Every letter guessed so far, correct or not.
    pub guessed: BTreeSet<char>,
    pub correct: BTreeSet<char>,
    pub wrong: BTreeSet<char>,
    /// The game is lost when `wrong.len()` reaches this.
    pub max_wrong: usize,
    /// Join order; turn alternates between the two.
    pub participants: [UserId; 2],
    /// Index into `participants` of whoever guesses next.
    pub turn: usize,
    pub result: Option<GameResult>,
}

/// A snapshot of any engine's state, as broadcast to session participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameSnapshot {
    Grid(GridState),
    Story(StoryState),
    Letters(LettersState),
}
