//! The letter-guessing engine: participants alternate guessing letters of a
//! hidden word, losing after too many misses.
//!
//! A restart needs a freshly drawn word, which this module cannot choose on
//! its own; the session layer picks one and calls [`redraw`].

use parlor_protocol::{GameAction, GameResult, LettersState, UserId};

use crate::engine::{ActionError, Outcome, action_name};
use crate::words::WordEntry;

/// Creates the initial state. The first joiner guesses first. The word is
/// stored uppercase so guesses compare case-insensitively.
pub fn start(
    participants: [UserId; 2],
    entry: &WordEntry,
    max_wrong: usize,
) -> LettersState {
    LettersState {
        word: entry.word.to_ascii_uppercase(),
        hint: entry.hint.clone(),
        category: entry.category.clone(),
        guessed: Default::default(),
        correct: Default::default(),
        wrong: Default::default(),
        max_wrong,
        participants,
        turn: 0,
        result: None,
    }
}

/// Swaps in a newly drawn word and clears all guesses. Used for restarts,
/// where replaying the same word would be pointless.
pub fn redraw(state: &mut LettersState, entry: &WordEntry) {
    state.word = entry.word.to_ascii_uppercase();
    state.hint = entry.hint.clone();
    state.category = entry.category.clone();
    state.guessed.clear();
    state.correct.clear();
    state.wrong.clear();
    state.turn = 0;
    state.result = None;
}

/// Applies one player action. On rejection the state is unchanged.
///
/// `Restart` is not handled here; the session layer intercepts it to draw a
/// new word before calling [`redraw`].
pub fn apply(
    state: &mut LettersState,
    actor: &UserId,
    action: &GameAction,
) -> Result<Outcome, ActionError> {
    match action {
        GameAction::GuessLetter { letter } => guess(state, actor, *letter),
        other => Err(ActionError::Unsupported(action_name(other))),
    }
}

fn guess(
    state: &mut LettersState,
    actor: &UserId,
    letter: char,
) -> Result<Outcome, ActionError> {
    if state.result.is_some() {
        return Err(ActionError::GameOver);
    }
    if &state.participants[state.turn] != actor {
        return Err(ActionError::OutOfTurn);
    }
    if !letter.is_ascii_alphabetic() {
        return Err(ActionError::NotALetter(letter));
    }

    let letter = letter.to_ascii_uppercase();
    if !state.guessed.insert(letter) {
        return Err(ActionError::AlreadyGuessed(letter));
    }

    if state.word.contains(letter) {
        state.correct.insert(letter);
        // Only the word's letters need revealing: spaces and punctuation
        // in a deployment-supplied word are not guessable.
        let solved = state
            .word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .all(|c| state.correct.contains(&c));
        if solved {
            state.result = Some(GameResult::Solved);
            return Ok(Outcome::Finished(GameResult::Solved));
        }
    } else {
        state.wrong.insert(letter);
        if state.wrong.len() >= state.max_wrong {
            state.result = Some(GameResult::OutOfGuesses);
            return Ok(Outcome::Finished(GameResult::OutOfGuesses));
        }
    }

    state.turn = (state.turn + 1) % state.participants.len();
    Ok(Outcome::Continue)
}
