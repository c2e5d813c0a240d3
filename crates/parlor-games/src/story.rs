//! The story engine: participants take turns contributing lines until the
//! line limit is reached.
//!
//! Turn order rotates strictly through the participants in join order.
//! Overlong lines are truncated rather than rejected, so a flow of play is
//! never interrupted by a verbose author.

use std::time::{SystemTime, UNIX_EPOCH};

use parlor_protocol::{GameAction, GameResult, StoryLine, StoryState, UserId};

use crate::engine::{ActionError, Outcome, action_name};

/// Submitted lines are capped at this many characters; the excess is
/// dropped, not rejected.
pub const MAX_LINE_CHARS: usize = 500;

/// Creates the initial state. The first joiner writes first.
pub fn start(participants: [UserId; 2], max_lines: usize) -> StoryState {
    StoryState {
        lines: Vec::new(),
        participants,
        turn: 0,
        max_lines,
        result: None,
    }
}

/// Applies one player action. On rejection the state is unchanged.
pub fn apply(
    state: &mut StoryState,
    actor: &UserId,
    action: &GameAction,
) -> Result<Outcome, ActionError> {
    match action {
        GameAction::SubmitLine { text } => submit(state, actor, text),
        GameAction::Restart => {
            if state.result.is_some() {
                return Err(ActionError::GameOver);
            }
            state.lines.clear();
            state.turn = 0;
            Ok(Outcome::Continue)
        }
        other => Err(ActionError::Unsupported(action_name(other))),
    }
}

fn submit(
    state: &mut StoryState,
    actor: &UserId,
    text: &str,
) -> Result<Outcome, ActionError> {
    if state.result.is_some() || state.lines.len() >= state.max_lines {
        return Err(ActionError::GameOver);
    }
    if &state.participants[state.turn] != actor {
        return Err(ActionError::OutOfTurn);
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ActionError::EmptyLine);
    }
    let text: String = trimmed.chars().take(MAX_LINE_CHARS).collect();

    state.lines.push(StoryLine {
        author: actor.clone(),
        text,
        at: unix_millis(),
    });
    state.turn = (state.turn + 1) % state.participants.len();

    if state.lines.len() == state.max_lines {
        state.result = Some(GameResult::Completed);
        return Ok(Outcome::Finished(GameResult::Completed));
    }
    Ok(Outcome::Continue)
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
