//! The game session manager: every running game between two participants.
//!
//! A session is born `Waiting` from an accepted invite, goes `Active` when
//! both participants have joined, and is removed when the game finishes,
//! a participant leaves, or a participant disconnects. There is no pause or
//! reconnection.
//!
//! # Concurrency note
//!
//! `SessionManager` uses a plain `HashMap` and is not thread-safe by
//! itself. It is owned by the coordinator task, which serializes every
//! client action, so no locking is needed here.

use std::collections::HashMap;

use parlor_games::{GameConfig, Outcome, WordEntry, builtin_words, grid, letters, story};
use parlor_protocol::{
    GameAction, GameKind, GameResult, GameSnapshot, Invite, RoomId,
    SessionId, UserId,
};
use rand::Rng;

use crate::error::SessionError;

/// Where a session is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Created from an accepted invite; waiting for both joins.
    Waiting,
    /// Both participants joined; the engine is running.
    Active,
    /// The engine reported a terminal result.
    Finished,
}

/// One game between the two invited participants.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: SessionId,
    pub game: GameKind,
    pub room_id: RoomId,
    /// The invite pair: sender first, recipient second.
    pub invited: [UserId; 2],
    /// Who has joined so far, in join order. Join order decides who moves
    /// first, not invite order.
    pub joined: Vec<UserId>,
    pub status: SessionStatus,
    /// Engine state; `Some` once the session is `Active`.
    pub state: Option<GameSnapshot>,
}

impl GameSession {
    fn is_participant(&self, user: &UserId) -> bool {
        self.invited.contains(user)
    }
}

/// Manages all game sessions.
pub struct SessionManager {
    sessions: HashMap<SessionId, GameSession>,
    config: GameConfig,
}

impl SessionManager {
    /// Creates an empty manager. Config words with no letters to guess are
    /// dropped, and an empty (or emptied) word list is replaced with the
    /// built-in list, so the letters game always has a solvable word to
    /// draw.
    pub fn new(mut config: GameConfig) -> Self {
        config
            .words
            .retain(|w| w.word.chars().any(|c| c.is_ascii_alphabetic()));
        if config.words.is_empty() {
            config.words = builtin_words();
        }
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    /// Creates a `Waiting` session from an accepted invite. The session
    /// reuses the invite's id.
    pub fn create(&mut self, invite: &Invite) -> &GameSession {
        let id = SessionId::from(invite.id.clone());
        let session = GameSession {
            id: id.clone(),
            game: invite.game,
            room_id: invite.room_id.clone(),
            invited: [invite.sender.clone(), invite.recipient.clone()],
            joined: Vec::new(),
            status: SessionStatus::Waiting,
            state: None,
        };
        self.sessions.insert(id.clone(), session);

        tracing::info!(session_id = %id, game = %invite.game, "session created");

        self.sessions.get(&id).expect("just inserted")
    }

    /// Records a participant joining. The second distinct join reaches
    /// quorum: the engine starts with join-ordered participants and the
    /// initial state is returned for broadcast.
    ///
    /// # Errors
    /// - [`SessionError::UnknownSession`] — no such session, or `user` was
    ///   not invited to it
    /// - [`SessionError::AlreadyJoined`] — duplicate join
    /// - [`SessionError::AlreadyStarted`] — join after activation
    pub fn join(
        &mut self,
        id: &SessionId,
        user: &UserId,
    ) -> Result<Option<GameSnapshot>, SessionError> {
        let Self { sessions, config } = self;
        let session = sessions
            .get_mut(id)
            .filter(|s| s.is_participant(user))
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))?;

        if session.status != SessionStatus::Waiting {
            return Err(SessionError::AlreadyStarted(id.clone()));
        }
        if session.joined.contains(user) {
            return Err(SessionError::AlreadyJoined(id.clone()));
        }

        session.joined.push(user.clone());
        if session.joined.len() < 2 {
            return Ok(None);
        }

        let participants =
            [session.joined[0].clone(), session.joined[1].clone()];
        let snapshot = match session.game {
            GameKind::Grid => GameSnapshot::Grid(grid::start(participants)),
            GameKind::Story => GameSnapshot::Story(story::start(
                participants,
                config.max_story_lines,
            )),
            GameKind::Letters => GameSnapshot::Letters(letters::start(
                participants,
                &draw_word(&config.words),
                config.max_wrong_guesses,
            )),
        };
        session.state = Some(snapshot.clone());
        session.status = SessionStatus::Active;

        tracing::info!(session_id = %id, "session active");
        Ok(Some(snapshot))
    }

    /// Routes a game action to the session's engine and returns the updated
    /// state for broadcast, with the terminal result if it finished. A
    /// finished session stays in the table, marked `Finished`, until the
    /// caller has notified the participants and calls [`end`](Self::end);
    /// further actions on it are rejected by the engine.
    ///
    /// # Errors
    /// - [`SessionError::UnknownSession`] — no such session, or `actor` is
    ///   not a participant
    /// - [`SessionError::NotStarted`] — the session is still `Waiting`
    /// - [`SessionError::Action`] — the engine rejected the action; state
    ///   is unchanged
    pub fn dispatch(
        &mut self,
        id: &SessionId,
        actor: &UserId,
        action: &GameAction,
    ) -> Result<(GameSnapshot, Option<GameResult>), SessionError> {
        let Self { sessions, config } = self;
        let session = sessions
            .get_mut(id)
            .filter(|s| s.is_participant(actor))
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))?;

        let Some(state) = session.state.as_mut() else {
            return Err(SessionError::NotStarted(id.clone()));
        };

        let outcome = match state {
            // The letters engine cannot restart itself: a replay needs a
            // freshly drawn word, which only this layer can supply.
            GameSnapshot::Letters(s)
                if matches!(action, GameAction::Restart) =>
            {
                if s.result.is_some() {
                    return Err(parlor_games::ActionError::GameOver.into());
                }
                letters::redraw(s, &draw_word(&config.words));
                Outcome::Continue
            }
            GameSnapshot::Grid(s) => grid::apply(s, actor, action)?,
            GameSnapshot::Story(s) => story::apply(s, actor, action)?,
            GameSnapshot::Letters(s) => letters::apply(s, actor, action)?,
        };
        let snapshot = state.clone();

        match outcome {
            Outcome::Continue => Ok((snapshot, None)),
            Outcome::Finished(result) => {
                session.status = SessionStatus::Finished;
                tracing::info!(session_id = %id, ?result, "session finished");
                Ok((snapshot, Some(result)))
            }
        }
    }

    /// Removes a session because `actor` chose to leave it.
    ///
    /// # Errors
    /// Returns [`SessionError::UnknownSession`] if the session does not
    /// exist or `actor` is not a participant.
    pub fn leave(
        &mut self,
        id: &SessionId,
        actor: &UserId,
    ) -> Result<GameSession, SessionError> {
        if !self
            .sessions
            .get(id)
            .is_some_and(|s| s.is_participant(actor))
        {
            return Err(SessionError::UnknownSession(id.clone()));
        }
        let session = self.sessions.remove(id).expect("presence checked");
        tracing::info!(session_id = %id, %actor, "session left");
        Ok(session)
    }

    /// Removes a session unconditionally (disconnect cascade). Returns the
    /// removed session so the remaining participant can be notified.
    pub fn end(&mut self, id: &SessionId) -> Option<GameSession> {
        let session = self.sessions.remove(id);
        if session.is_some() {
            tracing::info!(session_id = %id, "session ended");
        }
        session
    }

    /// Every session `user` participates in, joined or not.
    pub fn sessions_with(&self, user: &UserId) -> Vec<SessionId> {
        self.sessions
            .values()
            .filter(|s| s.is_participant(user))
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn get(&self, id: &SessionId) -> Option<&GameSession> {
        self.sessions.get(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Picks a random word from a non-empty list.
fn draw_word(words: &[WordEntry]) -> WordEntry {
    let index = rand::rng().random_range(0..words.len());
    words[index].clone()
}
