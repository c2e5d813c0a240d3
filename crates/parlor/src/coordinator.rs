//! The coordinator: one task that owns every mutable table.
//!
//! Connection handlers feed it a single command stream, so every client
//! action — frames and disconnects alike — is applied in arrival order.
//! That gives each game session one interleaving of events with no locks
//! around the registry, presence, invites, or sessions; handlers only do
//! socket I/O.

use std::time::Instant;

use tokio::sync::mpsc;

use parlor_games::GameConfig;
use parlor_protocol::{
    ClientFrame, Envelope, GameAction, GameKind, InviteId, RoomId,
    ServerFrame, SessionEndReason, SessionId, UserId,
};
use parlor_room::PresenceDirectory;
use parlor_session::{
    InviteBroker, InviteError, SessionError, SessionManager,
};
use parlor_transport::{ConnectionId, Fanout};

use crate::registry::ConnectionRegistry;

/// One unit of work for the coordinator.
pub(crate) enum Command {
    /// A connection was accepted; `outbox` is where its frames go.
    Open {
        conn: ConnectionId,
        outbox: mpsc::UnboundedSender<Envelope<ServerFrame>>,
    },
    /// A decoded frame arrived on a connection.
    Frame {
        conn: ConnectionId,
        frame: ClientFrame,
    },
    /// The connection is gone, cleanly or not.
    Closed { conn: ConnectionId },
}

/// Owns all server state and processes commands one at a time.
pub(crate) struct Coordinator {
    registry: ConnectionRegistry,
    presence: PresenceDirectory,
    broker: InviteBroker,
    sessions: SessionManager,
    fanout: Fanout<Envelope<ServerFrame>>,
    seq: u64,
    started: Instant,
}

impl Coordinator {
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            presence: PresenceDirectory::new(),
            broker: InviteBroker::default(),
            sessions: SessionManager::new(config),
            fanout: Fanout::new(),
            seq: 0,
            started: Instant::now(),
        }
    }

    /// Drains the command stream until every handler has hung up.
    pub(crate) async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Open { conn, outbox } => self.on_open(conn, outbox),
                Command::Frame { conn, frame } => self.on_frame(conn, frame),
                Command::Closed { conn } => self.on_closed(conn),
            }
        }
        tracing::info!("coordinator stopped");
    }

    fn on_open(
        &mut self,
        conn: ConnectionId,
        outbox: mpsc::UnboundedSender<Envelope<ServerFrame>>,
    ) {
        self.registry.register(conn);
        self.fanout.attach(conn, outbox);
        self.send_to(conn, ServerFrame::Welcome { connection_id: conn });
    }

    fn on_frame(&mut self, conn: ConnectionId, frame: ClientFrame) {
        match frame {
            ClientFrame::Hello {
                user_id,
                display_name,
            } => self.on_hello(conn, user_id, display_name),
            ClientFrame::JoinRoom { room_id } => self.on_join_room(conn, room_id),
            ClientFrame::SendInvite { recipient, game } => {
                self.on_send_invite(conn, recipient, game)
            }
            ClientFrame::RespondInvite { invite_id, accept } => {
                self.on_respond_invite(conn, invite_id, accept)
            }
            ClientFrame::GameAction { session_id, action } => {
                self.on_game_action(conn, session_id, action)
            }
            ClientFrame::LeaveSession { session_id } => {
                self.on_leave_session(conn, session_id)
            }
        }
    }

    fn on_hello(
        &mut self,
        conn: ConnectionId,
        user_id: UserId,
        display_name: String,
    ) {
        if !self.registry.bind(conn, user_id, display_name) {
            self.reject(conn, 400, "connection already identified");
        }
    }

    fn on_join_room(&mut self, conn: ConnectionId, room_id: RoomId) {
        let Some((user_id, display_name)) = self.identity(conn) else {
            self.reject(conn, 400, "identify with Hello first");
            return;
        };

        // Matchmaking assigns one room at a time; joining a new one
        // implicitly leaves the old.
        if let Some(old) = self.registry.resolve(conn).and_then(|e| e.room.clone())
        {
            if old != room_id
                && self.presence.leave(&old, &user_id).is_some()
            {
                self.broadcast_roster(&old);
            }
        }

        self.presence.join(&room_id, user_id, display_name, conn);
        self.registry.set_room(conn, room_id.clone());
        self.broadcast_roster(&room_id);
    }

    fn on_send_invite(
        &mut self,
        conn: ConnectionId,
        recipient: UserId,
        game: GameKind,
    ) {
        let Some((sender, _)) = self.identity(conn) else {
            self.reject(conn, 400, "identify with Hello first");
            return;
        };
        let Some(room_id) =
            self.registry.resolve(conn).and_then(|e| e.room.clone())
        else {
            self.reject(conn, 409, "join a room before inviting");
            return;
        };

        let roster = self.presence.roster(&room_id).to_vec();
        match self
            .broker
            .send(room_id, sender, recipient, game, &roster)
        {
            Ok(invite) => {
                if let Some(target) =
                    roster.iter().find(|m| m.user_id == invite.recipient)
                {
                    let target = target.connection_id;
                    self.send_to(
                        target,
                        ServerFrame::InviteReceived { invite },
                    );
                }
            }
            Err(e) => self.reject_invite_error(conn, e),
        }
    }

    fn on_respond_invite(
        &mut self,
        conn: ConnectionId,
        invite_id: InviteId,
        accept: bool,
    ) {
        let Some((responder, _)) = self.identity(conn) else {
            self.reject(conn, 400, "identify with Hello first");
            return;
        };

        let invite = match self.broker.respond(&invite_id, &responder) {
            Ok(invite) => invite,
            Err(e) => {
                self.reject_invite_error(conn, e);
                return;
            }
        };

        if let Some(sender_conn) = self.registry.find_user(&invite.sender) {
            self.send_to(
                sender_conn,
                ServerFrame::InviteResolved {
                    invite_id: invite.id.clone(),
                    accepted: accept,
                },
            );
        }

        if !accept {
            return;
        }

        let session = self.sessions.create(&invite);
        let frame = ServerFrame::SessionStarted {
            session_id: session.id.clone(),
            game: session.game,
            participants: session.invited.clone(),
        };
        let conns = self.participant_conns(&invite.sender, &invite.recipient);
        self.broadcast(&conns, frame);
    }

    fn on_game_action(
        &mut self,
        conn: ConnectionId,
        session_id: SessionId,
        action: GameAction,
    ) {
        let Some((actor, _)) = self.identity(conn) else {
            self.reject(conn, 400, "identify with Hello first");
            return;
        };

        if matches!(action, GameAction::Join) {
            match self.sessions.join(&session_id, &actor) {
                // First join: nothing to broadcast until quorum.
                Ok(None) => {}
                Ok(Some(state)) => {
                    self.broadcast_session(&session_id, ServerFrame::GameState {
                        session_id: session_id.clone(),
                        state,
                    });
                }
                Err(e) => self.reject_session_error(conn, e),
            }
            return;
        }

        match self.sessions.dispatch(&session_id, &actor, &action) {
            Ok((state, result)) => {
                let conns = self.session_participant_conns(&session_id);
                self.broadcast(
                    &conns,
                    ServerFrame::GameState {
                        session_id: session_id.clone(),
                        state,
                    },
                );
                if let Some(result) = result {
                    self.broadcast(
                        &conns,
                        ServerFrame::SessionEnded {
                            session_id: session_id.clone(),
                            end: SessionEndReason::Completed { result },
                        },
                    );
                    self.sessions.end(&session_id);
                }
            }
            Err(e) => self.reject_session_error(conn, e),
        }
    }

    fn on_leave_session(&mut self, conn: ConnectionId, session_id: SessionId) {
        let Some((actor, _)) = self.identity(conn) else {
            self.reject(conn, 400, "identify with Hello first");
            return;
        };

        match self.sessions.leave(&session_id, &actor) {
            Ok(session) => {
                let conns = self
                    .participant_conns(&session.invited[0], &session.invited[1]);
                self.broadcast(
                    &conns,
                    ServerFrame::SessionEnded {
                        session_id,
                        end: SessionEndReason::ExplicitExit,
                    },
                );
            }
            Err(e) => self.reject_session_error(conn, e),
        }
    }

    /// The disconnect cascade: presence, invites, and sessions all unwind
    /// from one entry point, in that order.
    fn on_closed(&mut self, conn: ConnectionId) {
        self.fanout.detach(conn);
        let Some(entry) = self.registry.unregister(conn) else {
            return;
        };
        let Some((user_id, _)) = entry.user else {
            return;
        };

        if let Some(room_id) = entry.room {
            // Skip the leave if the user already reappeared on a newer
            // connection (refresh race): the roster entry is theirs now.
            let still_mine = self
                .presence
                .member(&room_id, &user_id)
                .is_some_and(|m| m.connection_id == conn);
            if still_mine && self.presence.leave(&room_id, &user_id).is_some()
            {
                self.broadcast_roster(&room_id);
            }
        }

        for invite in self.broker.cancel_for(&user_id) {
            let other = if invite.sender == user_id {
                invite.recipient
            } else {
                invite.sender
            };
            if let Some(other_conn) = self.registry.find_user(&other) {
                self.send_to(
                    other_conn,
                    ServerFrame::InviteResolved {
                        invite_id: invite.id,
                        accepted: false,
                    },
                );
            }
        }

        for session_id in self.sessions.sessions_with(&user_id) {
            let Some(session) = self.sessions.end(&session_id) else {
                continue;
            };
            for participant in &session.invited {
                if participant == &user_id {
                    continue;
                }
                if let Some(c) = self.registry.find_user(participant) {
                    self.send_to(
                        c,
                        ServerFrame::SessionEnded {
                            session_id: session_id.clone(),
                            end: SessionEndReason::OpponentLeft,
                        },
                    );
                }
            }
        }

        tracing::info!(%conn, user_id = %user_id, "disconnect cascade complete");
    }

    // -- Helpers ------------------------------------------------------------

    fn identity(&self, conn: ConnectionId) -> Option<(UserId, String)> {
        self.registry.resolve(conn)?.user.clone()
    }

    fn envelope(&mut self, frame: ServerFrame) -> Envelope<ServerFrame> {
        self.seq += 1;
        Envelope {
            seq: self.seq,
            timestamp: self.started.elapsed().as_millis() as u64,
            frame,
        }
    }

    fn send_to(&mut self, conn: ConnectionId, frame: ServerFrame) {
        let envelope = self.envelope(frame);
        self.fanout.send_to(conn, envelope);
    }

    fn broadcast(&mut self, conns: &[ConnectionId], frame: ServerFrame) {
        let envelope = self.envelope(frame);
        self.fanout.send_many(conns, envelope);
    }

    fn broadcast_roster(&mut self, room_id: &RoomId) {
        let members = self.presence.roster(room_id).to_vec();
        let conns = self.presence.connections(room_id);
        self.broadcast(
            &conns,
            ServerFrame::Roster {
                room_id: room_id.clone(),
                members,
            },
        );
    }

    fn broadcast_session(&mut self, session_id: &SessionId, frame: ServerFrame) {
        let conns = self.session_participant_conns(session_id);
        self.broadcast(&conns, frame);
    }

    fn session_participant_conns(
        &self,
        session_id: &SessionId,
    ) -> Vec<ConnectionId> {
        self.sessions
            .get(session_id)
            .map(|s| self.participant_conns(&s.invited[0], &s.invited[1]))
            .unwrap_or_default()
    }

    fn participant_conns(&self, a: &UserId, b: &UserId) -> Vec<ConnectionId> {
        [a, b]
            .iter()
            .filter_map(|u| self.registry.find_user(u))
            .collect()
    }

    fn reject(&mut self, conn: ConnectionId, code: u16, message: &str) {
        tracing::debug!(%conn, code, message, "frame rejected");
        self.send_to(
            conn,
            ServerFrame::Rejected {
                code,
                message: message.to_string(),
            },
        );
    }

    fn reject_invite_error(&mut self, conn: ConnectionId, err: InviteError) {
        let code = match err {
            InviteError::InvalidRecipient(_) => 409,
            InviteError::UnknownInvite(_) => 404,
        };
        self.reject(conn, code, &err.to_string());
    }

    fn reject_session_error(&mut self, conn: ConnectionId, err: SessionError) {
        let code = match err {
            SessionError::UnknownSession(_) => 404,
            _ => 400,
        };
        self.reject(conn, code, &err.to_string());
    }
}
