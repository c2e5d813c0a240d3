//! Runs a Parlor coordination server with the default game configuration.
//!
//! Filter logs with `RUST_LOG`, e.g. `RUST_LOG=parlor=debug`.

use parlor::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = ParlorServer::builder().bind("0.0.0.0:8080").build().await?;
    tracing::info!(addr = %server.local_addr()?, "parlor server listening");

    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    //! End-to-end scenarios against a real server over WebSocket, driven
    //! with a raw `tokio-tungstenite` client the way a browser would speak
    //! to us.

    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use parlor::prelude::*;
    use tokio_tungstenite::tungstenite::Message;

    type Ws = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn start() -> String {
        let server = ParlorServer::builder()
            .bind("127.0.0.1:0")
            .build()
            .await
            .unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        addr
    }

    async fn connect(addr: &str) -> Ws {
        let (ws, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .unwrap();
        ws
    }

    async fn send(ws: &mut Ws, frame: ClientFrame) {
        let envelope = Envelope {
            seq: 0,
            timestamp: 0,
            frame,
        };
        let bytes = serde_json::to_vec(&envelope).unwrap();
        ws.send(Message::Binary(bytes.into())).await.unwrap();
    }

    async fn recv(ws: &mut Ws) -> ServerFrame {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        let envelope: Envelope<ServerFrame> =
            serde_json::from_slice(&msg.into_data()).unwrap();
        envelope.frame
    }

    /// Connects, identifies, and joins `room`. Consumes the `Welcome` and
    /// the immediate `Roster` push.
    async fn enter(addr: &str, user: &str, room: &str) -> Ws {
        let mut ws = connect(addr).await;
        assert!(matches!(recv(&mut ws).await, ServerFrame::Welcome { .. }));
        send(
            &mut ws,
            ClientFrame::Hello {
                user_id: UserId::from(user),
                display_name: user.to_uppercase(),
            },
        )
        .await;
        send(
            &mut ws,
            ClientFrame::JoinRoom {
                room_id: RoomId::from(room),
            },
        )
        .await;
        let frame = recv(&mut ws).await;
        assert!(matches!(frame, ServerFrame::Roster { .. }));
        ws
    }

    /// Two users in one room; alice's stale roster push is drained.
    async fn paired_room(addr: &str, room: &str) -> (Ws, Ws) {
        let mut alice = enter(addr, "alice", room).await;
        let bob = enter(addr, "bob", room).await;
        let frame = recv(&mut alice).await; // roster grew to two
        assert!(matches!(frame, ServerFrame::Roster { .. }));
        (alice, bob)
    }

    /// Runs invite → accept → both join. Returns the session id; both
    /// sockets have consumed everything up to the initial `GameState`.
    async fn start_game(
        alice: &mut Ws,
        bob: &mut Ws,
        game: GameKind,
    ) -> SessionId {
        send(
            alice,
            ClientFrame::SendInvite {
                recipient: UserId::from("bob"),
                game,
            },
        )
        .await;
        let ServerFrame::InviteReceived { invite } = recv(bob).await else {
            panic!("expected InviteReceived");
        };

        send(
            bob,
            ClientFrame::RespondInvite {
                invite_id: invite.id.clone(),
                accept: true,
            },
        )
        .await;
        let ServerFrame::InviteResolved { accepted: true, .. } =
            recv(alice).await
        else {
            panic!("expected InviteResolved");
        };
        let ServerFrame::SessionStarted { session_id, .. } = recv(alice).await
        else {
            panic!("expected SessionStarted");
        };
        assert!(matches!(recv(bob).await, ServerFrame::SessionStarted { .. }));

        // Alice joins first, so she moves first.
        send(
            alice,
            ClientFrame::GameAction {
                session_id: session_id.clone(),
                action: GameAction::Join,
            },
        )
        .await;
        send(
            bob,
            ClientFrame::GameAction {
                session_id: session_id.clone(),
                action: GameAction::Join,
            },
        )
        .await;
        assert!(matches!(recv(alice).await, ServerFrame::GameState { .. }));
        assert!(matches!(recv(bob).await, ServerFrame::GameState { .. }));

        session_id
    }

    async fn place(ws: &mut Ws, session_id: &SessionId, cell: usize) {
        send(
            ws,
            ClientFrame::GameAction {
                session_id: session_id.clone(),
                action: GameAction::Place { cell },
            },
        )
        .await;
    }

    #[tokio::test]
    async fn test_roster_broadcast_on_join() {
        let addr = start().await;
        let mut alice = enter(&addr, "alice", "room-1").await;
        let mut bob = enter(&addr, "bob", "room-1").await;

        // Alice's update lists both members in first-join order.
        let ServerFrame::Roster { room_id, members } = recv(&mut alice).await
        else {
            panic!("expected Roster");
        };
        assert_eq!(room_id, RoomId::from("room-1"));
        let names: Vec<_> =
            members.iter().map(|m| m.user_id.clone()).collect();
        assert_eq!(names, [UserId::from("alice"), UserId::from("bob")]);

        // Rooms are isolated: a third user elsewhere changes nothing here.
        let _carol = enter(&addr, "carol", "room-2").await;
        send(
            &mut bob,
            ClientFrame::SendInvite {
                recipient: UserId::from("alice"),
                game: GameKind::Grid,
            },
        )
        .await;
        assert!(matches!(
            recv(&mut alice).await,
            ServerFrame::InviteReceived { .. }
        ));
    }

    #[tokio::test]
    async fn test_frame_before_hello_closes_connection() {
        let addr = start().await;
        let mut ws = connect(&addr).await;
        let _ = recv(&mut ws).await; // Welcome

        send(
            &mut ws,
            ClientFrame::JoinRoom {
                room_id: RoomId::from("room-1"),
            },
        )
        .await;

        let end = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out");
        assert!(
            !matches!(end, Some(Ok(Message::Binary(_)))),
            "server must not serve an anonymous connection"
        );
    }

    #[tokio::test]
    async fn test_invite_to_absent_user_is_rejected_409() {
        let addr = start().await;
        let mut alice = enter(&addr, "alice", "room-1").await;

        send(
            &mut alice,
            ClientFrame::SendInvite {
                recipient: UserId::from("nobody"),
                game: GameKind::Grid,
            },
        )
        .await;

        let ServerFrame::Rejected { code, .. } = recv(&mut alice).await else {
            panic!("expected Rejected");
        };
        assert_eq!(code, 409);
    }

    #[tokio::test]
    async fn test_declined_invite_notifies_sender() {
        let addr = start().await;
        let (mut alice, mut bob) = paired_room(&addr, "room-1").await;

        send(
            &mut alice,
            ClientFrame::SendInvite {
                recipient: UserId::from("bob"),
                game: GameKind::Story,
            },
        )
        .await;
        let ServerFrame::InviteReceived { invite } = recv(&mut bob).await
        else {
            panic!("expected InviteReceived");
        };

        send(
            &mut bob,
            ClientFrame::RespondInvite {
                invite_id: invite.id.clone(),
                accept: false,
            },
        )
        .await;
        let ServerFrame::InviteResolved {
            invite_id,
            accepted,
        } = recv(&mut alice).await
        else {
            panic!("expected InviteResolved");
        };
        assert_eq!(invite_id, invite.id);
        assert!(!accepted);

        // The invite is consumed; a second response finds nothing.
        send(
            &mut bob,
            ClientFrame::RespondInvite {
                invite_id: invite.id,
                accept: true,
            },
        )
        .await;
        let ServerFrame::Rejected { code, .. } = recv(&mut bob).await else {
            panic!("expected Rejected");
        };
        assert_eq!(code, 404);
    }

    #[tokio::test]
    async fn test_grid_game_to_a_win() {
        let addr = start().await;
        let (mut alice, mut bob) = paired_room(&addr, "room-1").await;
        let session_id = start_game(&mut alice, &mut bob, GameKind::Grid).await;

        // Alice takes the top row; every accepted move reaches both.
        for (cell_a, cell_b) in [(0, 3), (1, 4)] {
            place(&mut alice, &session_id, cell_a).await;
            assert!(matches!(recv(&mut alice).await, ServerFrame::GameState { .. }));
            assert!(matches!(recv(&mut bob).await, ServerFrame::GameState { .. }));
            place(&mut bob, &session_id, cell_b).await;
            assert!(matches!(recv(&mut alice).await, ServerFrame::GameState { .. }));
            assert!(matches!(recv(&mut bob).await, ServerFrame::GameState { .. }));
        }

        place(&mut alice, &session_id, 2).await;
        let ServerFrame::GameState { state, .. } = recv(&mut alice).await
        else {
            panic!("expected final GameState");
        };
        let GameSnapshot::Grid(grid) = state else {
            panic!("expected a grid snapshot");
        };
        assert!(grid.result.is_some());

        let ServerFrame::SessionEnded { session_id: ended, .. } =
            recv(&mut alice).await
        else {
            panic!("expected SessionEnded");
        };
        assert_eq!(ended, session_id);
        let _ = recv(&mut bob).await; // GameState
        assert!(matches!(
            recv(&mut bob).await,
            ServerFrame::SessionEnded { .. }
        ));
    }

    #[tokio::test]
    async fn test_out_of_turn_move_is_rejected_privately() {
        let addr = start().await;
        let (mut alice, mut bob) = paired_room(&addr, "room-1").await;
        let session_id = start_game(&mut alice, &mut bob, GameKind::Grid).await;

        // Bob joined second; moving first gets him a 400 and nothing is
        // broadcast.
        place(&mut bob, &session_id, 0).await;
        let ServerFrame::Rejected { code, .. } = recv(&mut bob).await else {
            panic!("expected Rejected");
        };
        assert_eq!(code, 400);

        // Alice's view is untouched: her next frame is her own move.
        place(&mut alice, &session_id, 4).await;
        let ServerFrame::GameState { state, .. } = recv(&mut alice).await
        else {
            panic!("expected GameState");
        };
        let GameSnapshot::Grid(grid) = state else {
            panic!("expected a grid snapshot");
        };
        assert_eq!(grid.board.iter().flatten().count(), 1);
    }

    #[tokio::test]
    async fn test_action_on_unknown_session_is_rejected_404() {
        let addr = start().await;
        let mut alice = enter(&addr, "alice", "room-1").await;

        send(
            &mut alice,
            ClientFrame::GameAction {
                session_id: SessionId::from("grid-9-zz"),
                action: GameAction::Place { cell: 0 },
            },
        )
        .await;
        let ServerFrame::Rejected { code, .. } = recv(&mut alice).await else {
            panic!("expected Rejected");
        };
        assert_eq!(code, 404);
    }

    #[tokio::test]
    async fn test_disconnect_cascades_to_roster_and_session() {
        let addr = start().await;
        let (mut alice, mut bob) = paired_room(&addr, "room-1").await;
        let session_id = start_game(&mut alice, &mut bob, GameKind::Story).await;

        bob.close(None).await.unwrap();

        // Roster shrinks first, then the session is torn down.
        let ServerFrame::Roster { members, .. } = recv(&mut alice).await
        else {
            panic!("expected Roster");
        };
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, UserId::from("alice"));

        let ServerFrame::SessionEnded { session_id: ended, .. } =
            recv(&mut alice).await
        else {
            panic!("expected SessionEnded");
        };
        assert_eq!(ended, session_id);

        // The dead session no longer accepts actions.
        send(
            &mut alice,
            ClientFrame::GameAction {
                session_id,
                action: GameAction::SubmitLine {
                    text: "anyone there?".into(),
                },
            },
        )
        .await;
        let ServerFrame::Rejected { code, .. } = recv(&mut alice).await else {
            panic!("expected Rejected");
        };
        assert_eq!(code, 404);
    }

    #[tokio::test]
    async fn test_story_lines_alternate_and_accumulate() {
        let addr = start().await;
        let (mut alice, mut bob) = paired_room(&addr, "room-1").await;
        let session_id = start_game(&mut alice, &mut bob, GameKind::Story).await;

        async fn submit(
            ws: &mut Ws,
            other: &mut Ws,
            session_id: &SessionId,
            text: &str,
        ) {
            send(
                ws,
                ClientFrame::GameAction {
                    session_id: session_id.clone(),
                    action: GameAction::SubmitLine { text: text.into() },
                },
            )
            .await;
            assert!(matches!(recv(ws).await, ServerFrame::GameState { .. }));
            assert!(matches!(recv(other).await, ServerFrame::GameState { .. }));
        }

        submit(&mut alice, &mut bob, &session_id, "Once upon a time").await;
        submit(&mut bob, &mut alice, &session_id, "a websocket blinked.").await;

        send(
            &mut alice,
            ClientFrame::GameAction {
                session_id,
                action: GameAction::SubmitLine { text: "The end?".into() },
            },
        )
        .await;
        let ServerFrame::GameState { state, .. } = recv(&mut alice).await
        else {
            panic!("expected GameState");
        };
        let GameSnapshot::Story(story) = state else {
            panic!("expected a story snapshot");
        };
        assert_eq!(story.lines.len(), 3);
        assert_eq!(story.lines[1].author, UserId::from("bob"));
    }
}
