//! Per-connection handler: the bridge between one socket and the
//! coordinator.
//!
//! Each accepted connection gets two tasks: a writer that drains the
//! connection's outbox into the socket, and this reader, which decodes
//! envelopes and forwards frames as commands. The reader enforces exactly
//! one protocol rule itself — `Hello` must arrive first, within five
//! seconds — because nothing before `Hello` is worth serializing.

use std::time::Duration;

use tokio::sync::mpsc;

use parlor_protocol::{ClientFrame, Codec, Envelope, ProtocolError, ServerFrame};
use parlor_transport::{Connection, WebSocketConnection};

use crate::ParlorError;
use crate::coordinator::Command;

/// Handles a single connection from accept to close. The `Closed` command
/// is sent on every exit path so the coordinator always runs the cascade.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    codec: C,
    commands: mpsc::UnboundedSender<Command>,
) -> Result<(), ParlorError>
where
    C: Codec + Clone,
{
    let conn_id = conn.id();
    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

    if commands
        .send(Command::Open {
            conn: conn_id,
            outbox: outbox_tx,
        })
        .is_err()
    {
        // Coordinator is gone; nothing to handle.
        return Ok(());
    }

    // The writer ends when the coordinator detaches the outbox.
    let writer = tokio::spawn(write_loop(conn.clone(), codec.clone(), outbox_rx));

    let result = read_loop(&conn, &codec, &commands, conn_id).await;

    // The cascade detaches the outbox, which lets the writer drain any
    // already-queued frames and exit before the socket is closed.
    let _ = commands.send(Command::Closed { conn: conn_id });
    let _ = writer.await;
    let _ = conn.close().await;

    result
}

/// Pumps the connection's outbox into the socket.
async fn write_loop<C: Codec>(
    conn: WebSocketConnection,
    codec: C,
    mut outbox: mpsc::UnboundedReceiver<Envelope<ServerFrame>>,
) {
    while let Some(envelope) = outbox.recv().await {
        let bytes = match codec.encode(&envelope) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(conn = %conn.id(), error = %e, "encode failed");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn = %conn.id(), error = %e, "send failed");
            return;
        }
    }
}

/// Decodes inbound envelopes and forwards their frames to the coordinator.
async fn read_loop<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    commands: &mpsc::UnboundedSender<Command>,
    conn_id: parlor_transport::ConnectionId,
) -> Result<(), ParlorError> {
    let hello = await_hello(conn, codec).await?;
    if commands
        .send(Command::Frame {
            conn: conn_id,
            frame: hello,
        })
        .is_err()
    {
        return Ok(());
    }

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(conn = %conn_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(conn = %conn_id, error = %e, "recv error");
                return Ok(());
            }
        };

        let envelope: Envelope<ClientFrame> = match codec.decode(&data) {
            Ok(envelope) => envelope,
            Err(e) => {
                // Malformed frames are dropped, not fatal.
                tracing::debug!(conn = %conn_id, error = %e, "decode failed");
                continue;
            }
        };

        if commands
            .send(Command::Frame {
                conn: conn_id,
                frame: envelope.frame,
            })
            .is_err()
        {
            return Ok(());
        }
    }
}

/// Waits for the identity frame: first frame, `Hello`, within five seconds.
async fn await_hello<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
) -> Result<ClientFrame, ParlorError> {
    let data = match tokio::time::timeout(Duration::from_secs(5), conn.recv())
        .await
    {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidFrame(
                "connection closed before Hello".into(),
            )
            .into());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            return Err(ProtocolError::InvalidFrame(
                "timed out waiting for Hello".into(),
            )
            .into());
        }
    };

    let envelope: Envelope<ClientFrame> = codec.decode(&data)?;
    match envelope.frame {
        frame @ ClientFrame::Hello { .. } => Ok(frame),
        _ => Err(ProtocolError::InvalidFrame(
            "first frame must be Hello".into(),
        )
        .into()),
    }
}
