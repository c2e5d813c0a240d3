//! Fan-out delivery table: connection id → outbound channel.
//!
//! Components that decide *who* should receive an event (presence rosters,
//! game sessions) hand this table a resolved set of connection ids; the
//! table only handles delivery. Each connection's handler task drains its
//! receiver and writes frames to the socket.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::ConnectionId;

/// Maps live connections to their outbound message channels.
///
/// `M` is whatever fully-formed message type the server pushes (Parlor uses
/// its protocol envelope). Sends to a closed receiver are silently dropped —
/// by the time a send races a disconnect, the connection's cleanup is
/// already queued behind it.
pub struct Fanout<M> {
    outboxes: HashMap<ConnectionId, mpsc::UnboundedSender<M>>,
}

impl<M: Clone> Fanout<M> {
    /// Creates an empty delivery table.
    pub fn new() -> Self {
        Self {
            outboxes: HashMap::new(),
        }
    }

    /// Registers a connection's outbound channel.
    pub fn attach(
        &mut self,
        conn: ConnectionId,
        sender: mpsc::UnboundedSender<M>,
    ) {
        self.outboxes.insert(conn, sender);
    }

    /// Removes a connection from the table.
    pub fn detach(&mut self, conn: ConnectionId) {
        self.outboxes.remove(&conn);
    }

    /// Delivers a message to a single connection.
    pub fn send_to(&self, conn: ConnectionId, msg: M) {
        if let Some(tx) = self.outboxes.get(&conn) {
            let _ = tx.send(msg);
        }
    }

    /// Delivers a message to every connection in the resolved set.
    pub fn send_many(&self, conns: &[ConnectionId], msg: M) {
        for conn in conns {
            self.send_to(*conn, msg.clone());
        }
    }

    /// Returns the number of attached connections.
    pub fn len(&self) -> usize {
        self.outboxes.len()
    }

    /// Returns `true` if no connections are attached.
    pub fn is_empty(&self) -> bool {
        self.outboxes.is_empty()
    }
}

impl<M: Clone> Default for Fanout<M> {
    fn default() -> Self {
        Self::new()
    }
}
