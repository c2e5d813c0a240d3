//! The connection registry: what the server knows about each live socket.
//!
//! A connection starts anonymous, gains an identity with `Hello`, and may
//! later be placed in a room. The registry is the single source of truth
//! for those facts; presence, invites, and sessions all consult it through
//! the coordinator.

use std::collections::HashMap;

use parlor_protocol::{RoomId, UserId};
use parlor_transport::ConnectionId;

/// What is known about one live connection.
#[derive(Debug, Clone, Default)]
pub struct ConnEntry {
    /// Identity presented in `Hello`; `None` until then.
    pub user: Option<(UserId, String)>,
    /// The room the connection joined, if any.
    pub room: Option<RoomId>,
}

/// Tracks every live connection, keyed by connection id.
///
/// A user briefly has two live connections during a reconnect race; the
/// `by_user` index always points at the most recently bound one, so
/// directed frames reach the socket the user is actually watching.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: HashMap<ConnectionId, ConnEntry>,
    by_user: HashMap<UserId, ConnectionId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly accepted connection with no identity.
    pub fn register(&mut self, conn: ConnectionId) {
        self.entries.insert(conn, ConnEntry::default());
        tracing::debug!(%conn, "connection registered");
    }

    /// Binds an identity to a connection. The binding is set-once: a second
    /// `Hello` on the same connection returns `false` and changes nothing.
    pub fn bind(
        &mut self,
        conn: ConnectionId,
        user_id: UserId,
        display_name: String,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&conn) else {
            return false;
        };
        if entry.user.is_some() {
            return false;
        }
        tracing::info!(%conn, user_id = %user_id, "identity bound");
        self.by_user.insert(user_id.clone(), conn);
        entry.user = Some((user_id, display_name));
        true
    }

    /// Records which room the connection is in.
    pub fn set_room(&mut self, conn: ConnectionId, room: RoomId) {
        if let Some(entry) = self.entries.get_mut(&conn) {
            entry.room = Some(room);
        }
    }

    pub fn resolve(&self, conn: ConnectionId) -> Option<&ConnEntry> {
        self.entries.get(&conn)
    }

    /// Finds the connection a user is currently on, if any. With two live
    /// connections (reconnect race) the most recently bound wins.
    pub fn find_user(&self, user: &UserId) -> Option<ConnectionId> {
        self.by_user.get(user).copied()
    }

    /// Removes a connection, returning what was known about it. If the
    /// user's index pointed here and they still have an older connection
    /// open, the index falls back to it.
    pub fn unregister(&mut self, conn: ConnectionId) -> Option<ConnEntry> {
        let entry = self.entries.remove(&conn)?;
        tracing::debug!(%conn, "connection unregistered");

        if let Some((user, _)) = entry.user.as_ref() {
            if self.by_user.get(user) == Some(&conn) {
                self.by_user.remove(user);
                let survivor = self.entries.iter().find_map(|(c, e)| {
                    e.user
                        .as_ref()
                        .filter(|(u, _)| u == user)
                        .map(|_| *c)
                });
                if let Some(other) = survivor {
                    self.by_user.insert(user.clone(), other);
                }
            }
        }
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    #[test]
    fn test_register_starts_anonymous() {
        let mut reg = ConnectionRegistry::new();
        reg.register(conn(1));

        let entry = reg.resolve(conn(1)).unwrap();
        assert!(entry.user.is_none());
        assert!(entry.room.is_none());
    }

    #[test]
    fn test_bind_is_set_once() {
        let mut reg = ConnectionRegistry::new();
        reg.register(conn(1));

        assert!(reg.bind(conn(1), UserId::from("alice"), "Alice".into()));
        assert!(!reg.bind(conn(1), UserId::from("bob"), "Bob".into()));

        let (user, name) =
            reg.resolve(conn(1)).unwrap().user.clone().unwrap();
        assert_eq!(user, UserId::from("alice"));
        assert_eq!(name, "Alice");
    }

    #[test]
    fn test_bind_unknown_connection_fails() {
        let mut reg = ConnectionRegistry::new();
        assert!(!reg.bind(conn(9), UserId::from("alice"), "Alice".into()));
    }

    #[test]
    fn test_find_user_resolves_bound_connections() {
        let mut reg = ConnectionRegistry::new();
        reg.register(conn(1));
        reg.register(conn(2));
        reg.bind(conn(2), UserId::from("bob"), "Bob".into());

        assert_eq!(reg.find_user(&UserId::from("bob")), Some(conn(2)));
        assert_eq!(reg.find_user(&UserId::from("alice")), None);
    }

    #[test]
    fn test_find_user_prefers_the_newest_connection() {
        let mut reg = ConnectionRegistry::new();
        reg.register(conn(1));
        reg.bind(conn(1), UserId::from("alice"), "Alice".into());

        // Alice reconnects before the old socket is torn down.
        reg.register(conn(2));
        reg.bind(conn(2), UserId::from("alice"), "Alice".into());
        assert_eq!(reg.find_user(&UserId::from("alice")), Some(conn(2)));

        // Closing the stale socket does not orphan her.
        reg.unregister(conn(1));
        assert_eq!(reg.find_user(&UserId::from("alice")), Some(conn(2)));

        reg.unregister(conn(2));
        assert_eq!(reg.find_user(&UserId::from("alice")), None);
    }

    #[test]
    fn test_find_user_falls_back_to_a_surviving_connection() {
        let mut reg = ConnectionRegistry::new();
        reg.register(conn(1));
        reg.bind(conn(1), UserId::from("alice"), "Alice".into());
        reg.register(conn(2));
        reg.bind(conn(2), UserId::from("alice"), "Alice".into());

        // The newest socket closing first hands the index back to the one
        // still open.
        reg.unregister(conn(2));
        assert_eq!(reg.find_user(&UserId::from("alice")), Some(conn(1)));
    }

    #[test]
    fn test_unregister_returns_the_entry() {
        let mut reg = ConnectionRegistry::new();
        reg.register(conn(1));
        reg.bind(conn(1), UserId::from("alice"), "Alice".into());
        reg.set_room(conn(1), RoomId::from("lobby"));

        let entry = reg.unregister(conn(1)).unwrap();
        assert_eq!(entry.room, Some(RoomId::from("lobby")));
        assert!(reg.is_empty());
        assert!(reg.unregister(conn(1)).is_none());
    }
}
