//! The presence directory: who is currently in which room.
//!
//! Owned exclusively by the coordinator task and accessed from nowhere
//! else, so a plain `HashMap` with no locking is correct here. Rooms are
//! created lazily on first join and dropped when their last member leaves;
//! room identifiers themselves come from the external matchmaking service
//! and are never validated.

use std::collections::HashMap;

use parlor_protocol::{RoomId, RosterEntry, UserId};
use parlor_transport::ConnectionId;

/// Per-room membership tables, keyed by room id.
///
/// A roster is kept as a `Vec` in first-join order — duplicate user ids are
/// collapsed on join, and matchmaking pairs two members per room, so linear
/// scans are the right tool.
pub struct PresenceDirectory {
    rooms: HashMap<RoomId, Vec<RosterEntry>>,
}

impl PresenceDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Adds a user to a room, or refreshes their entry if already present.
    ///
    /// A user who re-announces themselves (e.g. after opening a new
    /// connection) keeps their roster position; only the connection id and
    /// display name are updated. A user who joins after leaving is appended
    /// at the end — no slot identity is preserved. Returns the full roster
    /// after the change.
    pub fn join(
        &mut self,
        room_id: &RoomId,
        user_id: UserId,
        display_name: String,
        connection_id: ConnectionId,
    ) -> &[RosterEntry] {
        let roster = self.rooms.entry(room_id.clone()).or_default();

        if let Some(entry) =
            roster.iter_mut().find(|m| m.user_id == user_id)
        {
            entry.display_name = display_name;
            entry.connection_id = connection_id;
        } else {
            roster.push(RosterEntry {
                user_id: user_id.clone(),
                display_name,
                connection_id,
            });
            tracing::info!(
                %room_id,
                %user_id,
                members = roster.len(),
                "user joined room"
            );
        }

        roster
    }

    /// Removes a user from a room. Returns the removed entry, or `None` if
    /// the user was not a member. Empty rooms are dropped from the table.
    pub fn leave(
        &mut self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Option<RosterEntry> {
        let roster = self.rooms.get_mut(room_id)?;
        let idx = roster.iter().position(|m| &m.user_id == user_id)?;
        let entry = roster.remove(idx);

        tracing::info!(
            %room_id,
            %user_id,
            members = roster.len(),
            "user left room"
        );

        if roster.is_empty() {
            self.rooms.remove(room_id);
        }
        Some(entry)
    }

    /// Returns the current roster of a room, in first-join order.
    pub fn roster(&self, room_id: &RoomId) -> &[RosterEntry] {
        self.rooms.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Looks up one member of a room.
    pub fn member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Option<&RosterEntry> {
        self.roster(room_id).iter().find(|m| &m.user_id == user_id)
    }

    /// Returns `true` if the user is currently a member of the room.
    pub fn is_member(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        self.member(room_id, user_id).is_some()
    }

    /// Resolves the connection ids of every current member, for fan-out.
    pub fn connections(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.roster(room_id)
            .iter()
            .map(|m| m.connection_id)
            .collect()
    }

    /// Returns the number of rooms with at least one member.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for PresenceDirectory {
    fn default() -> Self {
        Self::new()
    }
}
