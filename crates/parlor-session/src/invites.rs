//! The invite broker: outstanding game invites between room members.
//!
//! Invites have no time-based expiry; they die by being responded to, being
//! superseded by a newer invite for the same pairing, or the disconnect
//! cascade.

use std::collections::HashMap;

use parlor_protocol::{
    GameKind, Invite, InviteId, RoomId, RosterEntry, UserId,
};

use crate::error::InviteError;
use crate::mint::{CounterMint, IdMint};

/// Tracks every outstanding invite, keyed by id.
pub struct InviteBroker<M = CounterMint> {
    invites: HashMap<InviteId, Invite>,
    mint: M,
}

impl<M: IdMint> InviteBroker<M> {
    pub fn new(mint: M) -> Self {
        Self {
            invites: HashMap::new(),
            mint,
        }
    }

    /// Records a new invite from `sender` to `recipient`.
    ///
    /// Both parties must appear in `roster` (the sender could have raced a
    /// disconnect, the recipient could have left). A prior outstanding
    /// invite for the same (sender, recipient, game) triple is replaced and
    /// its id stops resolving.
    ///
    /// # Errors
    /// Returns [`InviteError::InvalidRecipient`] if either party is absent
    /// from the roster or the sender invited themselves.
    pub fn send(
        &mut self,
        room_id: RoomId,
        sender: UserId,
        recipient: UserId,
        game: GameKind,
        roster: &[RosterEntry],
    ) -> Result<Invite, InviteError> {
        if sender == recipient {
            return Err(InviteError::InvalidRecipient(recipient));
        }
        if !roster.iter().any(|m| m.user_id == recipient) {
            return Err(InviteError::InvalidRecipient(recipient));
        }
        if !roster.iter().any(|m| m.user_id == sender) {
            return Err(InviteError::InvalidRecipient(sender));
        }

        self.invites.retain(|_, invite| {
            !(invite.sender == sender
                && invite.recipient == recipient
                && invite.game == game)
        });

        let id = InviteId(self.mint.mint(game));
        let invite = Invite {
            id: id.clone(),
            game,
            sender,
            recipient,
            room_id,
        };
        self.invites.insert(id, invite.clone());

        tracing::info!(
            invite_id = %invite.id,
            sender = %invite.sender,
            recipient = %invite.recipient,
            %game,
            "invite sent"
        );
        Ok(invite)
    }

    /// Resolves an invite, removing it whether accepted or declined. Only
    /// the recipient may respond; to anyone else the id does not resolve,
    /// and the invite stays outstanding.
    ///
    /// # Errors
    /// Returns [`InviteError::UnknownInvite`] if the id does not resolve.
    pub fn respond(
        &mut self,
        id: &InviteId,
        responder: &UserId,
    ) -> Result<Invite, InviteError> {
        if !self
            .invites
            .get(id)
            .is_some_and(|i| &i.recipient == responder)
        {
            return Err(InviteError::UnknownInvite(id.clone()));
        }
        let invite = self.invites.remove(id).expect("presence checked");

        tracing::info!(invite_id = %invite.id, "invite resolved");
        Ok(invite)
    }

    /// Drops every invite where `user` is sender or recipient. Returns the
    /// dropped invites so the remaining party can be notified.
    pub fn cancel_for(&mut self, user: &UserId) -> Vec<Invite> {
        let (dropped, kept): (Vec<_>, Vec<_>) = self
            .invites
            .drain()
            .partition(|(_, i)| &i.sender == user || &i.recipient == user);

        self.invites.extend(kept);

        dropped
            .into_iter()
            .map(|(_, invite)| {
                tracing::info!(
                    invite_id = %invite.id,
                    %user,
                    "invite cancelled"
                );
                invite
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.invites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invites.is_empty()
    }
}

impl Default for InviteBroker<CounterMint> {
    fn default() -> Self {
        Self::new(CounterMint::new())
    }
}
