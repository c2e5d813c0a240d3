//! Room presence for Parlor.
//!
//! A room is a pairing produced by the external matchmaking service; this
//! crate tracks which users are present in each room and in what order they
//! first joined. It decides *who* should hear about a roster change —
//! actually delivering the broadcast is the transport layer's fan-out
//! concern.

mod directory;

pub use directory::PresenceDirectory;
