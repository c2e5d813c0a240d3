//! Id minting for invites (and, through them, sessions).
//!
//! Ids are minted by a single injected source rather than assembled at each
//! call site, so their shape is uniform and tests can substitute a
//! deterministic mint.

use parlor_protocol::GameKind;
use rand::Rng;

/// A source of fresh invite ids.
pub trait IdMint {
    /// Mints an id for an invite to the given game. Every call returns a
    /// distinct id.
    fn mint(&mut self, game: GameKind) -> String;
}

/// The production mint: `"{game}-{counter}-{nonce}"`.
///
/// The counter makes ids monotonic within one server run; the 48-bit random
/// nonce keeps them unguessable across runs.
#[derive(Debug, Default)]
pub struct CounterMint {
    counter: u64,
}

impl CounterMint {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdMint for CounterMint {
    fn mint(&mut self, game: GameKind) -> String {
        self.counter += 1;
        let nonce = rand::rng().random_range(0..(1u64 << 48));
        format!("{game}-{}-{nonce:012x}", self.counter)
    }
}

/// A deterministic mint for tests: `"{game}-{counter}"`, no nonce.
#[derive(Debug, Default)]
pub struct SequentialMint {
    counter: u64,
}

impl IdMint for SequentialMint {
    fn mint(&mut self, game: GameKind) -> String {
        self.counter += 1;
        format!("{game}-{}", self.counter)
    }
}
