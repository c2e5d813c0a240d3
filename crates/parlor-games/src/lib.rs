//! Pure game engines for parlor sessions.
//!
//! Each engine is a module of free functions over the state types defined in
//! `parlor-protocol`: a `start` constructor plus an `apply` transition that
//! either advances the state or rejects the action leaving it untouched. No
//! engine performs I/O or holds randomness; the session layer supplies drawn
//! words and decides what to do with a finished game.
//!
//! ```
//! use parlor_games::{grid, Outcome};
//! use parlor_protocol::{GameAction, UserId};
//!
//! let mut state = grid::start([UserId::from("alice"), UserId::from("bob")]);
//! let outcome = grid::apply(
//!     &mut state,
//!     &UserId::from("alice"),
//!     &GameAction::Place { cell: 4 },
//! )
//! .unwrap();
//! assert_eq!(outcome, Outcome::Continue);
//! ```

mod engine;
pub mod grid;
pub mod letters;
pub mod story;
mod words;

pub use engine::{ActionError, Outcome};
pub use words::{GameConfig, WordEntry, builtin_words};
