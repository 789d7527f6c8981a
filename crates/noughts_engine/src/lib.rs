//! Noughts & crosses rule engine.
//!
//! Pure game logic with no I/O:
//!
//! - **Types**: marks, squares, board positions and the board itself
//! - **State**: the persisted shape of a game (players, board, status, move count)
//! - **Rules**: move validation, turn parity, win/draw detection, joining
//! - **Invariants**: postconditions checked after every transition
//!
//! # Example
//!
//! ```
//! use noughts_engine::{GameId, GameState, GameStatus, Mark, Move, PlayerId, rules};
//!
//! let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
//! let game = rules::join(game, PlayerId::new("p2")).unwrap();
//! assert_eq!(game.status(), &GameStatus::InProgress);
//!
//! let game = rules::play(game, &Move::new(0, 0, Mark::Nought)).unwrap();
//! assert_eq!(game.next_mark(), Mark::Cross);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
pub mod invariants;
pub mod rules;
mod state;
mod types;

pub use action::{Move, RuleViolation};
pub use rules::Outcome;
pub use state::{GameId, GameState, GameStatus, Player, PlayerId};
pub use types::{Board, Mark, Position, Square};
