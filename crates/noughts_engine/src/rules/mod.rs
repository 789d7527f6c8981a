//! Game rules for noughts and crosses.
//!
//! Pure functions over [`GameState`](crate::GameState). Nothing here performs
//! I/O or keeps state between calls; callers load a game, run a rule, and
//! persist whatever comes back.

pub mod draw;
mod join;
mod moves;
pub mod win;

pub use draw::{is_draw, is_full};
pub use join::join;
pub use moves::{apply_move, board_outcome, detect_outcome, play, validate_move};
pub use win::{LINES, check_winner};

use serde::{Deserialize, Serialize};

use crate::types::Mark;

/// Result of checking a board for a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// No completed line and at least one empty cell.
    Unchanged,
    /// The given mark completed a line.
    Won(Mark),
    /// All nine cells are filled and no line is complete.
    Drawn,
}
