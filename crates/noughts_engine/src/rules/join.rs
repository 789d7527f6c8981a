//! Seating the second player.

use tracing::{info, instrument, warn};

use crate::action::RuleViolation;
use crate::invariants::TransitionContract;
use crate::state::{GameState, GameStatus, PlayerId};

/// Seats `player` as the second player (crosses) and starts the game.
///
/// This is the only transition out of `AwaitingSecondPlayer`. The joining
/// identifier is not compared to the first player's: identifiers are opaque
/// and unauthenticated.
///
/// # Errors
///
/// Returns [`RuleViolation::GameFull`] if a second player is already seated.
#[instrument(skip_all, fields(game_id = %state.id(), player = %player))]
pub fn join(state: GameState, player: PlayerId) -> Result<GameState, RuleViolation> {
    if state.second_player().is_some() {
        warn!("Join rejected, game already has two players");
        return Err(RuleViolation::GameFull);
    }

    let mut next = state.clone();
    next.seat_second_player(player);
    next.set_status(GameStatus::InProgress);

    TransitionContract::check(&state, &next)?;
    info!("Second player seated, game in progress");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameId;
    use crate::types::Mark;

    #[test]
    fn test_join_starts_game() {
        let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
        let game = join(game, PlayerId::new("p2")).unwrap();
        assert_eq!(game.status(), &GameStatus::InProgress);
        let second = game.second_player().unwrap();
        assert_eq!(second.id().as_str(), "p2");
        assert_eq!(second.mark(), &Mark::Cross);
    }

    #[test]
    fn test_second_join_is_full() {
        let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
        let game = join(game, PlayerId::new("p2")).unwrap();
        assert_eq!(
            join(game, PlayerId::new("p3")),
            Err(RuleViolation::GameFull)
        );
    }
}
