//! Property and scenario tests for the rule engine.

use noughts_engine::rules::{self, LINES};
use noughts_engine::{
    Board, GameId, GameState, GameStatus, Mark, Move, Outcome, PlayerId, RuleViolation, Square,
};

fn started() -> GameState {
    let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
    rules::join(game, PlayerId::new("p2")).expect("join failed")
}

fn play_all(game: GameState, moves: &[(i32, i32)]) -> GameState {
    moves.iter().fold(game, |game, &(row, col)| {
        let mark = game.next_mark();
        rules::play(game, &Move::new(row, col, mark)).expect("move rejected")
    })
}

/// Decodes base-3 digits into a board: 0 empty, 1 nought, 2 cross.
fn board_from_code(mut code: u32) -> Board {
    let mut squares = [Square::Empty; 9];
    for square in &mut squares {
        *square = match code % 3 {
            0 => Square::Empty,
            1 => Square::Occupied(Mark::Nought),
            _ => Square::Occupied(Mark::Cross),
        };
        code /= 3;
    }
    Board::from_squares(squares)
}

#[test]
fn test_outcome_matches_line_definition_for_every_board() {
    for code in 0..3u32.pow(9) {
        let board = board_from_code(code);
        let squares = board.squares();
        let completed: Vec<Mark> = LINES
            .iter()
            .filter_map(|&[a, b, c]| match squares[a] {
                Square::Occupied(m) if squares[b] == squares[a] && squares[c] == squares[a] => {
                    Some(m)
                }
                _ => None,
            })
            .collect();
        let full = squares.iter().all(|s| *s != Square::Empty);

        match rules::board_outcome(&board) {
            Outcome::Won(mark) => assert!(completed.contains(&mark), "board {code}"),
            Outcome::Drawn => assert!(completed.is_empty() && full, "board {code}"),
            Outcome::Unchanged => assert!(completed.is_empty() && !full, "board {code}"),
        }
    }
}

#[test]
fn test_detect_outcome_is_idempotent() {
    let game = play_all(started(), &[(0, 0), (1, 1), (0, 1)]);
    let first = rules::detect_outcome(&game);
    for _ in 0..10 {
        assert_eq!(rules::detect_outcome(&game), first);
    }
    assert_eq!(first, Outcome::Unchanged);
}

#[test]
fn test_turn_alternation() {
    let cells = [
        (1, 1),
        (0, 0),
        (2, 2),
        (0, 2),
        (0, 1),
        (2, 1),
        (1, 0),
        (1, 2),
    ];
    let mut game = started();
    for (n, &(row, col)) in cells.iter().enumerate() {
        let expected = if n % 2 == 0 {
            Mark::Nought
        } else {
            Mark::Cross
        };
        assert_eq!(game.next_mark(), expected);
        // The other mark is always refused.
        assert!(matches!(
            rules::validate_move(&game, &Move::new(row, col, expected.opponent())),
            Err(RuleViolation::WrongTurn { .. })
        ));
        game = rules::play(game, &Move::new(row, col, expected)).expect("move rejected");
        if game.status().is_terminal() {
            break;
        }
    }
}

#[test]
fn test_top_row_win_scenario() {
    let game = play_all(started(), &[(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)]);
    assert_eq!(game.status(), &GameStatus::Won(Mark::Nought));
    assert_eq!(game.winner().map(|p| p.id().as_str()), Some("p1"));
    assert_eq!(game.move_count(), 5);
}

#[test]
fn test_full_board_draw_scenario() {
    let game = play_all(
        started(),
        &[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ],
    );
    assert_eq!(game.status(), &GameStatus::Drawn);
    assert!(game.winner().is_none());
    assert_eq!(game.move_count(), 9);
}

#[test]
fn test_last_cell_completing_line_is_a_win_not_draw() {
    // O X O / X O X / X O _ ; noughts finish the main diagonal on the ninth move.
    let game = play_all(
        started(),
        &[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 1),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ],
    );
    assert_eq!(game.status(), &GameStatus::Won(Mark::Nought));
}

#[test]
fn test_double_line_is_single_win() {
    // Noughts complete row 0 and column 0 with the same move at (0, 0).
    let game = play_all(
        started(),
        &[
            (0, 1),
            (1, 1),
            (0, 2),
            (2, 2),
            (1, 0),
            (1, 2),
            (2, 0),
            (2, 1),
        ],
    );
    assert_eq!(game.status(), &GameStatus::InProgress);
    let game = rules::play(game, &Move::new(0, 0, Mark::Nought)).expect("move rejected");
    assert_eq!(game.status(), &GameStatus::Won(Mark::Nought));
    assert_eq!(rules::detect_outcome(&game), Outcome::Won(Mark::Nought));
}

#[test]
fn test_out_of_bounds_is_rejected_before_mutation() {
    let game = play_all(started(), &[(0, 0)]);
    let snapshot = game.clone();
    let result = rules::validate_move(&game, &Move::new(3, 0, Mark::Cross));
    assert_eq!(result, Err(RuleViolation::OutOfBounds { row: 3, col: 0 }));
    assert_eq!(game, snapshot);
    assert_eq!(
        rules::play(game, &Move::new(3, 0, Mark::Cross)),
        Err(RuleViolation::OutOfBounds { row: 3, col: 0 })
    );
}
