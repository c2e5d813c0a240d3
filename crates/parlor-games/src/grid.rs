//! The grid engine: a 3×3 marker-placement game.
//!
//! Marker `A` belongs to the first joiner and always moves first. A
//! placement wins by completing any of the eight lines; a full board with
//! no line is a draw.

use parlor_protocol::{GameAction, GameResult, GridState, Marker, UserId};

use crate::engine::{ActionError, Outcome, action_name};

/// The eight win lines: three rows, three columns, two diagonals.
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Creates the initial state. `markers[0]` (the first joiner) plays `A`.
pub fn start(markers: [UserId; 2]) -> GridState {
    GridState {
        board: [None; 9],
        markers,
        turn: Marker::A,
        result: None,
    }
}

/// Applies one player action. On rejection the state is unchanged.
pub fn apply(
    state: &mut GridState,
    actor: &UserId,
    action: &GameAction,
) -> Result<Outcome, ActionError> {
    match action {
        GameAction::Place { cell } => place(state, actor, *cell),
        GameAction::Restart => {
            if state.result.is_some() {
                return Err(ActionError::GameOver);
            }
            // Board and turn reset; marker assignment survives.
            state.board = [None; 9];
            state.turn = Marker::A;
            Ok(Outcome::Continue)
        }
        other => Err(ActionError::Unsupported(action_name(other))),
    }
}

fn place(
    state: &mut GridState,
    actor: &UserId,
    cell: usize,
) -> Result<Outcome, ActionError> {
    if state.result.is_some() {
        return Err(ActionError::GameOver);
    }
    let marker = marker_of(state, actor).ok_or(ActionError::OutOfTurn)?;
    if marker != state.turn {
        return Err(ActionError::OutOfTurn);
    }
    if cell >= 9 {
        return Err(ActionError::CellOutOfRange(cell));
    }
    if state.board[cell].is_some() {
        return Err(ActionError::CellOccupied(cell));
    }

    state.board[cell] = Some(marker);

    if wins(&state.board, marker) {
        let result = GameResult::Winner { marker };
        state.result = Some(result);
        return Ok(Outcome::Finished(result));
    }
    if state.board.iter().all(Option::is_some) {
        state.result = Some(GameResult::Draw);
        return Ok(Outcome::Finished(GameResult::Draw));
    }

    state.turn = state.turn.other();
    Ok(Outcome::Continue)
}

fn marker_of(state: &GridState, actor: &UserId) -> Option<Marker> {
    if &state.markers[0] == actor {
        Some(Marker::A)
    } else if &state.markers[1] == actor {
        Some(Marker::B)
    } else {
        None
    }
}

fn wins(board: &[Option<Marker>; 9], marker: Marker) -> bool {
    WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&i| board[i] == Some(marker)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserId {
        UserId::from("alice")
    }

    fn bob() -> UserId {
        UserId::from("bob")
    }

    fn fresh() -> GridState {
        start([alice(), bob()])
    }

    fn place_at(state: &mut GridState, who: &UserId, cell: usize) -> Outcome {
        apply(state, who, &GameAction::Place { cell }).expect("valid move")
    }

    #[test]
    fn test_first_joiner_is_marker_a_and_moves_first() {
        let state = fresh();
        assert_eq!(state.turn, Marker::A);
        assert_eq!(state.markers[0], alice());
    }

    #[test]
    fn test_out_of_turn_is_rejected_and_board_unchanged() {
        let mut state = fresh();
        let before = state.clone();

        let err = apply(&mut state, &bob(), &GameAction::Place { cell: 0 })
            .unwrap_err();
        assert_eq!(err, ActionError::OutOfTurn);
        assert_eq!(state, before);
    }

    #[test]
    fn test_occupied_cell_is_rejected() {
        let mut state = fresh();
        place_at(&mut state, &alice(), 4);

        let err = apply(&mut state, &bob(), &GameAction::Place { cell: 4 })
            .unwrap_err();
        assert_eq!(err, ActionError::CellOccupied(4));
        assert_eq!(state.board[4], Some(Marker::A));
    }

    #[test]
    fn test_out_of_range_cell_is_rejected() {
        let mut state = fresh();
        let err = apply(&mut state, &alice(), &GameAction::Place { cell: 9 })
            .unwrap_err();
        assert_eq!(err, ActionError::CellOutOfRange(9));
    }

    #[test]
    fn test_non_participant_is_rejected() {
        let mut state = fresh();
        let err = apply(
            &mut state,
            &UserId::from("mallory"),
            &GameAction::Place { cell: 0 },
        )
        .unwrap_err();
        assert_eq!(err, ActionError::OutOfTurn);
    }

    #[test]
    fn test_turn_flips_after_placement() {
        let mut state = fresh();
        assert_eq!(place_at(&mut state, &alice(), 0), Outcome::Continue);
        assert_eq!(state.turn, Marker::B);
        assert_eq!(place_at(&mut state, &bob(), 4), Outcome::Continue);
        assert_eq!(state.turn, Marker::A);
    }

    #[test]
    fn test_every_win_line_finishes_with_that_marker() {
        for line in WIN_LINES {
            let mut state = fresh();
            // Hand-fill the line for A and let the engine detect the last
            // placement.
            state.board[line[0]] = Some(Marker::A);
            state.board[line[1]] = Some(Marker::A);

            let outcome = place_at(&mut state, &alice(), line[2]);
            assert_eq!(
                outcome,
                Outcome::Finished(GameResult::Winner { marker: Marker::A }),
                "line {line:?}"
            );
            assert_eq!(
                state.result,
                Some(GameResult::Winner { marker: Marker::A })
            );
        }
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut state = fresh();
        // A B A / A B B / B A — last cell (8) drawn by A.
        //   A | B | A
        //   A | B | B
        //   B | A | A
        for (who, cell) in [
            (alice(), 0),
            (bob(), 1),
            (alice(), 2),
            (bob(), 4),
            (alice(), 3),
            (bob(), 5),
            (alice(), 7),
            (bob(), 6),
        ] {
            assert_eq!(place_at(&mut state, &who, cell), Outcome::Continue);
        }

        let outcome = place_at(&mut state, &alice(), 8);
        assert_eq!(outcome, Outcome::Finished(GameResult::Draw));
    }

    #[test]
    fn test_after_finish_placements_are_rejected() {
        let mut state = fresh();
        state.board = [
            Some(Marker::A),
            Some(Marker::A),
            None,
            Some(Marker::B),
            Some(Marker::B),
            None,
            None,
            None,
            None,
        ];
        place_at(&mut state, &alice(), 2); // A wins the top row

        let err = apply(&mut state, &bob(), &GameAction::Place { cell: 5 })
            .unwrap_err();
        assert_eq!(err, ActionError::GameOver);
    }

    #[test]
    fn test_restart_clears_board_but_keeps_markers() {
        let mut state = fresh();
        place_at(&mut state, &alice(), 0);
        place_at(&mut state, &bob(), 4);

        let outcome =
            apply(&mut state, &alice(), &GameAction::Restart).unwrap();
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(state.board, [None; 9]);
        assert_eq!(state.turn, Marker::A);
        assert_eq!(state.markers, [alice(), bob()]);
    }

    #[test]
    fn test_restart_after_finish_is_rejected() {
        let mut state = fresh();
        state.board = [
            Some(Marker::A),
            Some(Marker::A),
            None,
            Some(Marker::B),
            Some(Marker::B),
            None,
            None,
            None,
            None,
        ];
        place_at(&mut state, &alice(), 2); // A wins the top row

        let err =
            apply(&mut state, &alice(), &GameAction::Restart).unwrap_err();
        assert_eq!(err, ActionError::GameOver);
        assert_eq!(
            state.result,
            Some(GameResult::Winner { marker: Marker::A })
        );
    }

    #[test]
    fn test_unrelated_action_is_unsupported() {
        let mut state = fresh();
        let err = apply(
            &mut state,
            &alice(),
            &GameAction::GuessLetter { letter: 'A' },
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::Unsupported(_)));
    }
}
