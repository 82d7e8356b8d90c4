use rivalis_engine::{Board, COLS, Piece, PieceKind, PiecePosition, PieceRotation};

use crate::{metrics::BoardMetrics, profile::Weights};

/// Leftmost column probed by the search. Negative anchors let shapes whose
/// bounding box has empty left columns hug the left wall.
const MIN_COLUMN: i16 = -2;

/// One past the rightmost probed column.
#[expect(clippy::cast_possible_truncation)]
const MAX_COLUMN: i16 = COLS as i16;

/// A planned placement for one spawned piece: where to steer it and where
/// it will land. Computed once per spawn and discarded on lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Target anchor column.
    pub column: i16,
    /// Clockwise quarter turns to apply before moving.
    pub rotations: u8,
    /// Anchor row of the landing position, for the early hard-drop rule.
    pub landing_row: i16,
}

/// Searches every rotation and column, simulates each drop on a cloned
/// board, and returns the placement whose resulting board scores highest
/// under `weights`.
///
/// Iteration order is fixed (rotation 0-3, then column low to high) and
/// ties keep the first-found candidate, so identical inputs always produce
/// the identical decision.
///
/// Returns `None` under total lock-out: no rotation and column admits a
/// legal landing, meaning the board is dead and the caller should surface
/// game over instead of steering toward an unchecked position.
#[must_use]
pub fn choose_best_placement(
    board: &Board,
    kind: PieceKind,
    weights: &Weights,
) -> Option<Placement> {
    let mut best: Option<(f32, Placement)> = None;

    for quarter_turns in 0..4_u8 {
        let rotation = PieceRotation::new(quarter_turns);
        for column in MIN_COLUMN..MAX_COLUMN {
            let start = Piece::with_state(kind, rotation, PiecePosition::new(column, 0));
            // No legal resting place in this column/rotation.
            if board.collides(start) {
                continue;
            }
            let landed = start.landing_position(board);

            let mut simulated = board.clone();
            simulated.fill_piece(landed);
            let score = weights.evaluate(&BoardMetrics::from_board(&simulated));

            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((
                    score,
                    Placement {
                        column,
                        rotations: quarter_turns,
                        landing_row: landed.position().y(),
                    },
                ));
            }
        }
    }

    best.map(|(_, placement)| placement)
}
