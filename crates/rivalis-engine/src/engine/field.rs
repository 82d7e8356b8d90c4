use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    PieceCollisionError, TopOutError,
    core::{
        board::Board,
        piece::{Piece, PieceKind},
    },
};

use super::piece_bag::PieceBag;

/// Points awarded per cleared line.
const POINTS_PER_LINE: usize = 100;

/// Garbage rows pre-filled at match start so the opening forces engagement
/// instead of a slow empty-board build-up.
const OPENING_GARBAGE_ROWS: usize = 2;

/// Seed salt separating the garbage-gap RNG stream from the bag stream.
const GARBAGE_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// One player's game state: board, falling piece, piece supply, and score.
///
/// The falling piece moves through `Spawned -> Falling -> Locking -> Merged`:
/// moves and rotations that would collide are rejected with the position
/// unchanged, and the piece locks when a one-row-down probe collides. A
/// freshly spawned piece that immediately collides reports [`TopOutError`],
/// which is terminal for this board.
#[derive(Debug, Clone)]
pub struct Field {
    board: Board,
    falling_piece: Piece,
    bag: PieceBag,
    garbage_rng: Pcg32,
    score: usize,
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    /// Creates a field with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but seeded for a reproducible piece sequence and
    /// garbage-gap placement.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut bag = PieceBag::with_seed(seed);
        let mut garbage_rng = Pcg32::seed_from_u64(seed ^ GARBAGE_SEED_SALT);
        let mut board = Board::new();
        board.shift_in_garbage(&mut garbage_rng, OPENING_GARBAGE_ROWS);
        let falling_piece = Piece::new(bag.pop_next());
        Self {
            board,
            falling_piece,
            bag,
            garbage_rng,
            score: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board, for hosts that restore a saved position
    /// or construct fixtures.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    /// The kind that will spawn after the current piece locks.
    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.bag.peek_next()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Replaces the falling piece, rejecting a colliding state.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.collides(piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    /// Moves the falling piece one column left. Returns whether it moved.
    pub fn shift_left(&mut self) -> bool {
        self.set_falling_piece(self.falling_piece.shifted(-1)).is_ok()
    }

    /// Moves the falling piece one column right. Returns whether it moved.
    pub fn shift_right(&mut self) -> bool {
        self.set_falling_piece(self.falling_piece.shifted(1)).is_ok()
    }

    /// Rotates the falling piece clockwise with wall-kick fallback.
    /// Returns whether a rotation (possibly kicked) was applied.
    pub fn rotate_piece(&mut self) -> bool {
        match self.falling_piece.wall_kicked_cw(&self.board) {
            Some(piece) => {
                self.falling_piece = piece;
                true
            }
            None => false,
        }
    }

    /// Advances the falling piece one row (gravity or soft drop).
    ///
    /// Returns `None` while the piece keeps falling. When the one-row-down
    /// probe collides the piece locks at its current position and the lock
    /// outcome is returned.
    pub fn step_down(&mut self) -> Option<(usize, Result<(), TopOutError>)> {
        let below = self.falling_piece.dropped();
        if self.board.collides(below) {
            return Some(self.lock_piece());
        }
        self.falling_piece = below;
        None
    }

    /// Drops the falling piece to its lowest legal row and locks it.
    pub fn hard_drop(&mut self) -> (usize, Result<(), TopOutError>) {
        self.falling_piece = self.falling_piece.landing_position(&self.board);
        self.lock_piece()
    }

    /// Applies an opponent attack: `lines` single-gap garbage rows shift in
    /// from the bottom.
    pub fn receive_garbage(&mut self, lines: usize) {
        self.board.shift_in_garbage(&mut self.garbage_rng, lines);
    }

    /// Merges the falling piece, clears lines, and spawns the next piece.
    ///
    /// Returns the number of cleared lines and `Err(TopOutError)` when the
    /// fresh spawn already collides (game over for this board).
    fn lock_piece(&mut self) -> (usize, Result<(), TopOutError>) {
        self.board.fill_piece(self.falling_piece);
        let cleared_lines = self.board.clear_full_lines();
        self.score += cleared_lines * POINTS_PER_LINE;

        self.falling_piece = Piece::new(self.bag.pop_next());
        if self.board.collides(self.falling_piece) {
            return (cleared_lines, Err(TopOutError));
        }
        (cleared_lines, Ok(()))
    }
}
