use rand::Rng;

use super::{
    COLS, ROWS,
    piece::{Piece, PieceKind},
};

/// A single cell of the board.
///
/// Garbage cells come from opponent attacks; they clear like any other cell,
/// the variant only selects the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked piece cell of a specific type.
    Piece(PieceKind),
    /// Garbage cell injected by an attack.
    Garbage,
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Color id used by the rendering surface: 0 empty, 1-7 piece kinds,
    /// 8 garbage.
    #[must_use]
    pub const fn color_id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.color_id(),
            Cell::Garbage => 8,
        }
    }
}

/// One row of board cells.
pub type Row = [Cell; COLS];

/// Cell-by-cell board of one player's stack.
///
/// Fixed 20x10 grid; only [`Board::fill_piece`], [`Board::clear_full_lines`]
/// and [`Board::shift_in_garbage`] mutate it, and none of them resize it.
///
/// # Example
///
/// ```
/// use rivalis_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::new();
/// let piece = Piece::new(PieceKind::O).landing_position(&board);
/// assert!(!board.collides(piece));
/// board.fill_piece(piece);
/// assert_eq!(board.clear_full_lines(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    const EMPTY_ROW: Row = [Cell::Empty; COLS];

    /// Creates an all-empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [Self::EMPTY_ROW; ROWS],
        }
    }

    /// Returns an iterator over the rows, topmost first.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Sets a single cell. Intended for hosts restoring a board and for
    /// tests building fixtures.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    /// Checks whether the piece overlaps an occupied cell or leaves the
    /// board on any axis.
    ///
    /// Out-of-range coordinates are rejected by explicit bounds checks on
    /// both axes. Pure: the board is never mutated and repeated calls with
    /// the same piece return the same answer.
    #[must_use]
    pub fn collides(&self, piece: Piece) -> bool {
        piece.occupied_positions().any(|(x, y)| {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                return true;
            };
            if x >= COLS || y >= ROWS {
                return true;
            }
            !self.rows[y][x].is_empty()
        })
    }

    /// Writes the piece's occupied cells into the board.
    ///
    /// Callers lock only non-colliding pieces, so every cell lands in
    /// bounds; anything outside is ignored rather than wrapped.
    pub fn fill_piece(&mut self, piece: Piece) {
        for (x, y) in piece.occupied_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < COLS
                && y < ROWS
            {
                self.rows[y][x] = Cell::Piece(piece.kind());
            }
        }
    }

    /// Clears filled rows and returns how many were removed.
    ///
    /// Scans bottom to top in a single pass: remaining rows shift down
    /// preserving their relative order and the cleared count of empty rows
    /// appears at the top. Row and column counts never change.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..ROWS).rev() {
            if Self::row_is_filled(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(Self::EMPTY_ROW);
        count
    }

    /// Builds one attack row: all garbage with a single random gap, so the
    /// row is never immediately clearable.
    pub fn garbage_row<R: Rng + ?Sized>(rng: &mut R) -> Row {
        let mut row = [Cell::Garbage; COLS];
        row[rng.random_range(0..COLS)] = Cell::Empty;
        row
    }

    /// Applies an attack of `lines` rows: removes that many rows from the
    /// top and appends single-gap garbage rows at the bottom.
    pub fn shift_in_garbage<R: Rng + ?Sized>(&mut self, rng: &mut R, lines: usize) {
        for _ in 0..lines {
            self.rows.copy_within(1.., 0);
            self.rows[ROWS - 1] = Self::garbage_row(rng);
        }
    }

    fn row_is_filled(row: &Row) -> bool {
        row.iter().all(|cell| !cell.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use crate::core::piece::{PiecePosition, PieceRotation};

    use super::*;

    fn fill_row_except(board: &mut Board, y: usize, gap: usize) {
        for x in 0..COLS {
            if x != gap {
                board.set_cell(x, y, Cell::Piece(PieceKind::J));
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in board.rows() {
            assert!(row.iter().all(|cell| cell.is_empty()));
        }
    }

    #[test]
    fn test_collide_rejects_out_of_bounds_on_both_axes() {
        let board = Board::new();
        let at = |x, y| {
            Piece::with_state(PieceKind::O, PieceRotation::default(), PiecePosition::new(x, y))
        };

        // O occupies a 2x2 block at the anchor.
        assert!(!board.collides(at(0, 0)));
        assert!(!board.collides(at(8, 18)));
        assert!(board.collides(at(-1, 0)));
        assert!(board.collides(at(9, 0)));
        assert!(board.collides(at(0, 19)));
        assert!(board.collides(at(0, -1)));
    }

    #[test]
    fn test_collide_is_idempotent_and_does_not_mutate() {
        let mut board = Board::new();
        fill_row_except(&mut board, 10, 4);
        let snapshot = board.clone();
        let piece = Piece::with_state(
            PieceKind::T,
            PieceRotation::default(),
            PiecePosition::new(3, 9),
        );

        let first = board.collides(piece);
        let second = board.collides(piece);
        assert_eq!(first, second);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_fill_piece_writes_kind_cells() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::S).landing_position(&board);
        board.fill_piece(piece);

        let filled = board
            .rows()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count();
        assert_eq!(filled, 4);
        assert!(
            board
                .rows()
                .flatten()
                .filter(|cell| !cell.is_empty())
                .all(|cell| *cell == Cell::Piece(PieceKind::S))
        );
    }

    #[test]
    fn test_clear_full_lines_preserves_dimensions() {
        let mut board = Board::new();
        for y in [17, 18, 19] {
            for x in 0..COLS {
                board.set_cell(x, y, Cell::Garbage);
            }
        }
        let cleared = board.clear_full_lines();
        assert_eq!(cleared, 3);
        assert_eq!(board.rows().count(), ROWS);
        assert!(board.rows().all(|row| row.len() == COLS));
    }

    #[test]
    fn test_clear_keeps_relative_order_of_surviving_rows() {
        let mut board = Board::new();
        // Row 17 partial, row 18 full, row 19 partial.
        board.set_cell(0, 17, Cell::Piece(PieceKind::L));
        for x in 0..COLS {
            board.set_cell(x, 18, Cell::Piece(PieceKind::I));
        }
        board.set_cell(9, 19, Cell::Piece(PieceKind::Z));

        assert_eq!(board.clear_full_lines(), 1);
        // The partial rows shift down by one, keeping their order.
        assert_eq!(board.cell(0, 18), Cell::Piece(PieceKind::L));
        assert_eq!(board.cell(9, 19), Cell::Piece(PieceKind::Z));
        assert!(board.row(0).iter().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_i_piece_completes_gap_row() {
        // Bottom row full except column 4; a vertical I dropped into that
        // column completes exactly that row.
        let mut board = Board::new();
        fill_row_except(&mut board, 19, 4);
        board.set_cell(0, 18, Cell::Piece(PieceKind::T));

        // Vertical I anchored so its column of cells is board column 4.
        let piece = Piece::with_state(
            PieceKind::I,
            PieceRotation::default(),
            PiecePosition::new(3, 0),
        )
        .landing_position(&board);
        board.fill_piece(piece);

        assert_eq!(board.clear_full_lines(), 1);
        assert!(board.row(0).iter().all(|cell| cell.is_empty()));
        // The survivor from row 18 shifted down to row 19.
        assert_eq!(board.cell(0, 19), Cell::Piece(PieceKind::T));
        // The I cell that was above the cleared row also shifted down.
        assert_eq!(board.cell(4, 19), Cell::Piece(PieceKind::I));
    }

    #[test]
    fn test_garbage_row_has_exactly_one_gap_with_varying_column() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen_gaps = std::collections::HashSet::new();
        for _ in 0..1000 {
            let row = Board::garbage_row(&mut rng);
            let gaps: Vec<_> = (0..COLS).filter(|&x| row[x].is_empty()).collect();
            assert_eq!(gaps.len(), 1);
            assert_eq!(
                row.iter().filter(|cell| **cell == Cell::Garbage).count(),
                COLS - 1
            );
            seen_gaps.insert(gaps[0]);
        }
        assert!(seen_gaps.len() > 1, "gap column must vary across calls");
    }

    #[test]
    fn test_shift_in_garbage_replaces_top_with_bottom_garbage() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut board = Board::new();
        board.set_cell(0, 0, Cell::Piece(PieceKind::I));
        board.set_cell(3, 5, Cell::Piece(PieceKind::O));

        board.shift_in_garbage(&mut rng, 2);

        // The top-row marker fell off; the mid-board marker moved up 2 rows.
        assert_eq!(board.cell(3, 3), Cell::Piece(PieceKind::O));
        assert_eq!(board.cell(0, 0), Cell::Empty);
        for y in [ROWS - 2, ROWS - 1] {
            let gaps = board.row(y).iter().filter(|cell| cell.is_empty()).count();
            assert_eq!(gaps, 1, "garbage row {y} must have a single gap");
            assert!(
                board
                    .row(y)
                    .iter()
                    .all(|cell| cell.is_empty() || *cell == Cell::Garbage)
            );
        }
    }

    #[test]
    fn test_color_ids_match_wire_values() {
        assert_eq!(Cell::Empty.color_id(), 0);
        assert_eq!(Cell::Piece(PieceKind::I).color_id(), 1);
        assert_eq!(Cell::Piece(PieceKind::T).color_id(), 7);
        assert_eq!(Cell::Garbage.color_id(), 8);
    }
}
