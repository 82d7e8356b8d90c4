use rivalis_engine::{Board, COLS, ROWS};

/// Board features feeding the heuristic score, computed in one pass.
///
/// - `column_heights[x]` - `ROWS` minus the row index of the topmost
///   occupied cell of column `x`, 0 for an empty column
/// - `aggregate_height` - sum of the column heights
/// - `holes` - empty cells with at least one occupied cell above them in
///   the same column
/// - `bumpiness` - sum over adjacent column pairs of the absolute height
///   difference (surface roughness)
/// - `full_lines` - rows currently full, i.e. rows the next
///   `clear_full_lines` would remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardMetrics {
    column_heights: [u8; COLS],
    aggregate_height: u32,
    holes: u32,
    bumpiness: u32,
    full_lines: u32,
}

impl BoardMetrics {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let mut column_heights = [0_u8; COLS];
        let mut holes = 0;
        for (x, height) in column_heights.iter_mut().enumerate() {
            let mut found_top = false;
            for y in 0..ROWS {
                if !board.cell(x, y).is_empty() {
                    if !found_top {
                        *height = u8::try_from(ROWS - y).unwrap();
                        found_top = true;
                    }
                } else if found_top {
                    holes += 1;
                }
            }
        }

        let aggregate_height = column_heights.iter().map(|&h| u32::from(h)).sum();
        let bumpiness = column_heights
            .windows(2)
            .map(|pair| u32::from(pair[0].abs_diff(pair[1])))
            .sum();
        let full_lines = board
            .rows()
            .filter(|row| row.iter().all(|cell| !cell.is_empty()))
            .count();

        Self {
            column_heights,
            aggregate_height,
            holes,
            bumpiness,
            full_lines: u32::try_from(full_lines).unwrap(),
        }
    }

    #[must_use]
    pub fn column_heights(&self) -> &[u8; COLS] {
        &self.column_heights
    }

    #[must_use]
    pub fn aggregate_height(&self) -> u32 {
        self.aggregate_height
    }

    #[must_use]
    pub fn holes(&self) -> u32 {
        self.holes
    }

    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        self.bumpiness
    }

    #[must_use]
    pub fn full_lines(&self) -> u32 {
        self.full_lines
    }
}
