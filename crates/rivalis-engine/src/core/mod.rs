pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of board rows (y = 0 is the topmost row).
pub const ROWS: usize = 20;
/// Number of board columns.
pub const COLS: usize = 10;
