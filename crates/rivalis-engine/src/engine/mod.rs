//! Game engine logic and per-player state management.
//!
//! - [`Field`] - one player's board, falling piece, bag, and score
//! - [`PieceBag`] - 7-bag piece generation system
//!
//! # Game Flow
//!
//! 1. A [`Field`] spawns with the two-row garbage floor and its first piece
//! 2. The owner (human input or the bot controller) shifts and rotates the
//!    falling piece
//! 3. Gravity or a hard drop lands the piece; it locks, lines clear, the
//!    next piece spawns
//! 4. A spawn that collides ends the game for that board
//!
//! # Example
//!
//! ```
//! use rivalis_engine::Field;
//!
//! let mut field = Field::with_seed(42);
//! field.shift_left();
//! field.rotate_piece();
//! let (cleared_lines, result) = field.hard_drop();
//!
//! if result.is_err() {
//!     println!("Game over!");
//! }
//! # let _ = cleared_lines;
//! ```

pub use self::{field::*, piece_bag::*};

mod field;
mod piece_bag;
