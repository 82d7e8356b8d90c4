use super::board::Board;

/// A tetromino with position, rotation, and type.
///
/// Pieces are immutable values - movement and rotation operations return new
/// `Piece` instances, so tentative moves never alias the committed state.
///
/// # Coordinate System
///
/// - Position is the top-left anchor of the piece's bounding box on the board
/// - y increases downward; y = 0 is the topmost board row
/// - Negative x is legal while probing placements near the left wall; the
///   collision check rejects any occupied cell that ends up out of bounds
///
/// # Example
///
/// ```
/// use rivalis_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.shifted(1);
/// let rotated = moved.rotated_cw();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    position: PiecePosition,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: PieceRotation::default(),
            position: PiecePosition::SPAWN,
        }
    }

    #[must_use]
    pub const fn with_state(kind: PieceKind, rotation: PieceRotation, position: PiecePosition) -> Self {
        Self {
            kind,
            rotation,
            position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// Returns the absolute board coordinates of the piece's occupied cells.
    ///
    /// Coordinates may lie outside the board; [`Board::collides`] is the
    /// authority on whether such a piece state is legal.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.kind
            .cell_offsets(self.rotation)
            .into_iter()
            .map(move |(dx, dy)| (self.position.x() + dx, self.position.y() + dy))
    }

    /// Returns the piece shifted horizontally by `dx` columns.
    #[must_use]
    pub const fn shifted(&self, dx: i16) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation,
            position: self.position.shifted(dx),
        }
    }

    /// Returns the piece moved one row downward.
    #[must_use]
    pub const fn dropped(&self) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation,
            position: self.position.dropped(),
        }
    }

    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation.rotated_cw(),
            position: self.position,
        }
    }

    #[must_use]
    pub fn rotated_ccw(&self) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation.rotated_ccw(),
            position: self.position,
        }
    }

    /// Attempts a clockwise rotation with wall-kick fallback.
    ///
    /// Tries the rotated piece in place, then kicked one column right, then
    /// one column left. Returns the first non-colliding candidate, or `None`
    /// if every kick fails (the caller leaves the piece untouched).
    #[must_use]
    pub fn wall_kicked_cw(&self, board: &Board) -> Option<Self> {
        let rotated = self.rotated_cw();
        let candidates = [rotated, rotated.shifted(1), rotated.shifted(-1)];
        candidates.into_iter().find(|piece| !board.collides(*piece))
    }

    /// Returns the piece at its lowest legal row for the current column and
    /// rotation (the hard-drop landing state).
    #[must_use]
    pub fn landing_position(&self, board: &Board) -> Self {
        let mut landed = *self;
        loop {
            let below = landed.dropped();
            if board.collides(below) {
                return landed;
            }
            landed = below;
        }
    }
}

/// Position of a piece's bounding-box anchor on the board.
///
/// Signed so that planning probes may slide a piece's box partly past the
/// left wall; legality is decided by collision checking, not by arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePosition {
    x: i16,
    y: i16,
}

impl PiecePosition {
    /// Spawn anchor for a fresh piece (column 3, top row).
    pub const SPAWN: Self = Self::new(3, 0);

    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i16 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i16 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, dx: i16) -> Self {
        Self::new(self.x + dx, self.y)
    }

    #[must_use]
    pub const fn dropped(self) -> Self {
        Self::new(self.x, self.y + 1)
    }
}

/// Rotation state of a piece: 0 (spawn), 1 (90° cw), 2 (180°), 3 (270° cw).
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_ccw(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// L-piece.
    L = 1,
    /// J-piece.
    J = 2,
    /// O-piece.
    O = 3,
    /// Z-piece.
    Z = 4,
    /// S-piece.
    S = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece types, in color-id order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::L,
        Self::J,
        Self::O,
        Self::Z,
        Self::S,
        Self::T,
    ];

    /// Color id of the kind's cells on the board (1-7; 0 is empty and 8 is
    /// reserved for garbage).
    #[must_use]
    pub const fn color_id(self) -> u8 {
        self as u8 + 1
    }

    /// Returns the cell offsets of this kind's shape within its bounding box
    /// for the given rotation, from the precomputed rotation table.
    #[must_use]
    pub const fn cell_offsets(self, rotation: PieceRotation) -> CellOffsets {
        PIECE_SHAPES[self as usize][rotation.index()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivalis_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::O => 'O',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivalis_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'O' => Some(PieceKind::O),
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// The four occupied cell offsets of a piece shape, relative to the
/// bounding-box anchor.
pub type CellOffsets = [(i16, i16); 4];

/// Generates all 4 rotation states of a shape by rotating 90° clockwise.
///
/// Clockwise rotation within a `size`×`size` box maps `(x, y)` to
/// `(size - 1 - y, x)`; applying it four times is the identity, so rotation
/// state 3 followed by one more turn returns to the base shape.
///
/// # Arguments
///
/// * `size` - Bounding box size of the piece (4 for I, 2 for O, 3 otherwise)
/// * `base` - Cell offsets at 0° rotation
const fn shape_rotations(size: i16, base: CellOffsets) -> [CellOffsets; 4] {
    let mut rotations = [base; 4];
    let mut i = 1;
    while i < 4 {
        let mut next = rotations[i - 1];
        let mut c = 0;
        while c < 4 {
            let (x, y) = next[c];
            next[c] = (size - 1 - y, x);
            c += 1;
        }
        rotations[i] = next;
        i += 1;
    }
    rotations
}

const PIECE_SHAPES: [[CellOffsets; 4]; PieceKind::LEN] = [
    // I-piece (vertical bar in a 4x4 box)
    shape_rotations(4, [(1, 0), (1, 1), (1, 2), (1, 3)]),
    // L-piece
    shape_rotations(3, [(1, 0), (1, 1), (1, 2), (2, 2)]),
    // J-piece
    shape_rotations(3, [(1, 0), (1, 1), (0, 2), (1, 2)]),
    // O-piece (2x2 box, rotation permutes the same four cells)
    shape_rotations(2, [(0, 0), (1, 0), (0, 1), (1, 1)]),
    // Z-piece
    shape_rotations(3, [(0, 0), (1, 0), (1, 1), (2, 1)]),
    // S-piece
    shape_rotations(3, [(1, 0), (2, 0), (0, 1), (1, 1)]),
    // T-piece
    shape_rotations(3, [(1, 0), (0, 1), (1, 1), (2, 1)]),
];
