use std::collections::VecDeque;

use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Manages piece generation using the 7-bag randomization algorithm.
///
/// # 7-Bag System
///
/// 1. Create a "bag" containing all 7 piece types
/// 2. Shuffle the bag randomly
/// 3. Draw pieces in order from the bag
/// 4. Refill with a new shuffled bag when 7 or fewer pieces remain
///
/// Every window of 7 consecutive draws aligned to a bag boundary contains
/// each type exactly once, which prevents long droughts of any piece type
/// while staying random.
///
/// # Example
///
/// ```
/// use rivalis_engine::PieceBag;
///
/// let mut bag = PieceBag::new();
/// let first = bag.pop_next();
/// let preview: Vec<_> = bag.upcoming().take(5).collect();
/// # let _ = (first, preview);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates a bag with a random seed.
    ///
    /// For deterministic piece sequences use [`Self::with_seed`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but seeded for a reproducible draw order.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let rng = Pcg32::seed_from_u64(seed);
        let queue = VecDeque::with_capacity(PieceKind::LEN * 2);
        let mut this = Self { rng, queue };
        this.refill();
        this
    }

    /// Tops up the queue with shuffled 7-piece sets.
    ///
    /// After refilling the queue holds at least 8 elements, so the next
    /// piece can always be previewed even right after a pop.
    fn refill(&mut self) {
        while self.queue.len() <= PieceKind::LEN {
            let mut bag = PieceKind::ALL;
            bag.shuffle(&mut self.rng);
            self.queue.extend(bag);
        }
    }

    /// Draws the next piece kind.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty (cannot happen with the refill rule).
    pub fn pop_next(&mut self) -> PieceKind {
        self.refill();
        self.queue
            .pop_front()
            .expect("piece bag should never be empty")
    }

    /// The piece that the next [`Self::pop_next`] will return.
    #[must_use]
    pub fn peek_next(&self) -> PieceKind {
        self.queue[0]
    }

    /// Iterator over the upcoming pieces, for previews.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_first_seven_draws_cover_every_kind() {
        let mut bag = PieceBag::with_seed(3);
        let drawn: HashSet<_> = (0..PieceKind::LEN).map(|_| bag.pop_next()).collect();
        assert_eq!(drawn.len(), PieceKind::LEN);
    }

    #[test]
    fn test_every_aligned_window_of_seven_is_a_permutation() {
        let mut bag = PieceBag::with_seed(99);
        for _ in 0..20 {
            let window: HashSet<_> = (0..PieceKind::LEN).map(|_| bag.pop_next()).collect();
            assert_eq!(window.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceBag::with_seed(1234);
        let mut b = PieceBag::with_seed(1234);
        for _ in 0..50 {
            assert_eq!(a.pop_next(), b.pop_next());
        }
    }

    #[test]
    fn test_peek_matches_next_pop() {
        let mut bag = PieceBag::with_seed(5);
        for _ in 0..30 {
            let peeked = bag.peek_next();
            assert_eq!(bag.pop_next(), peeked);
        }
    }
}
