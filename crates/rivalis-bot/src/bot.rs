use std::{collections::VecDeque, fmt, time::Duration};

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use rivalis_engine::{Field, PieceKind};

use crate::{
    planner::{Placement, choose_best_placement},
    profile::{Difficulty, DifficultyProfile},
};

/// Salt applied to the match seed for the error-roll RNG, so mistake rolls
/// are decorrelated from the piece and garbage streams.
const ERROR_SEED_SALT: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// One steering input the bot feeds to its own field, mirroring the inputs
/// a human player has. At most one command is consumed per update tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Rotate,
    Left,
    Right,
}

/// Notable outcome of a single [`Bot::update`] tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotEvent {
    /// A piece locked into the stack. `cleared_lines` is 0 when the lock
    /// completed no rows.
    Locked { cleared_lines: usize },
    /// The lock left no room for the next spawn. The bot stops acting and
    /// every later update returns `None`.
    ToppedOut,
}

/// An automated opponent driving its own [`Field`].
///
/// The bot runs a small per-piece cycle: think for the profile's delay,
/// plan a placement (possibly corrupted by an error roll), drain the move
/// queue one command per tick, then let gravity or the early hard-drop rule
/// finish the piece. Locking restarts the cycle for the next piece.
///
/// All randomness is seeded, so two bots built with the same seed and
/// difficulty and fed the same tick deltas play identical games.
pub struct Bot {
    field: Field,
    difficulty: Difficulty,
    profile: &'static DifficultyProfile,
    error_rng: Pcg32,
    on_lines_cleared: Box<dyn FnMut(usize)>,
    think_remaining: Option<Duration>,
    target: Option<Placement>,
    move_queue: VecDeque<Command>,
    drop_timer: Duration,
    game_over: bool,
}

impl Bot {
    /// Creates a bot with a random seed. `on_lines_cleared` fires on every
    /// lock that clears at least one row, with the cleared count.
    #[must_use]
    pub fn new(difficulty: Difficulty, on_lines_cleared: Box<dyn FnMut(usize)>) -> Self {
        Self::with_seed(rand::rng().random(), difficulty, on_lines_cleared)
    }

    #[must_use]
    pub fn with_seed(
        seed: u64,
        difficulty: Difficulty,
        on_lines_cleared: Box<dyn FnMut(usize)>,
    ) -> Self {
        let profile = difficulty.profile();
        Self {
            field: Field::with_seed(seed),
            difficulty,
            profile,
            error_rng: Pcg32::seed_from_u64(seed ^ ERROR_SEED_SALT),
            on_lines_cleared,
            think_remaining: Some(profile.think_delay),
            target: None,
            move_queue: VecDeque::new(),
            drop_timer: Duration::ZERO,
            game_over: false,
        }
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.field.score()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Adds `lines` of garbage to the bot's stack. Called by the match loop
    /// at tick boundaries, never mid-update.
    pub fn receive_attack(&mut self, lines: usize) {
        if !self.game_over {
            self.field.receive_garbage(lines);
        }
    }

    /// Advances the bot by `delta` of wall-clock time.
    ///
    /// Per tick, exactly one of these happens, in priority order: the think
    /// timer runs down (the piece does not fall while thinking), one queued
    /// command is applied, the early hard-drop fires, or gravity steps the
    /// piece down once the drop interval has elapsed.
    pub fn update(&mut self, delta: Duration) -> Option<BotEvent> {
        if self.game_over {
            return None;
        }

        if let Some(remaining) = self.think_remaining {
            match remaining.checked_sub(delta) {
                Some(left) if left > Duration::ZERO => {
                    self.think_remaining = Some(left);
                }
                _ => {
                    self.think_remaining = None;
                    self.plan_move();
                }
            }
            return None;
        }

        self.drop_timer += delta;

        if let Some(command) = self.move_queue.pop_front() {
            match command {
                Command::Rotate => {
                    self.field.rotate_piece();
                }
                Command::Left => {
                    self.field.shift_left();
                }
                Command::Right => {
                    self.field.shift_right();
                }
            }
            return None;
        }

        if self.should_hard_drop() {
            let (cleared, result) = self.field.hard_drop();
            return Some(self.after_lock(cleared, result.is_err()));
        }

        if self.drop_timer >= self.profile.drop_interval {
            self.drop_timer = Duration::ZERO;
            if let Some((cleared, result)) = self.field.step_down() {
                return Some(self.after_lock(cleared, result.is_err()));
            }
        }

        None
    }

    /// Picks a target placement for the current piece and queues the moves
    /// to reach it.
    ///
    /// An error roll may replace the planned column and rotation with random
    /// ones, modelling a lapse in judgement. Under total lock-out the planner
    /// returns no placement; the bot leaves the piece where it spawned and
    /// lets gravity force the losing lock.
    fn plan_move(&mut self) {
        let kind = self.field.falling_piece().kind();
        let Some(mut placement) =
            choose_best_placement(self.field.board(), kind, &self.profile.weights)
        else {
            return;
        };

        if self.error_rng.random_bool(self.profile.error_rate) {
            placement.column = self.error_rng.random_range(0..8_i16);
            placement.rotations = self.error_rng.random_range(0..4_u8);
        }

        for _ in 0..placement.rotations {
            self.move_queue.push_back(Command::Rotate);
        }
        let distance = placement.column - self.field.falling_piece().position().x();
        let step = if distance < 0 {
            Command::Left
        } else {
            Command::Right
        };
        for _ in 0..distance.unsigned_abs() {
            self.move_queue.push_back(step);
        }
        self.target = Some(placement);
    }

    /// The stronger profiles slam the piece once it has fallen most of the
    /// way to its planned landing row instead of waiting out gravity.
    fn should_hard_drop(&self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let threshold = self.profile.drop_threshold;
        if threshold <= 0.0 || target.landing_row <= 0 {
            return false;
        }
        let y = self.field.falling_piece().position().y();
        f32::from(y) >= f32::from(target.landing_row) * threshold
    }

    fn after_lock(&mut self, cleared_lines: usize, topped_out: bool) -> BotEvent {
        self.drop_timer = Duration::ZERO;
        self.target = None;
        self.move_queue.clear();
        if cleared_lines > 0 {
            (self.on_lines_cleared)(cleared_lines);
        }
        if topped_out {
            self.game_over = true;
            BotEvent::ToppedOut
        } else {
            self.think_remaining = Some(self.profile.think_delay);
            BotEvent::Locked { cleared_lines }
        }
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.field.next_piece()
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("difficulty", &self.difficulty)
            .field("target", &self.target)
            .field("move_queue", &self.move_queue)
            .field("drop_timer", &self.drop_timer)
            .field("game_over", &self.game_over)
            .finish_non_exhaustive()
    }
}
