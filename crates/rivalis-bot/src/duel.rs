use std::{cell::Cell as LineCell, rc::Rc, time::Duration};

use rivalis_engine::Field;

use crate::{
    bot::{Bot, BotEvent},
    profile::Difficulty,
};

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The bot topped out first.
    PlayerWon,
    /// The player topped out first.
    BotWon,
}

/// Running attack totals for the scoreboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchStats {
    /// Garbage lines the player has sent to the bot.
    pub attacks_sent: usize,
    /// Garbage lines the bot has sent to the player.
    pub attacks_received: usize,
}

/// A head-to-head match between a human-driven field and a [`Bot`].
///
/// Owns both fields and the attack channel between them. Line clears on one
/// side become garbage on the other, applied only at tick boundaries so
/// neither side ever sees a board change mid-move. Once either side tops
/// out the outcome is fixed and all further inputs are ignored.
#[derive(Debug)]
pub struct MatchState {
    player: Field,
    bot: Bot,
    /// Garbage owed to the bot, applied before its next update.
    attack_to_bot: usize,
    /// Garbage owed to the player, accumulated by the bot's clear callback.
    attack_to_player: Rc<LineCell<usize>>,
    stats: MatchStats,
    outcome: Option<MatchOutcome>,
}

impl MatchState {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(rand::random(), difficulty)
    }

    /// Creates a match where both piece streams and all bot randomness
    /// derive from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64, difficulty: Difficulty) -> Self {
        let attack_to_player = Rc::new(LineCell::new(0));
        let tx = Rc::clone(&attack_to_player);
        let bot = Bot::with_seed(
            seed,
            difficulty,
            Box::new(move |lines| tx.set(tx.get() + lines)),
        );
        Self {
            player: Field::with_seed(seed),
            bot,
            attack_to_bot: 0,
            attack_to_player,
            stats: MatchStats::default(),
            outcome: None,
        }
    }

    #[must_use]
    pub fn player(&self) -> &Field {
        &self.player
    }

    #[must_use]
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    #[must_use]
    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advances the bot by `delta`, delivering any garbage owed to it first
    /// and collecting any garbage it sent afterwards.
    pub fn update_bot(&mut self, delta: Duration) -> Option<BotEvent> {
        if self.is_over() {
            return None;
        }

        let incoming = std::mem::take(&mut self.attack_to_bot);
        if incoming > 0 {
            self.bot.receive_attack(incoming);
        }

        let event = self.bot.update(delta);
        if event == Some(BotEvent::ToppedOut) {
            self.outcome = Some(MatchOutcome::PlayerWon);
        }

        let outgoing = self.attack_to_player.take();
        if outgoing > 0 && !self.is_over() {
            self.stats.attacks_received += outgoing;
            self.player.receive_garbage(outgoing);
        }

        event
    }

    pub fn player_shift_left(&mut self) -> bool {
        !self.is_over() && self.player.shift_left()
    }

    pub fn player_shift_right(&mut self) -> bool {
        !self.is_over() && self.player.shift_right()
    }

    pub fn player_rotate(&mut self) -> bool {
        !self.is_over() && self.player.rotate_piece()
    }

    /// One gravity step on the player's side, locking the piece if it rests
    /// on the stack.
    pub fn player_soft_drop(&mut self) {
        if self.is_over() {
            return;
        }
        if let Some((cleared, result)) = self.player.step_down() {
            self.settle_player_lock(cleared, result.is_err());
        }
    }

    pub fn player_hard_drop(&mut self) {
        if self.is_over() {
            return;
        }
        let (cleared, result) = self.player.hard_drop();
        self.settle_player_lock(cleared, result.is_err());
    }

    fn settle_player_lock(&mut self, cleared_lines: usize, topped_out: bool) {
        if topped_out {
            self.outcome = Some(MatchOutcome::BotWon);
            return;
        }
        if cleared_lines > 0 {
            self.stats.attacks_sent += cleared_lines;
            self.attack_to_bot += cleared_lines;
        }
    }
}

#[cfg(test)]
mod tests {
    use rivalis_engine::{Board, COLS, Cell, PieceKind, ROWS};

    use super::*;

    #[test]
    fn test_same_seed_matches_are_identical() {
        let mut a = MatchState::with_seed(0xBEEF, Difficulty::Hard);
        let mut b = MatchState::with_seed(0xBEEF, Difficulty::Hard);

        let tick = Duration::from_millis(16);
        for _ in 0..1_000 {
            assert_eq!(a.update_bot(tick), b.update_bot(tick));
        }
        assert_eq!(a.bot().field().board(), b.bot().field().board());
        assert_eq!(a.player().falling_piece(), b.player().falling_piece());
    }

    #[test]
    fn test_player_clear_sends_garbage_to_bot() {
        let mut state = MatchState::with_seed(42, Difficulty::Easy);

        // Hand-build a player board one cell short of a full bottom row, with
        // a vertical I falling into the gap.
        *state.player.board_mut() = Board::new();
        for x in 0..COLS {
            if x != 4 {
                state.player.board_mut().set_cell(x, ROWS - 1, Cell::Garbage);
            }
        }
        let piece = rivalis_engine::Piece::with_state(
            PieceKind::I,
            rivalis_engine::PieceRotation::default(),
            rivalis_engine::PiecePosition::new(3, 0),
        );
        state.player.set_falling_piece(piece).unwrap();

        state.player_hard_drop();
        assert_eq!(state.stats().attacks_sent, 1);
        assert_eq!(state.attack_to_bot, 1);

        // The attack lands on the bot's stack at its next tick.
        let before = column_occupancy(state.bot().field().board());
        state.update_bot(Duration::from_millis(1));
        let after = column_occupancy(state.bot().field().board());
        assert_eq!(after, before + COLS - 1);
        assert_eq!(state.attack_to_bot, 0);
    }

    #[test]
    fn test_player_top_out_ends_the_match() {
        let mut state = MatchState::with_seed(5, Difficulty::Normal);

        // Bury the player's spawn area so the next lock has nowhere to put
        // the following piece. The right column stays open to rule out
        // accidental line clears.
        for y in 1..ROWS {
            for x in 0..COLS - 1 {
                state.player.board_mut().set_cell(x, y, Cell::Garbage);
            }
            state.player.board_mut().set_cell(COLS - 1, y, Cell::Empty);
        }

        state.player_hard_drop();
        assert_eq!(state.outcome(), Some(MatchOutcome::BotWon));
        assert!(state.is_over());

        // Inputs are dead once the match is decided.
        assert!(!state.player_shift_left());
        assert_eq!(state.update_bot(Duration::from_millis(16)), None);
    }

    #[test]
    fn test_bot_top_out_ends_the_match() {
        let mut state = MatchState::with_seed(9, Difficulty::SuperHard);
        state.attack_to_bot = 18;

        let tick = Duration::from_millis(16);
        let topped_out = (0..10_000).any(|_| state.update_bot(tick) == Some(BotEvent::ToppedOut));
        assert!(topped_out);
        assert_eq!(state.outcome(), Some(MatchOutcome::PlayerWon));
    }

    #[test]
    fn test_bot_clears_reach_the_player_after_its_tick() {
        let mut state = MatchState::with_seed(1, Difficulty::SuperHard);

        // Leave the bot alone and drive ticks until the stats show the
        // player received garbage or the match somehow ends.
        let tick = Duration::from_millis(16);
        for _ in 0..50_000 {
            state.update_bot(tick);
            if state.stats().attacks_received > 0 || state.is_over() {
                break;
            }
        }
        // A superHard bot left alone clears lines; either it attacked the
        // player or (extremely unlikely on an open board) the match ended.
        assert!(state.stats().attacks_received > 0 || state.is_over());
    }

    fn column_occupancy(board: &Board) -> usize {
        board
            .rows()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }
}
