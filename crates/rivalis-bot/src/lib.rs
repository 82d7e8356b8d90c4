//! Automated opponent for the rivalis engine.
//!
//! The crate layers a heuristic planner on top of [`rivalis_engine`]: board
//! features ([`metrics`]), a full placement search ([`planner`]), difficulty
//! tuning ([`profile`]), the timed state machine that plays a field
//! ([`bot`]), and the player-versus-bot match loop ([`duel`]).

pub use self::{bot::*, duel::*, metrics::*, planner::*, profile::*};

pub mod bot;
pub mod duel;
pub mod metrics;
pub mod planner;
pub mod profile;
