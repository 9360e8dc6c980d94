//! Game configuration types.
//!
//! A session is configured once at startup:
//! - `ScoringPolicy`: points awarded per match, weighted by the streak
//! - `GameMode`: single player, or one side of a two-player game
//! - `TimerRestore`: what happens to the timer when a snapshot is loaded
//! - `seed`: deterministic deck shuffling

use serde::{Deserialize, Serialize};

/// Points awarded for a match.
///
/// `points(streak) = base_points + streak_bonus * (streak - 1)`, where
/// `streak` already counts the match being scored. With a positive bonus
/// every further consecutive match is worth strictly more than the last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub base_points: u32,
    pub streak_bonus: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_points: 10,
            streak_bonus: 5,
        }
    }
}

impl ScoringPolicy {
    /// Points for the match that brought the streak to `streak`.
    #[must_use]
    pub fn points(&self, streak: u32) -> u32 {
        let extra = streak.saturating_sub(1);
        self.base_points
            .saturating_add(self.streak_bonus.saturating_mul(extra))
    }
}

/// Who is playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    SinglePlayer,
    /// Two players on separate devices; the host moves first.
    Multiplayer { is_host: bool },
}

impl GameMode {
    #[must_use]
    pub const fn is_multiplayer(self) -> bool {
        matches!(self, Self::Multiplayer { .. })
    }

    #[must_use]
    pub const fn is_host(self) -> bool {
        matches!(self, Self::Multiplayer { is_host: true })
    }
}

/// Timer handling when a snapshot is installed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerRestore {
    /// Keep `isTimerRunning` exactly as saved.
    #[default]
    Verbatim,
    /// Always load paused; the caller resumes explicitly.
    Paused,
}

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub scoring: ScoringPolicy,
    pub mode: GameMode,
    pub timer_restore: TimerRestore,

    /// Random seed for deck shuffling.
    /// Same seed produces the same sequence of boards.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            mode: GameMode::SinglePlayer,
            timer_restore: TimerRestore::Verbatim,
            seed: 42,
        }
    }
}

impl GameConfig {
    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timer_restore(mut self, timer_restore: TimerRestore) -> Self {
        self.timer_restore = timer_restore;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
