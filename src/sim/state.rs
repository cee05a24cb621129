//! Game state and core session types

use serde::{Deserialize, Serialize};

use super::color::{Color, ColorSource, SeededColors};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start input
    #[default]
    Idle,
    /// Pause before the newest color is shown (start or round delay)
    Playing,
    /// Newest color is lit
    ShowingSequence,
    /// Player is replaying the pattern
    AwaitingInput,
    /// Wrong press; returns to Idle after the shake
    GameOver,
}

impl GamePhase {
    /// True between a start and the next mismatch
    pub fn is_started(&self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::ShowingSequence | GamePhase::AwaitingInput
        )
    }
}

/// Notifications for the audio / visual / HUD layers, drained by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new run began
    Started,
    /// Pattern grew; `level` is the new pattern length
    LevelAdvanced { level: u32, color: Color },
    /// Show the newest color to the player
    Flash { level: u32, color: Color },
    /// Correct press that did not finish the round
    Accepted { index: usize, color: Color },
    /// Wrong press; the run is over
    Mismatch {
        expected: Color,
        got: Color,
        level: u32,
    },
    /// Game over shake finished, back to Idle
    Reset,
}

/// Discrete actions the input layers can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Start,
    Press(Color),
}

/// Outcome of a single press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Not accepted in the current phase (or unknown token); state untouched
    Ignored,
    /// Matched, round still in progress
    Correct,
    /// Matched and finished the pattern; a new color was appended
    RoundComplete,
    /// Did not match; session reset
    Mismatch,
}

/// A single game of Simon
#[derive(Debug, Clone)]
pub struct GameSession<C: ColorSource = SeededColors> {
    pub(crate) source: C,
    pub(crate) phase: GamePhase,
    pub(crate) pattern: Vec<Color>,
    pub(crate) attempt: Vec<Color>,
    pub(crate) level: u32,
    /// Seconds left in the current timed phase
    pub(crate) timer: f32,
    /// Highest level reached since construction
    pub(crate) best_level: u32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession<SeededColors> {
    /// Create an idle session with a seeded color source
    pub fn new(seed: u64) -> Self {
        Self::with_source(SeededColors::new(seed))
    }
}

impl<C: ColorSource> GameSession<C> {
    /// Create an idle session drawing colors from `source`
    pub fn with_source(source: C) -> Self {
        Self {
            source,
            phase: GamePhase::Idle,
            pattern: Vec::new(),
            attempt: Vec::new(),
            level: 0,
            timer: 0.0,
            best_level: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn pattern(&self) -> &[Color] {
        &self.pattern
    }

    pub fn attempt(&self) -> &[Color] {
        &self.attempt
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn best_level(&self) -> u32 {
        self.best_level
    }

    pub fn is_started(&self) -> bool {
        self.phase.is_started()
    }

    /// No phase timer pending; nothing changes until the next input
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, GamePhase::Idle | GamePhase::AwaitingInput)
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub(crate) fn push_color(&mut self) -> Color {
        let color = self.source.next_color();
        self.pattern.push(color);
        self.level = self.pattern.len() as u32;
        self.best_level = self.best_level.max(self.level);
        color
    }
}
