//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded or scripted color sources only
//! - Time advances only through `tick(dt)`
//! - No rendering, audio or platform dependencies

pub mod color;
pub mod state;
pub mod tick;

pub use color::{Color, ColorSource, ParseColorError, ScriptedColors, SeededColors};
pub use state::{GameEvent, GameInput, GamePhase, GameSession, Submission};
