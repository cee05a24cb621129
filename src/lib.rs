//! Simon Party - A color memory game with confetti
//!
//! Core modules:
//! - `sim`: Deterministic sequence game (pattern, attempt, phase machine)
//! - `fx`: Particle animator and the frame loop that drives it
//! - `gesture`: Hand keypoint classifier feeding game actions
//! - `audio`: Procedural beeps (playback on wasm only)
//! - `messages`: Cheer banks for start / level up / game over
//! - `party`: Session and effects wired together for the frame loop
//! - `settings`: Player preferences

pub mod audio;
pub mod fx;
pub mod gesture;
pub mod messages;
pub mod party;
pub mod settings;
pub mod sim;

pub use party::{Cue, Party, Stage};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed animation step (particle speeds are expressed per step)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per display frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest display-frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Pause between pressing start and the first flash
    pub const START_DELAY: f32 = 0.6;
    /// Pause between a completed round and the next flash
    pub const ROUND_DELAY: f32 = 1.0;
    /// How long the newest color stays lit
    pub const FLASH_DURATION: f32 = 0.3;
    /// Game over shake before returning to idle
    pub const GAME_OVER_DURATION: f32 = 0.5;

    /// Spark velocity per axis is drawn from [-SPARK_SPEED, SPARK_SPEED)
    pub const SPARK_SPEED: f32 = 4.0;
    pub const SPARK_GRAVITY: f32 = 0.1;
    pub const SPARK_DRAG: f32 = 0.98;
    pub const SPARK_DECAY_MIN: f32 = 0.015;
    pub const SPARK_DECAY_MAX: f32 = 0.045;
    pub const SPARK_SIZE_MIN: f32 = 2.0;
    pub const SPARK_SIZE_MAX: f32 = 6.0;
    /// Button press burst size range (half-open)
    pub const SPARK_BURST_MIN: usize = 10;
    pub const SPARK_BURST_MAX: usize = 18;

    pub const CONFETTI_GRAVITY: f32 = 0.2;
    pub const CONFETTI_DRAG: f32 = 0.99;
    pub const CONFETTI_DECAY: f32 = 0.015;
    pub const CONFETTI_SIZE_MIN: f32 = 4.0;
    pub const CONFETTI_SIZE_MAX: f32 = 12.0;
    pub const CONFETTI_SPREAD: f32 = 6.0;
    pub const CONFETTI_LIFT_MIN: f32 = 5.0;
    pub const CONFETTI_LIFT_MAX: f32 = 20.0;
    pub const CONFETTI_SPIN: f32 = 0.15;
    /// Cap per confetti burst
    pub const MAX_CONFETTI_BURST: usize = 25;

    /// Gesture detector poll interval (ms)
    pub const GESTURE_POLL_MS: f64 = 100.0;
    /// Minimum time between two accepted gestures (ms)
    pub const GESTURE_COOLDOWN_MS: f64 = 500.0;

    /// How long a cheer message stays on screen (ms)
    pub const MESSAGE_DURATION_MS: i32 = 1500;
}

/// Format a packed 0xRRGGBB color as a CSS hex string
pub fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0x00ff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(0xff4444), "#ff4444");
        assert_eq!(css_color(0x00000f), "#00000f");
    }
}
