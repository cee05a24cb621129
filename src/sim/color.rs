//! Button colors and the randomness that picks them
//!
//! The session never touches a global RNG: every new color comes from an
//! injected [`ColorSource`], so runs are reproducible from a seed and tests
//! can script the exact pattern.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four game buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    /// Fixed palette, in pick order
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    /// Particle tint for presses on this button (0xRRGGBB)
    pub fn rgb(&self) -> u32 {
        match self {
            Color::Red => 0xff4444,
            Color::Blue => 0x4444ff,
            Color::Green => 0x44ff44,
            Color::Yellow => 0xffff44,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected color token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color token `{0}`")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Color::Red),
            "blue" => Ok(Color::Blue),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// Supplier of the next pattern color
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

/// Uniform picks over [`Color::ALL`] from a seeded PCG stream.
/// Repeats are allowed and history is ignored.
#[derive(Debug, Clone)]
pub struct SeededColors {
    rng: Pcg32,
}

impl SeededColors {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl ColorSource for SeededColors {
    fn next_color(&mut self) -> Color {
        Color::ALL[self.rng.random_range(0..Color::ALL.len())]
    }
}

/// Replays a fixed list of colors, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedColors {
    queue: VecDeque<Color>,
}

impl ScriptedColors {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            queue: colors.into_iter().collect(),
        }
    }
}

impl ColorSource for ScriptedColors {
    fn next_color(&mut self) -> Color {
        match self.queue.pop_front() {
            Some(color) => {
                self.queue.push_back(color);
                color
            }
            None => Color::Red,
        }
    }
}
