//! Cheer banks shown over the board

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Start,
    LevelUp,
    GameOver,
}

const START: &[&str] = &[
    "LET'S GO! 🚀",
    "GET READY! ⚡",
    "HERE WE GO! 🎮",
    "TIME TO PLAY! 🎯",
    "SHOW YOUR SKILLS! 💪",
    "LET'S ROCK! 🎸",
];

const LEVEL_UP: &[&str] = &[
    "AWESOME! 🔥",
    "NICE MOVES! 💫",
    "YOU GOT IT! ✨",
    "KEEP GOING! 🚀",
    "ON FIRE! 🔥",
    "LEGENDARY! 👑",
    "INCREDIBLE! 🌟",
    "UNSTOPPABLE! 💥",
];

const GAME_OVER: &[&str] = &[
    "OOPS! 💥",
    "GAME OVER! 😅",
    "TRY AGAIN! 🔄",
    "SO CLOSE! 😬",
    "BETTER LUCK! 🍀",
    "YOU CAN DO IT! 💪",
];

impl MessageKind {
    pub fn bank(&self) -> &'static [&'static str] {
        match self {
            MessageKind::Start => START,
            MessageKind::LevelUp => LEVEL_UP,
            MessageKind::GameOver => GAME_OVER,
        }
    }

    /// Uniform pick from this kind's bank
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &'static str {
        let bank = self.bank();
        bank[rng.random_range(0..bank.len())]
    }
}
