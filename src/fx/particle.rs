//! Particle entities for press bursts and confetti

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Shape and motion rules of a particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Round dot from a button press
    Spark,
    /// Spinning square from a celebration
    Confetti { rotation: f32, spin: f32 },
}

impl ParticleKind {
    /// Added to vertical velocity each step (screen y grows downward)
    pub fn gravity(&self) -> f32 {
        match self {
            ParticleKind::Spark => SPARK_GRAVITY,
            ParticleKind::Confetti { .. } => CONFETTI_GRAVITY,
        }
    }

    /// Horizontal velocity multiplier each step
    pub fn drag(&self) -> f32 {
        match self {
            ParticleKind::Spark => SPARK_DRAG,
            ParticleKind::Confetti { .. } => CONFETTI_DRAG,
        }
    }
}

/// A short-lived visual decoration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// 1.0 when spawned, removed once <= 0
    pub opacity: f32,
    /// Opacity lost per step, always > 0
    pub decay: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Advance one step. Returns false once the particle has faded out.
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += self.kind.gravity();
        self.vel.x *= self.kind.drag();
        self.opacity -= self.decay;
        if let ParticleKind::Confetti { rotation, spin } = &mut self.kind {
            *rotation += *spin;
        }
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.opacity > 0.0
    }
}
