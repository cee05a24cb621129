//! Cosmetic effects
//!
//! Nothing here affects gameplay. Particle motion is expressed per fixed
//! frame step (see `consts::FRAME_DT`).

pub mod animator;
pub mod particle;
pub mod scheduler;

pub use animator::{CONFETTI_COLORS, MAX_PARTICLES, ParticleAnimator};
pub use particle::{Particle, ParticleKind};
pub use scheduler::{AnimationLoop, FixedStep, FrameDriven, FrameScheduler};
