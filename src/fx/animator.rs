//! Bounded particle pool advanced once per frame step

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::particle::{Particle, ParticleKind};
use super::scheduler::FrameDriven;
use crate::consts::*;

/// Party palette for confetti
pub const CONFETTI_COLORS: [u32; 6] = [0xff4444, 0x44ff44, 0x4444ff, 0xffff44, 0xff44ff, 0x44ffff];

/// Default pool cap
pub const MAX_PARTICLES: usize = 500;

/// Owns every live particle. Oldest particles are evicted when full.
#[derive(Debug, Clone)]
pub struct ParticleAnimator {
    particles: Vec<Particle>,
    rng: Pcg32,
    max_particles: usize,
}

impl Default for ParticleAnimator {
    fn default() -> Self {
        Self::new(0, MAX_PARTICLES)
    }
}

impl ParticleAnimator {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles.min(MAX_PARTICLES)),
            rng: Pcg32::seed_from_u64(seed),
            max_particles,
        }
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// Random press burst size
    pub fn burst_size(&mut self) -> usize {
        self.rng.random_range(SPARK_BURST_MIN..SPARK_BURST_MAX)
    }

    /// Spawn `count` sparks at (x, y)
    pub fn spawn(&mut self, x: f32, y: f32, color: u32, count: usize) {
        for _ in 0..count {
            let vel = Vec2::new(
                self.rng.random_range(-SPARK_SPEED..SPARK_SPEED),
                self.rng.random_range(-SPARK_SPEED..SPARK_SPEED),
            );
            let particle = Particle {
                pos: Vec2::new(x, y),
                vel,
                color,
                opacity: 1.0,
                decay: self.rng.random_range(SPARK_DECAY_MIN..SPARK_DECAY_MAX),
                size: self.rng.random_range(SPARK_SIZE_MIN..SPARK_SIZE_MAX),
                kind: ParticleKind::Spark,
            };
            self.push(particle);
        }
    }

    /// Spawn up to [`MAX_CONFETTI_BURST`] confetti pieces shooting upward
    pub fn spawn_confetti(&mut self, x: f32, y: f32, count: usize) {
        for _ in 0..count.min(MAX_CONFETTI_BURST) {
            let color = CONFETTI_COLORS[self.rng.random_range(0..CONFETTI_COLORS.len())];
            let vel = Vec2::new(
                self.rng.random_range(-CONFETTI_SPREAD..CONFETTI_SPREAD),
                -self.rng.random_range(CONFETTI_LIFT_MIN..CONFETTI_LIFT_MAX),
            );
            let particle = Particle {
                pos: Vec2::new(x, y),
                vel,
                color,
                opacity: 1.0,
                decay: CONFETTI_DECAY,
                size: self.rng.random_range(CONFETTI_SIZE_MIN..CONFETTI_SIZE_MAX),
                kind: ParticleKind::Confetti {
                    rotation: self.rng.random_range(0.0..TAU),
                    spin: self.rng.random_range(-CONFETTI_SPIN..CONFETTI_SPIN),
                },
            };
            self.push(particle);
        }
    }

    /// Random point inside a `width` x `height` area (for game over bursts)
    pub fn random_point(&mut self, width: f32, height: f32) -> Vec2 {
        Vec2::new(
            self.rng.random::<f32>() * width,
            self.rng.random::<f32>() * height,
        )
    }

    /// Advance every particle one step and drop the faded ones
    pub fn tick(&mut self) {
        self.particles.retain_mut(|p| p.update());
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn push(&mut self, particle: Particle) {
        if self.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.max_particles {
            // Remove oldest particles to make room
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }
}

impl FrameDriven for ParticleAnimator {
    fn step(&mut self) {
        self.tick();
    }

    fn is_idle(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_exact_count_full_opacity() {
        let mut animator = ParticleAnimator::new(1, MAX_PARTICLES);
        animator.spawn(100.0, 50.0, 0x44ff44, 12);
        assert_eq!(animator.len(), 12);
        for p in animator.particles() {
            assert_eq!(p.opacity, 1.0);
            assert_eq!(p.pos, Vec2::new(100.0, 50.0));
            assert_eq!(p.color, 0x44ff44);
            assert!(p.decay >= SPARK_DECAY_MIN && p.decay < SPARK_DECAY_MAX);
        }
    }

    #[test]
    fn test_confetti_capped() {
        let mut animator = ParticleAnimator::new(2, MAX_PARTICLES);
        animator.spawn_confetti(0.0, 0.0, 60);
        assert_eq!(animator.len(), MAX_CONFETTI_BURST);
        assert!(animator.particles().iter().all(|p| p.vel.y < 0.0));
        assert!(
            animator
                .particles()
                .iter()
                .all(|p| CONFETTI_COLORS.contains(&p.color))
        );
    }

    #[test]
    fn test_pool_evicts_oldest() {
        let mut animator = ParticleAnimator::new(3, 10);
        animator.spawn(0.0, 0.0, 0xff0000, 8);
        animator.spawn(1.0, 1.0, 0x0000ff, 5);
        assert_eq!(animator.len(), 10);
        let blues = animator
            .particles()
            .iter()
            .filter(|p| p.color == 0x0000ff)
            .count();
        assert_eq!(blues, 5);
    }

    #[test]
    fn test_zero_cap_spawns_nothing() {
        let mut animator = ParticleAnimator::new(3, 0);
        animator.spawn(0.0, 0.0, 0xff0000, 8);
        assert!(animator.is_empty());
    }

    #[test]
    fn test_drains_to_empty() {
        let mut animator = ParticleAnimator::new(4, MAX_PARTICLES);
        animator.spawn(0.0, 0.0, 0xff4444, 15);
        animator.spawn_confetti(0.0, 0.0, 20);
        // Slowest decay is 0.015 per step
        for _ in 0..(1.0 / SPARK_DECAY_MIN).ceil() as usize + 1 {
            animator.tick();
        }
        assert!(animator.is_empty());
    }

    #[test]
    fn test_burst_size_range() {
        let mut animator = ParticleAnimator::default();
        for _ in 0..100 {
            let n = animator.burst_size();
            assert!((SPARK_BURST_MIN..SPARK_BURST_MAX).contains(&n));
        }
    }

    proptest! {
        #[test]
        fn prop_opacity_strictly_decreases(seed in any::<u64>(), count in 1usize..40) {
            let mut animator = ParticleAnimator::new(seed, MAX_PARTICLES);
            animator.spawn(10.0, 10.0, 0xffffff, count);
            prop_assert_eq!(animator.len(), count);

            while !animator.is_empty() {
                let before: Vec<(f32, f32)> = animator
                    .particles()
                    .iter()
                    .map(|p| (p.opacity, p.decay))
                    .collect();
                animator.tick();
                // retain keeps order, so survivors are a subsequence of `before`
                let mut prev = before.iter();
                for p in animator.particles() {
                    prop_assert!(p.opacity > 0.0);
                    let matched = prev.by_ref().find(|(o, d)| {
                        *d == p.decay && (*o - *d - p.opacity).abs() < 1e-6
                    });
                    prop_assert!(matched.is_some());
                    let (o, _) = matched.unwrap();
                    prop_assert!(p.opacity < *o);
                }
            }
        }
    }
}
