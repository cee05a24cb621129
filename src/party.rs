//! Game session + effects, wired together
//!
//! `Party` owns the session and the particle pool, turns session events into
//! particles and presentation cues, and is the single thing the frame loop
//! drives. The browser shell only drains [`Cue`]s and draws particles.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::fx::{FrameDriven, ParticleAnimator};
use crate::gesture::{Gesture, GestureAction, GestureGate, HandPose};
use crate::messages::MessageKind;
use crate::settings::Settings;
use crate::sim::{Color, GameEvent, GameInput, GameSession, Submission};

/// Confetti shot from the top center when a run starts
const START_CONFETTI: usize = 50;
/// Confetti on every new level
const LEVEL_CONFETTI: usize = 60;
/// Confetti from a thumbs up
const THUMBS_UP_CONFETTI: usize = 30;
/// Explosions scattered over the screen on game over
const GAME_OVER_BURSTS: usize = 5;
/// Frames between game over explosions (~150 ms)
const GAME_OVER_BURST_GAP: u32 = 9;
/// Red spark count per game over explosion
const GAME_OVER_SPARKS: usize = 14;
const GAME_OVER_RED: u32 = 0xff0000;

/// Presentation requests for the shell
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    Sound(SoundEffect),
    /// Pop a cheer message
    Message(&'static str),
    /// Light up a button
    Flash(Color),
    /// Replace the title text
    Title(String),
    /// Shake the board and show the start button again
    GameOver,
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub width: f32,
    pub height: f32,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingBurst {
    frames_left: u32,
}

pub struct Party {
    pub session: GameSession,
    pub animator: ParticleAnimator,
    pub stage: Stage,
    settings: Settings,
    gate: GestureGate,
    rng: Pcg32,
    bursts: Vec<PendingBurst>,
    cues: Vec<Cue>,
}

impl Party {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            session: GameSession::new(seed),
            animator: ParticleAnimator::new(seed ^ 0x9e37_79b9, settings.max_particles()),
            stage: Stage::default(),
            gate: GestureGate::new(settings.gesture_cooldown_ms),
            settings,
            rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
            bursts: Vec::new(),
            cues: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.animator.set_max_particles(settings.max_particles());
        self.gate = GestureGate::new(settings.gesture_cooldown_ms);
        self.settings = settings;
    }

    /// Start a run if none is active
    pub fn start(&mut self) -> bool {
        let started = self.session.start();
        self.collect();
        started
    }

    /// Button press at `at` (button center, screen pixels)
    pub fn press(&mut self, color: Color, at: Vec2) -> Submission {
        let count = self.animator.burst_size();
        self.animator.spawn(at.x, at.y, color.rgb(), count);
        self.cues.push(Cue::Sound(SoundEffect::Tone(color)));

        let result = self.session.submit(color);
        self.collect();
        result
    }

    pub fn apply(&mut self, input: GameInput, at: Vec2) -> Submission {
        match input {
            GameInput::Start => {
                if self.start() {
                    Submission::Correct
                } else {
                    Submission::Ignored
                }
            }
            GameInput::Press(color) => self.press(color, at),
        }
    }

    /// Feed one detector frame. Returns the gesture that got through the gate.
    pub fn gesture(&mut self, pose: &HandPose, now_ms: f64) -> Option<Gesture> {
        if !self.settings.gesture_control {
            return None;
        }
        let gesture = self.gate.accept(pose, now_ms)?;
        match gesture.action() {
            GestureAction::Start => {
                if !self.session.is_started() {
                    self.start();
                }
            }
            GestureAction::Celebrate => {
                let x = self.animator.random_point(self.stage.width, 0.0).x;
                self.confetti(Vec2::new(x, 100.0), THUMBS_UP_CONFETTI);
            }
            GestureAction::Cheer => self.message(MessageKind::Start),
            GestureAction::Stop | GestureAction::Point => {}
        }
        Some(gesture)
    }

    /// The detector lost the hand; the next pose is read without cooldown
    pub fn hand_lost(&mut self) {
        self.gate.reset();
    }

    /// Hand cues to the shell, oldest first
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    fn confetti(&mut self, at: Vec2, count: usize) {
        if self.settings.confetti_enabled() {
            self.animator.spawn_confetti(at.x, at.y, count);
        }
    }

    fn message(&mut self, kind: MessageKind) {
        let text = kind.pick(&mut self.rng);
        self.cues.push(Cue::Message(text));
    }

    /// Translate queued session events into particles and cues
    fn collect(&mut self) {
        let events: Vec<GameEvent> = self.session.drain_events().collect();
        let center_x = self.stage.width / 2.0;

        for event in events {
            match event {
                GameEvent::Started => {
                    self.message(MessageKind::Start);
                    self.confetti(Vec2::new(center_x, 100.0), START_CONFETTI);
                }
                GameEvent::LevelAdvanced { level, .. } => {
                    self.cues.push(Cue::Title(format!("Level {}", level)));
                    self.cues.push(Cue::Sound(SoundEffect::Fanfare));
                    if level > 1 {
                        self.message(MessageKind::LevelUp);
                    }
                    self.confetti(Vec2::new(center_x, 150.0), LEVEL_CONFETTI);
                }
                GameEvent::Flash { color, .. } => {
                    self.cues.push(Cue::Flash(color));
                    self.cues.push(Cue::Sound(SoundEffect::Tone(color)));
                }
                GameEvent::Accepted { .. } | GameEvent::Reset => {}
                GameEvent::Mismatch { .. } => {
                    self.cues.push(Cue::Sound(SoundEffect::Wrong));
                    self.message(MessageKind::GameOver);
                    self.cues
                        .push(Cue::Title("Game Over! Press Any Key To Restart".to_string()));
                    self.cues.push(Cue::GameOver);
                    self.bursts.extend((0..GAME_OVER_BURSTS).map(|i| PendingBurst {
                        frames_left: i as u32 * GAME_OVER_BURST_GAP,
                    }));
                }
            }
        }
    }

    fn game_over_burst(&mut self) {
        let at = self
            .animator
            .random_point(self.stage.width, self.stage.height);
        self.animator
            .spawn(at.x, at.y, GAME_OVER_RED, GAME_OVER_SPARKS);
        let at = self
            .animator
            .random_point(self.stage.width, self.stage.height);
        self.confetti(at, 25);
    }
}

impl FrameDriven for Party {
    fn step(&mut self) {
        let due = self.bursts.iter().filter(|b| b.frames_left == 0).count();
        self.bursts.retain(|b| b.frames_left > 0);
        for burst in &mut self.bursts {
            burst.frames_left -= 1;
        }
        for _ in 0..due {
            self.game_over_burst();
        }

        self.session.tick(crate::consts::FRAME_DT);
        self.collect();
        self.animator.tick();
    }

    fn is_idle(&self) -> bool {
        self.animator.is_empty() && self.session.is_settled() && self.bursts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::KEYPOINT_COUNT;
    use crate::sim::GamePhase;

    fn party() -> Party {
        Party::new(77, Settings::default())
    }

    fn run_until_idle(party: &mut Party) -> usize {
        let mut frames = 0;
        while !party.is_idle() {
            party.step();
            frames += 1;
            assert!(frames < 10_000);
        }
        frames
    }

    /// Peace sign: index and middle raised, everything else curled
    fn peace() -> HandPose {
        let mut kp = [Vec2::new(0.5, 0.6); KEYPOINT_COUNT];
        kp[4].y = 0.65;
        kp[8].y = 0.3;
        kp[12].y = 0.3;
        kp[16].y = 0.65;
        kp[20].y = 0.65;
        HandPose::new(kp)
    }

    #[test]
    fn test_start_cues_and_confetti() {
        let mut p = party();
        assert!(p.start());
        assert!(!p.animator.is_empty());
        let cues = p.take_cues();
        assert!(matches!(cues[0], Cue::Message(_)));
        assert!(cues.contains(&Cue::Title("Level 1".to_string())));
        assert!(cues.contains(&Cue::Sound(SoundEffect::Fanfare)));
    }

    #[test]
    fn test_flash_cue_after_delay() {
        let mut p = party();
        p.start();
        p.take_cues();
        run_until_idle(&mut p);
        let first = p.session.pattern()[0];
        let cues = p.take_cues();
        assert!(cues.contains(&Cue::Flash(first)));
        assert_eq!(p.session.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn test_press_sparks_and_tone() {
        let mut p = party();
        p.start();
        run_until_idle(&mut p);
        p.take_cues();

        let color = p.session.pattern()[0];
        let result = p.press(color, Vec2::new(10.0, 20.0));
        assert_eq!(result, Submission::RoundComplete);
        assert!(
            p.animator
                .particles()
                .iter()
                .any(|pt| pt.color == color.rgb())
        );
        let cues = p.take_cues();
        assert_eq!(cues[0], Cue::Sound(SoundEffect::Tone(color)));
        assert!(cues.contains(&Cue::Title("Level 2".to_string())));
    }

    #[test]
    fn test_mismatch_schedules_bursts() {
        let mut p = party();
        p.start();
        run_until_idle(&mut p);
        let wrong = Color::ALL
            .into_iter()
            .find(|c| *c != p.session.pattern()[0])
            .unwrap();
        assert_eq!(p.press(wrong, Vec2::ZERO), Submission::Mismatch);
        let cues = p.take_cues();
        assert!(cues.contains(&Cue::Sound(SoundEffect::Wrong)));
        assert!(cues.contains(&Cue::GameOver));

        run_until_idle(&mut p);
        assert_eq!(p.session.phase(), GamePhase::Idle);
        assert!(p.animator.is_empty());
    }

    #[test]
    fn test_peace_sign_starts_once() {
        let mut p = party();
        assert_eq!(p.gesture(&peace(), 0.0), Some(Gesture::Peace));
        assert!(p.session.is_started());
        let pattern = p.session.pattern().to_vec();

        assert_eq!(p.gesture(&peace(), 100.0), None);
        assert_eq!(p.gesture(&peace(), 1000.0), Some(Gesture::Peace));
        assert_eq!(p.session.pattern(), pattern.as_slice());
    }

    #[test]
    fn test_hand_lost_clears_cooldown() {
        let mut p = party();
        assert_eq!(p.gesture(&peace(), 0.0), Some(Gesture::Peace));
        assert_eq!(p.gesture(&peace(), 100.0), None);
        p.hand_lost();
        assert_eq!(p.gesture(&peace(), 150.0), Some(Gesture::Peace));
    }

    #[test]
    fn test_gestures_disabled() {
        let mut p = Party::new(
            1,
            Settings {
                gesture_control: false,
                ..Settings::default()
            },
        );
        assert_eq!(p.gesture(&peace(), 0.0), None);
        assert!(!p.session.is_started());
    }

    #[test]
    fn test_apply_settings_shrinks_pool() {
        let mut p = party();
        p.start();
        assert!(p.animator.len() > 10);
        p.apply_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        assert!(p.animator.is_empty());
        assert_eq!(p.animator.max_particles(), 0);
    }

    #[test]
    fn test_reduced_motion_skips_confetti() {
        let mut p = Party::new(
            2,
            Settings {
                reduced_motion: true,
                ..Settings::default()
            },
        );
        p.start();
        assert!(p.animator.is_empty());
    }
}
