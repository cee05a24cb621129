//! Session transitions: start, presses and timer ticks

use super::color::{Color, ColorSource};
use super::state::{GameEvent, GameInput, GamePhase, GameSession, Submission};
use crate::consts::*;

impl<C: ColorSource> GameSession<C> {
    /// Begin a new run. Returns false (and does nothing) if one is running.
    pub fn start(&mut self) -> bool {
        if self.phase.is_started() {
            return false;
        }

        self.pattern.clear();
        self.attempt.clear();
        self.level = 0;
        self.phase = GamePhase::Playing;
        self.timer = START_DELAY;
        self.events.push(GameEvent::Started);

        let color = self.push_color();
        self.events.push(GameEvent::LevelAdvanced {
            level: self.level,
            color,
        });
        log::info!("Run started, first color {}", color);
        true
    }

    /// Record a press and compare it against the pattern
    pub fn submit(&mut self, color: Color) -> Submission {
        if !self.phase.is_started() {
            log::debug!("Ignoring {} press while {:?}", color, self.phase);
            return Submission::Ignored;
        }

        let index = self.attempt.len();
        self.attempt.push(color);

        let expected = self.pattern.get(index).copied();
        if expected != Some(color) {
            let level = self.level;
            // Pattern is never shorter than attempt while started
            let expected = expected.unwrap_or(color);
            self.game_over(expected, color, level);
            return Submission::Mismatch;
        }

        if self.attempt.len() < self.pattern.len() {
            // Early input skips whatever is still being shown
            self.phase = GamePhase::AwaitingInput;
            self.timer = 0.0;
            self.events.push(GameEvent::Accepted { index, color });
            return Submission::Correct;
        }

        self.attempt.clear();
        let color = self.push_color();
        self.phase = GamePhase::Playing;
        self.timer = ROUND_DELAY;
        self.events.push(GameEvent::LevelAdvanced {
            level: self.level,
            color,
        });
        log::info!("Level {} reached", self.level);
        Submission::RoundComplete
    }

    /// Press by token name; unknown names are dropped without touching state
    pub fn submit_name(&mut self, name: &str) -> Submission {
        match name.parse::<Color>() {
            Ok(color) => self.submit(color),
            Err(e) => {
                log::warn!("{}", e);
                Submission::Ignored
            }
        }
    }

    /// Entry point shared by keyboard, pointer and gesture input
    pub fn apply(&mut self, input: GameInput) -> Submission {
        match input {
            GameInput::Start => {
                if self.start() {
                    Submission::Correct
                } else {
                    Submission::Ignored
                }
            }
            GameInput::Press(color) => self.submit(color),
        }
    }

    /// Advance phase timers by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.is_settled() {
            return;
        }

        self.timer -= dt;
        if self.timer > 0.0 {
            return;
        }

        match self.phase {
            GamePhase::Playing => {
                if let Some(&color) = self.pattern.last() {
                    self.phase = GamePhase::ShowingSequence;
                    self.timer = FLASH_DURATION;
                    self.events.push(GameEvent::Flash {
                        level: self.level,
                        color,
                    });
                } else {
                    self.phase = GamePhase::AwaitingInput;
                    self.timer = 0.0;
                }
            }
            GamePhase::ShowingSequence => {
                self.phase = GamePhase::AwaitingInput;
                self.timer = 0.0;
            }
            GamePhase::GameOver => {
                self.phase = GamePhase::Idle;
                self.timer = 0.0;
                self.events.push(GameEvent::Reset);
            }
            GamePhase::Idle | GamePhase::AwaitingInput => {}
        }
    }

    fn game_over(&mut self, expected: Color, got: Color, level: u32) {
        log::info!(
            "Game over at level {}: expected {}, got {}",
            level,
            expected,
            got
        );
        self.pattern.clear();
        self.attempt.clear();
        self.level = 0;
        self.phase = GamePhase::GameOver;
        self.timer = GAME_OVER_DURATION;
        self.events.push(GameEvent::Mismatch {
            expected,
            got,
            level,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::ScriptedColors;
    use proptest::prelude::*;

    fn scripted(colors: &[Color]) -> GameSession<ScriptedColors> {
        GameSession::with_source(ScriptedColors::new(colors.iter().copied()))
    }

    fn other(color: Color) -> Color {
        match color {
            Color::Red => Color::Blue,
            _ => Color::Red,
        }
    }

    /// Tick until the session waits for the player
    fn settle<C: ColorSource>(session: &mut GameSession<C>) {
        for _ in 0..1000 {
            if session.is_settled() {
                return;
            }
            session.tick(FRAME_DT);
        }
        panic!("session never settled");
    }

    #[test]
    fn test_start_appends_first_color() {
        let mut session = scripted(&[Color::Red, Color::Green]);
        assert_eq!(session.phase(), GamePhase::Idle);

        assert!(session.start());
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.pattern(), &[Color::Red]);
        assert_eq!(session.level(), 1);

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::Started,
                GameEvent::LevelAdvanced {
                    level: 1,
                    color: Color::Red
                }
            ]
        );
    }

    #[test]
    fn test_start_is_noop_while_running() {
        let mut session = scripted(&[Color::Red, Color::Green]);
        session.start();
        session.submit(Color::Red);
        let pattern = session.pattern().to_vec();

        assert!(!session.start());
        assert_eq!(session.pattern(), pattern.as_slice());
        assert_eq!(session.level(), 2);
    }

    #[test]
    fn test_example_round_then_mismatch() {
        let mut session = scripted(&[Color::Red, Color::Yellow]);
        session.start();
        assert_eq!(session.pattern(), &[Color::Red]);

        assert_eq!(session.submit(Color::Red), Submission::RoundComplete);
        assert_eq!(session.pattern(), &[Color::Red, Color::Yellow]);
        assert_eq!(session.level(), 2);
        assert!(session.attempt().is_empty());

        assert_eq!(session.submit(Color::Blue), Submission::Mismatch);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(session.pattern().is_empty());
        assert!(session.attempt().is_empty());
        assert_eq!(session.level(), 0);
        assert_eq!(session.best_level(), 2);
    }

    #[test]
    fn test_phase_timeline() {
        let mut session = scripted(&[Color::Green]);
        session.start();
        session.drain_events().for_each(drop);

        // Still in the start delay
        session.tick(START_DELAY / 2.0);
        assert_eq!(session.phase(), GamePhase::Playing);

        session.tick(START_DELAY);
        assert_eq!(session.phase(), GamePhase::ShowingSequence);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![GameEvent::Flash {
                level: 1,
                color: Color::Green
            }]
        );

        session.tick(FLASH_DURATION + 0.01);
        assert_eq!(session.phase(), GamePhase::AwaitingInput);
        assert!(session.is_settled());
    }

    #[test]
    fn test_game_over_returns_to_idle() {
        let mut session = scripted(&[Color::Red]);
        session.start();
        session.submit(Color::Blue);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(!session.is_settled());

        session.tick(GAME_OVER_DURATION + 0.01);
        assert_eq!(session.phase(), GamePhase::Idle);
        assert!(session.drain_events().any(|e| e == GameEvent::Reset));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut session = scripted(&[Color::Red, Color::Blue]);
        session.start();
        session.submit(Color::Yellow);
        assert_eq!(session.phase(), GamePhase::GameOver);

        assert!(session.start());
        assert_eq!(session.level(), 1);
        assert_eq!(session.pattern().len(), 1);
    }

    #[test]
    fn test_press_ignored_when_idle() {
        let mut session = scripted(&[Color::Red]);
        assert_eq!(session.submit(Color::Red), Submission::Ignored);
        assert!(session.attempt().is_empty());
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn test_press_ignored_during_game_over() {
        let mut session = scripted(&[Color::Red, Color::Blue]);
        session.start();
        settle(&mut session);
        assert_eq!(session.submit(Color::Green), Submission::Mismatch);
        session.drain_events().for_each(drop);

        assert_eq!(session.submit(Color::Red), Submission::Ignored);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(session.pattern().is_empty());
        assert!(session.attempt().is_empty());
        assert_eq!(session.level(), 0);
        assert_eq!(session.drain_events().count(), 0);

        session.tick(GAME_OVER_DURATION * 0.5);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.submit(Color::Blue), Submission::Ignored);
        session.tick(GAME_OVER_DURATION);
        assert_eq!(session.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_unknown_token_does_not_mutate() {
        let mut session = scripted(&[Color::Red, Color::Blue]);
        session.start();
        settle(&mut session);
        session.drain_events().for_each(drop);

        assert_eq!(session.submit_name("magenta"), Submission::Ignored);
        assert!(session.attempt().is_empty());
        assert_eq!(session.phase(), GamePhase::AwaitingInput);
        assert_eq!(session.drain_events().count(), 0);

        assert_eq!(session.submit_name("RED"), Submission::RoundComplete);
    }

    #[test]
    fn test_early_press_skips_flash() {
        let mut session = scripted(&[Color::Red, Color::Blue, Color::Green]);
        session.start();
        session.submit(Color::Red);
        assert_eq!(session.phase(), GamePhase::Playing);

        assert_eq!(session.submit(Color::Red), Submission::Correct);
        assert_eq!(session.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn test_apply_routes_inputs() {
        let mut session = scripted(&[Color::Yellow, Color::Red]);
        assert_eq!(session.apply(GameInput::Start), Submission::Correct);
        assert_eq!(session.apply(GameInput::Start), Submission::Ignored);
        assert_eq!(
            session.apply(GameInput::Press(Color::Yellow)),
            Submission::RoundComplete
        );
    }

    #[test]
    fn test_seeded_sessions_match() {
        let mut a = GameSession::new(1234);
        let mut b = GameSession::new(1234);
        a.start();
        b.start();
        for _ in 0..10 {
            let next = a.pattern().to_vec();
            for color in next {
                a.submit(color);
                b.submit(color);
            }
        }
        assert_eq!(a.pattern(), b.pattern());
        assert_eq!(a.level(), 11);
    }

    proptest! {
        #[test]
        fn prop_rounds_grow_pattern(seed in any::<u64>(), rounds in 0usize..20) {
            let mut session = GameSession::new(seed);
            session.start();
            for _ in 0..rounds {
                let target = session.pattern().to_vec();
                for color in target {
                    prop_assert_ne!(session.submit(color), Submission::Mismatch);
                }
            }
            prop_assert_eq!(session.level() as usize, rounds + 1);
            prop_assert_eq!(session.pattern().len(), session.level() as usize);
            prop_assert!(session.is_started());
        }

        #[test]
        fn prop_mismatch_resets(seed in any::<u64>(), rounds in 1usize..10, fail_at in 0usize..10) {
            let mut session = GameSession::new(seed);
            session.start();
            for _ in 0..rounds - 1 {
                let target = session.pattern().to_vec();
                for color in target {
                    session.submit(color);
                }
            }
            let target = session.pattern().to_vec();
            let fail_at = fail_at % target.len();
            for color in &target[..fail_at] {
                session.submit(*color);
            }

            let level_before = session.level();
            prop_assert_eq!(session.submit(other(target[fail_at])), Submission::Mismatch);
            prop_assert_eq!(session.phase(), GamePhase::GameOver);
            prop_assert!(session.pattern().is_empty());
            prop_assert!(session.attempt().is_empty());
            prop_assert_eq!(session.level(), 0);
            let mismatch = session
                .drain_events()
                .find(|e| matches!(e, GameEvent::Mismatch { .. }));
            prop_assert_eq!(
                mismatch,
                Some(GameEvent::Mismatch {
                    expected: target[fail_at],
                    got: other(target[fail_at]),
                    level: level_before,
                })
            );
        }
    }
}
