//! Audio system using Web Audio API
//!
//! Procedurally generated cartoon beeps - no external files needed!
//! The beep tables are plain data; playback exists only on wasm.

use crate::sim::Color;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Button boop (played on press and on flash)
    Tone(Color),
    /// Wrong press buzzer
    Wrong,
    /// Level up fanfare
    Fanfare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// One oscillator burst with an exponential frequency sweep and gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beep {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds
    pub duration: f64,
    /// Seconds after the effect is triggered
    pub delay: f64,
    /// Peak gain before master volume
    pub gain: f32,
}

const BOOP_DURATION: f64 = 0.25;
const BOOP_GAIN: f32 = 0.1;
const FANFARE_GAIN: f32 = 0.08;

impl Color {
    /// Sweep range of this button's boop (Hz)
    pub fn tone(&self) -> (f32, f32) {
        match self {
            Color::Red => (400.0, 600.0),
            Color::Green => (600.0, 800.0),
            Color::Blue => (800.0, 1000.0),
            Color::Yellow => (1000.0, 1200.0),
        }
    }
}

fn square(start_hz: f32, end_hz: f32, duration: f64, delay: f64) -> Beep {
    Beep {
        waveform: Waveform::Square,
        start_hz,
        end_hz,
        duration,
        delay,
        gain: BOOP_GAIN,
    }
}

fn note(hz: f32, duration: f64, delay: f64) -> Beep {
    Beep {
        waveform: Waveform::Sine,
        start_hz: hz,
        end_hz: hz,
        duration,
        delay,
        gain: FANFARE_GAIN,
    }
}

impl SoundEffect {
    pub fn beeps(&self) -> Vec<Beep> {
        match self {
            SoundEffect::Tone(color) => {
                let (lo, hi) = color.tone();
                vec![
                    square(lo, hi, BOOP_DURATION, 0.0),
                    // Reversed echo
                    square(hi, lo, BOOP_DURATION * 0.6, BOOP_DURATION * 0.1),
                ]
            }
            SoundEffect::Wrong => vec![
                square(1200.0, 200.0, 0.4, 0.0),
                square(150.0, 100.0, 0.3, 0.25),
            ],
            // C major arpeggio
            SoundEffect::Fanfare => vec![
                note(523.0, 0.15, 0.0),
                note(659.0, 0.15, 0.1),
                note(784.0, 0.15, 0.2),
                note(1047.0, 0.3, 0.3),
            ],
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Beep, SoundEffect, Waveform};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Master volume with mute already applied
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self {
                ctx: None,
                volume: 0.8,
            }
        }

        /// Create or resume the context (browsers require a user gesture first)
        pub fn resume(&mut self) {
            if self.ctx.is_none() {
                self.ctx = AudioContext::new().ok();
                if self.ctx.is_none() {
                    log::warn!("Failed to create AudioContext - audio disabled");
                }
            }
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// Set output volume (0.0 - 1.0), see `Settings::effective_volume`
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Play a sound effect
        pub fn play(&mut self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            self.resume();
            let Some(ctx) = &self.ctx else { return };

            for beep in effect.beeps() {
                play_beep(ctx, &beep, vol);
            }
        }
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_beep(ctx: &AudioContext, beep: &Beep, vol: f32) {
        let osc_type = match beep.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
        };
        let Some((osc, gain)) = create_osc(ctx, beep.start_hz, osc_type) else {
            return;
        };
        let t = ctx.current_time() + beep.delay;
        let end = t + beep.duration;

        gain.gain().set_value_at_time(beep.gain * vol, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        osc.frequency().set_value_at_time(beep.start_hz, t).ok();
        if beep.end_hz != beep.start_hz {
            osc.frequency()
                .exponential_ramp_to_value_at_time(beep.end_hz, end)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end).ok();
    }
}
