//! Hand gesture classification
//!
//! An external hand-pose detector reports 21 keypoints per frame, normalized
//! to the video frame (`[0, 1]` on both axes). Finger states are derived
//! from tip/joint heights and matched against an ordered
//! rule table; the first matching rule wins. [`GestureGate`] lets at most one
//! gesture through per cooldown window.

use glam::Vec2;
use thiserror::Error;

use crate::consts::GESTURE_COOLDOWN_MS;

/// Keypoints per hand (MediaPipe layout)
pub const KEYPOINT_COUNT: usize = 21;

/// A finger tip must sit this far above its middle joint to count as extended,
/// as a fraction of frame height (20px of a 150px detector feed)
pub const EXTENDED_MARGIN: f32 = 20.0 / 150.0;

const THUMB_MCP: usize = 2;
const THUMB_TIP: usize = 4;
const INDEX_PIP: usize = 6;
/// Index finger tip, also used as the on-screen cursor
pub const INDEX_TIP: usize = 8;
const MIDDLE_PIP: usize = 10;
const MIDDLE_TIP: usize = 12;
const RING_PIP: usize = 14;
const RING_TIP: usize = 16;
const PINKY_PIP: usize = 18;
const PINKY_TIP: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("expected {expected} coordinates, got {got}")]
    WrongLength { expected: usize, got: usize },
}

/// One detected hand in normalized frame coordinates, y grows downward
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    keypoints: [Vec2; KEYPOINT_COUNT],
}

impl HandPose {
    pub fn new(keypoints: [Vec2; KEYPOINT_COUNT]) -> Self {
        Self { keypoints }
    }

    /// Build from interleaved `[x0, y0, x1, y1, ...]`
    pub fn from_flat(coords: &[f32]) -> Result<Self, GestureError> {
        if coords.len() != KEYPOINT_COUNT * 2 {
            return Err(GestureError::WrongLength {
                expected: KEYPOINT_COUNT * 2,
                got: coords.len(),
            });
        }
        let mut keypoints = [Vec2::ZERO; KEYPOINT_COUNT];
        for (kp, xy) in keypoints.iter_mut().zip(coords.chunks_exact(2)) {
            *kp = Vec2::new(xy[0], xy[1]);
        }
        Ok(Self { keypoints })
    }

    pub fn index_tip(&self) -> Vec2 {
        self.keypoints[INDEX_TIP]
    }

    pub fn fingers(&self) -> FingerStates {
        let extended = |tip: usize, pip: usize| {
            self.keypoints[tip].y < self.keypoints[pip].y - EXTENDED_MARGIN
        };
        FingerStates {
            thumb: self.keypoints[THUMB_TIP].y < self.keypoints[THUMB_MCP].y,
            index: extended(INDEX_TIP, INDEX_PIP),
            middle: extended(MIDDLE_TIP, MIDDLE_PIP),
            ring: extended(RING_TIP, RING_PIP),
            pinky: extended(PINKY_TIP, PINKY_PIP),
        }
    }
}

/// Which fingers are up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    fn is(&self, thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> bool {
        *self
            == FingerStates {
                thumb,
                index,
                middle,
                ring,
                pinky,
            }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Peace,
    OpenHand,
    ThumbsUp,
    Fist,
    Point,
}

/// What a gesture asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Start,
    Stop,
    Celebrate,
    Cheer,
    Point,
}

impl Gesture {
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Peace => "PEACE ✌️ - START!",
            Gesture::OpenHand => "STOP ✋",
            Gesture::ThumbsUp => "THUMBS UP 👍",
            Gesture::Fist => "FIST 👊",
            Gesture::Point => "POINT 👉",
        }
    }

    pub fn action(&self) -> GestureAction {
        match self {
            Gesture::Peace => GestureAction::Start,
            Gesture::OpenHand => GestureAction::Stop,
            Gesture::ThumbsUp => GestureAction::Celebrate,
            Gesture::Fist => GestureAction::Cheer,
            Gesture::Point => GestureAction::Point,
        }
    }
}

/// Named predicate over finger states
pub struct Rule {
    pub gesture: Gesture,
    pub matches: fn(&FingerStates) -> bool,
}

/// Evaluated top to bottom, first match wins
pub const RULES: &[Rule] = &[
    Rule {
        gesture: Gesture::Peace,
        matches: |f| f.is(false, true, true, false, false),
    },
    Rule {
        gesture: Gesture::OpenHand,
        matches: |f| f.is(true, true, true, true, true),
    },
    Rule {
        gesture: Gesture::ThumbsUp,
        matches: |f| f.is(true, false, false, false, false),
    },
    Rule {
        gesture: Gesture::Fist,
        matches: |f| f.is(false, false, false, false, false),
    },
    Rule {
        gesture: Gesture::Point,
        matches: |f| f.is(false, true, false, false, false),
    },
];

pub fn classify_fingers(fingers: &FingerStates) -> Option<Gesture> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(fingers))
        .map(|rule| rule.gesture)
}

pub fn classify(pose: &HandPose) -> Option<Gesture> {
    classify_fingers(&pose.fingers())
}

/// Lets one gesture through per cooldown window
#[derive(Debug, Clone)]
pub struct GestureGate {
    cooldown_ms: f64,
    last_ms: Option<f64>,
}

impl Default for GestureGate {
    fn default() -> Self {
        Self::new(GESTURE_COOLDOWN_MS)
    }
}

impl GestureGate {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            last_ms: None,
        }
    }

    /// Classify `pose` at time `now_ms`; None if unrecognized or still cooling down
    pub fn accept(&mut self, pose: &HandPose, now_ms: f64) -> Option<Gesture> {
        let gesture = classify(pose)?;
        if let Some(last) = self.last_ms {
            if now_ms - last <= self.cooldown_ms {
                return None;
            }
        }
        self.last_ms = Some(now_ms);
        log::debug!("Gesture {:?} at {}ms", gesture, now_ms);
        Some(gesture)
    }

    /// Forget the last accepted gesture so a returning hand is read at once
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
