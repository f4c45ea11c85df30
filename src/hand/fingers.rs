//! Finger extension classification.
//!
//! Decides which fingers are raised from landmark geometry alone. The
//! thumb folds across the palm, so its test runs on the x axis and flips
//! with handedness; the other four fingers are compared tip against PIP
//! on the y axis (image y grows downward).

use super::landmark::{HandLandmark, Handedness, LandmarkSet};

// ── Finger definitions ─────────────────────────────────────

/// The five fingers, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// All fingers in classification order.
pub const FINGERS: [Finger; 5] = [
    Finger::Thumb,
    Finger::Index,
    Finger::Middle,
    Finger::Ring,
    Finger::Pinky,
];

impl Finger {
    /// Fingertip landmark.
    pub fn tip(&self) -> HandLandmark {
        match self {
            Self::Thumb => HandLandmark::ThumbTip,
            Self::Index => HandLandmark::IndexTip,
            Self::Middle => HandLandmark::MiddleTip,
            Self::Ring => HandLandmark::RingTip,
            Self::Pinky => HandLandmark::PinkyTip,
        }
    }

    /// Joint the tip is compared against in the extension test.
    fn reference(&self) -> HandLandmark {
        match self {
            Self::Thumb => HandLandmark::ThumbIp,
            Self::Index => HandLandmark::IndexPip,
            Self::Middle => HandLandmark::MiddlePip,
            Self::Ring => HandLandmark::RingPip,
            Self::Pinky => HandLandmark::PinkyPip,
        }
    }
}

// ── Finger state ───────────────────────────────────────────

/// Per-finger extended flags for one classified hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerState {
    extended: [bool; 5],
}

impl FingerState {
    /// Classify every finger of a detected hand.
    pub fn classify(hand: &LandmarkSet) -> Self {
        let mut extended = [false; 5];
        for (slot, finger) in extended.iter_mut().zip(FINGERS) {
            let tip = hand.point(finger.tip());
            let reference = hand.point(finger.reference());
            *slot = match finger {
                Finger::Thumb => match hand.handedness() {
                    Handedness::Left => tip.x > reference.x,
                    Handedness::Right => tip.x < reference.x,
                },
                _ => tip.y < reference.y,
            };
        }
        Self { extended }
    }

    /// Whether a single finger is raised.
    #[allow(dead_code)]
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.extended[finger as usize]
    }

    /// Number of raised fingers (0-5).
    pub fn count(&self) -> u8 {
        self.extended.iter().filter(|&&e| e).count() as u8
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
use super::landmark::{Landmark, LANDMARK_COUNT};

/// Build a hand with every finger folded for the given handedness.
#[cfg(test)]
fn folded_hand(handedness: Handedness) -> [Landmark; LANDMARK_COUNT] {
    let mut points = [Landmark::default(); LANDMARK_COUNT];
    for finger in FINGERS {
        let column = 100 + 40 * finger as i32;
        points[finger.reference().index()] = Landmark { x: column, y: 200 };
        points[finger.tip().index()] = Landmark { x: column, y: 260 };
    }
    // Fold the thumb across the palm (x test, handedness dependent).
    let thumb_ip = points[HandLandmark::ThumbIp.index()].x;
    points[HandLandmark::ThumbTip.index()].x = match handedness {
        Handedness::Left => thumb_ip - 30,
        Handedness::Right => thumb_ip + 30,
    };
    points
}

/// Raise one finger on an otherwise folded hand.
#[cfg(test)]
fn raise(points: &mut [Landmark; LANDMARK_COUNT], finger: Finger, handedness: Handedness) {
    match finger {
        Finger::Thumb => {
            let thumb_ip = points[HandLandmark::ThumbIp.index()].x;
            points[HandLandmark::ThumbTip.index()].x = match handedness {
                Handedness::Left => thumb_ip + 30,
                Handedness::Right => thumb_ip - 30,
            };
        }
        _ => {
            let reference_y = points[finger.reference().index()].y;
            points[finger.tip().index()].y = reference_y - 60;
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folded_hand_counts_zero() {
        for handedness in [Handedness::Left, Handedness::Right] {
            let set = LandmarkSet::new(folded_hand(handedness), handedness);
            let state = FingerState::classify(&set);
            assert_eq!(state.count(), 0, "folded {:?} hand", handedness);
        }
    }

    #[test]
    fn test_open_hand_counts_five() {
        for handedness in [Handedness::Left, Handedness::Right] {
            let mut points = folded_hand(handedness);
            for finger in FINGERS {
                raise(&mut points, finger, handedness);
            }
            let set = LandmarkSet::new(points, handedness);
            let state = FingerState::classify(&set);
            assert_eq!(state.count(), 5, "open {:?} hand", handedness);
        }
    }

    #[test]
    fn test_single_raised_finger() {
        for handedness in [Handedness::Left, Handedness::Right] {
            for raised in FINGERS {
                let mut points = folded_hand(handedness);
                raise(&mut points, raised, handedness);
                let set = LandmarkSet::new(points, handedness);
                let state = FingerState::classify(&set);

                assert_eq!(state.count(), 1, "{:?} on {:?} hand", raised, handedness);
                for finger in FINGERS {
                    assert_eq!(
                        state.is_extended(finger),
                        finger == raised,
                        "{:?} flag with {:?} raised",
                        finger,
                        raised,
                    );
                }
            }
        }
    }

    #[test]
    fn test_progressive_counts() {
        // Raising fingers one at a time walks the count from 1 to 5.
        let handedness = Handedness::Right;
        let mut points = folded_hand(handedness);
        for (i, finger) in FINGERS.iter().enumerate() {
            raise(&mut points, *finger, handedness);
            let set = LandmarkSet::new(points, handedness);
            assert_eq!(FingerState::classify(&set).count(), i as u8 + 1);
        }
    }

    #[test]
    fn test_thumb_flips_with_handedness() {
        // Identical geometry, only the handedness label differs: the
        // thumb verdict must invert.
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[HandLandmark::ThumbIp.index()] = Landmark { x: 100, y: 200 };
        points[HandLandmark::ThumbTip.index()] = Landmark { x: 130, y: 190 };

        let as_left = LandmarkSet::new(points, Handedness::Left);
        let as_right = LandmarkSet::new(points, Handedness::Right);

        assert!(FingerState::classify(&as_left).is_extended(Finger::Thumb));
        assert!(!FingerState::classify(&as_right).is_extended(Finger::Thumb));
    }

    #[test]
    fn test_other_fingers_ignore_handedness() {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[HandLandmark::IndexPip.index()] = Landmark { x: 140, y: 200 };
        points[HandLandmark::IndexTip.index()] = Landmark { x: 140, y: 140 };

        let as_left = LandmarkSet::new(points, Handedness::Left);
        let as_right = LandmarkSet::new(points, Handedness::Right);

        assert!(FingerState::classify(&as_left).is_extended(Finger::Index));
        assert!(FingerState::classify(&as_right).is_extended(Finger::Index));
    }
}
