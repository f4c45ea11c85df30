//! Hand landmark data structures.
//!
//! Models the 21 landmarks per hand used by the MediaPipe hand convention,
//! in frame pixel coordinates, plus the handedness label the classifier
//! needs for the thumb test.

use tracing::debug;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in MediaPipe index order.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Which hand the detector believes it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse a detector label ("Left"/"Right", any case).
    pub fn parse(s: &str) -> Option<Handedness> {
        match s {
            "Left" | "left" => Some(Handedness::Left),
            "Right" | "right" => Some(Handedness::Right),
            _ => None,
        }
    }
}

// ── Landmark set ───────────────────────────────────────────

/// A single landmark position in frame pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Landmark {
    pub x: i32,
    pub y: i32,
}

/// One detected hand: exactly 21 landmarks plus handedness.
///
/// The fixed-size array makes malformed sets unrepresentable, so
/// downstream indexing by `HandLandmark` never goes out of bounds.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
    handedness: Handedness,
}

impl LandmarkSet {
    /// Build a set from a full array of points.
    pub fn new(points: [Landmark; LANDMARK_COUNT], handedness: Handedness) -> Self {
        Self { points, handedness }
    }

    /// Build a set from a slice, rejecting anything but exactly 21 points.
    pub fn from_slice(points: &[Landmark], handedness: Handedness) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            debug!(
                "landmark set: expected {} points, got {}",
                LANDMARK_COUNT,
                points.len(),
            );
            return None;
        }
        let mut fixed = [Landmark::default(); LANDMARK_COUNT];
        fixed.copy_from_slice(points);
        Some(Self::new(fixed, handedness))
    }

    /// Position of a single landmark.
    pub fn point(&self, landmark: HandLandmark) -> Landmark {
        self.points[landmark.index()]
    }

    /// All landmark positions in index order.
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::MiddleTip.index(), 12);
        assert_eq!(HandLandmark::RingTip.index(), 16);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
        assert_eq!(LANDMARK_COUNT, 21);
    }

    #[test]
    fn test_from_slice_rejects_wrong_count() {
        let short = vec![Landmark::default(); 10];
        assert!(LandmarkSet::from_slice(&short, Handedness::Left).is_none());

        let long = vec![Landmark::default(); 22];
        assert!(LandmarkSet::from_slice(&long, Handedness::Left).is_none());
    }

    #[test]
    fn test_from_slice_valid() {
        let mut points = vec![Landmark::default(); LANDMARK_COUNT];
        points[HandLandmark::IndexTip.index()] = Landmark { x: 320, y: 120 };

        let set = LandmarkSet::from_slice(&points, Handedness::Right).unwrap();
        assert_eq!(set.point(HandLandmark::IndexTip), Landmark { x: 320, y: 120 });
        assert_eq!(set.point(HandLandmark::Wrist), Landmark { x: 0, y: 0 });
        assert_eq!(set.handedness(), Handedness::Right);
    }

    #[test]
    fn test_handedness_parse() {
        assert_eq!(Handedness::parse("Left"), Some(Handedness::Left));
        assert_eq!(Handedness::parse("right"), Some(Handedness::Right));
        assert_eq!(Handedness::parse("both"), None);
        assert_eq!(Handedness::parse(""), None);
    }
}
