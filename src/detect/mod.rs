//! Hand detection seam.
//!
//! The detector stays a black box behind [`HandDetector`]: the bridge
//! runs a MediaPipe child process, and [`NullDetector`] stands in when no
//! detector is configured (the rover then just sits in Stop).

pub mod bridge;

use thiserror::Error;

use crate::camera::RgbFrame;
use crate::hand::LandmarkSet;

pub use bridge::MediaPipeBridge;

// ── Errors ─────────────────────────────────────────────────

/// Errors from a hand detector.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("detector process: {0}")]
    Io(#[from] std::io::Error),
    #[error("detector protocol: {0}")]
    Protocol(String),
}

// ── Detector trait ─────────────────────────────────────────

/// One detected hand in frame pixel coordinates.
#[derive(Debug, Clone)]
pub struct DetectedHand {
    pub landmarks: LandmarkSet,
    pub confidence: f32,
}

/// Produces hand landmarks from frames.
pub trait HandDetector: Send {
    /// Detect the most confident hand, if any. An absent hand is the
    /// normal case, not an error.
    fn detect(&mut self, frame: &RgbFrame) -> Result<Option<DetectedHand>, DetectError>;
}

/// Detector that never sees a hand.
pub struct NullDetector;

impl HandDetector for NullDetector {
    fn detect(&mut self, _frame: &RgbFrame) -> Result<Option<DetectedHand>, DetectError> {
        Ok(None)
    }
}
