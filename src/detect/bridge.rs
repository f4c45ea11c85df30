//! MediaPipe subprocess bridge.
//!
//! Frames go to the child over stdin as a 12-byte little-endian header
//! (width, height, channels) followed by the raw RGB bytes; the child
//! answers with one JSON line per frame listing detected hands with
//! normalized landmark coordinates. A `READY` line on startup confirms
//! the model loaded before the first frame is sent.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdout, Command, Stdio};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::camera::RgbFrame;
use crate::hand::{Handedness, Landmark, LandmarkSet};

use super::{DetectError, DetectedHand, HandDetector};

/// Minimum score for a hand to count as detected.
const MIN_CONFIDENCE: f32 = 0.5;

// ── Wire format ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireLandmark {
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct WireHand {
    handedness: String,
    score: f32,
    landmarks: Vec<WireLandmark>,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    hands: Vec<WireHand>,
    #[serde(default)]
    error: Option<String>,
}

// ── Bridge ─────────────────────────────────────────────────

/// Hand detector running as a child process.
pub struct MediaPipeBridge {
    child: Child,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
}

impl MediaPipeBridge {
    /// Spawn `command` (program plus arguments, whitespace separated) and
    /// wait for its READY handshake.
    pub fn spawn(command: &str) -> Result<Self, DetectError> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| DetectError::Protocol("empty detector command".into()))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DetectError::Protocol("detector stdout unavailable".into()))?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout.read_line(&mut ready)?;
        if ready.trim() != "READY" {
            return Err(DetectError::Protocol(format!(
                "expected READY handshake, got {:?}",
                ready.trim(),
            )));
        }

        info!(command, "hand detector ready");
        Ok(Self {
            child,
            stdout,
            min_confidence: MIN_CONFIDENCE,
        })
    }
}

impl HandDetector for MediaPipeBridge {
    fn detect(&mut self, frame: &RgbFrame) -> Result<Option<DetectedHand>, DetectError> {
        let stdin = self
            .child
            .stdin
            .as_mut()
            .ok_or_else(|| DetectError::Protocol("detector stdin unavailable".into()))?;

        stdin.write_all(&frame.width.to_le_bytes())?;
        stdin.write_all(&frame.height.to_le_bytes())?;
        stdin.write_all(&3u32.to_le_bytes())?;
        stdin.write_all(&frame.data)?;
        stdin.flush()?;

        let mut line = String::new();
        self.stdout.read_line(&mut line)?;
        parse_reply(&line, frame.width, frame.height, self.min_confidence)
    }
}

impl Drop for MediaPipeBridge {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Parse one reply line into the first usable hand.
fn parse_reply(
    line: &str,
    width: u32,
    height: u32,
    min_confidence: f32,
) -> Result<Option<DetectedHand>, DetectError> {
    let reply: WireReply =
        serde_json::from_str(line).map_err(|e| DetectError::Protocol(format!("bad reply: {e}")))?;

    if let Some(error) = reply.error {
        warn!(error, "detector reported an error");
        return Ok(None);
    }

    for hand in reply.hands {
        if hand.score < min_confidence {
            debug!(score = hand.score, "hand below confidence threshold");
            continue;
        }
        let handedness = match Handedness::parse(&hand.handedness) {
            Some(h) => h,
            None => {
                warn!(label = %hand.handedness, "unknown handedness label");
                continue;
            }
        };

        // Landmarks arrive normalized to [0, 1]; scale into pixel space.
        // Out-of-range detector output clamps to the frame bounds.
        let max_x = width.saturating_sub(1) as f32;
        let max_y = height.saturating_sub(1) as f32;
        let points: Vec<Landmark> = hand
            .landmarks
            .iter()
            .map(|wire| Landmark {
                x: (wire.x * width as f32).clamp(0.0, max_x) as i32,
                y: (wire.y * height as f32).clamp(0.0, max_y) as i32,
            })
            .collect();
        let landmarks = match LandmarkSet::from_slice(&points, handedness) {
            Some(set) => set,
            None => {
                warn!(count = points.len(), "hand with wrong landmark count");
                continue;
            }
        };

        return Ok(Some(DetectedHand {
            landmarks,
            confidence: hand.score,
        }));
    }

    Ok(None)
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
use crate::hand::LANDMARK_COUNT;

/// Build a reply line with one hand of the given score and landmark count.
#[cfg(test)]
fn reply_line(handedness: &str, score: f32, landmark_count: usize) -> String {
    let landmarks: Vec<serde_json::Value> = (0..landmark_count)
        .map(|i| {
            let t = i as f32 / 20.0;
            serde_json::json!({ "x": t, "y": 1.0 - t, "z": 0.0 })
        })
        .collect();
    serde_json::json!({
        "hands": [{ "handedness": handedness, "score": score, "landmarks": landmarks }]
    })
    .to_string()
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandLandmark;

    #[test]
    fn test_parse_valid_hand() {
        let line = reply_line("Right", 0.9, LANDMARK_COUNT);
        let hand = parse_reply(&line, 640, 480, 0.5).unwrap().unwrap();

        assert_eq!(hand.landmarks.handedness(), Handedness::Right);
        assert!((hand.confidence - 0.9).abs() < f32::EPSILON);

        // Wrist is (0.0, 1.0) normalized -> the bottom-left pixel.
        let wrist = hand.landmarks.point(HandLandmark::Wrist);
        assert_eq!(wrist, Landmark { x: 0, y: 479 });
        // Pinky tip is (1.0, 0.0) normalized -> the top-right pixel.
        let pinky = hand.landmarks.point(HandLandmark::PinkyTip);
        assert_eq!(pinky, Landmark { x: 639, y: 0 });
    }

    #[test]
    fn test_parse_rejects_wrong_landmark_count() {
        let line = reply_line("Left", 0.9, 10);
        assert!(parse_reply(&line, 640, 480, 0.5).unwrap().is_none());

        let line = reply_line("Left", 0.9, 22);
        assert!(parse_reply(&line, 640, 480, 0.5).unwrap().is_none());
    }

    #[test]
    fn test_parse_clamps_out_of_range_coordinates() {
        let landmarks: Vec<serde_json::Value> = (0..LANDMARK_COUNT)
            .map(|_| serde_json::json!({ "x": 1.0e9, "y": -5.0, "z": 0.0 }))
            .collect();
        let line = serde_json::json!({
            "hands": [{ "handedness": "Right", "score": 0.9, "landmarks": landmarks }]
        })
        .to_string();

        let hand = parse_reply(&line, 640, 480, 0.5).unwrap().unwrap();
        for &point in hand.landmarks.points() {
            assert_eq!(point, Landmark { x: 639, y: 0 });
        }
    }

    #[test]
    fn test_parse_rejects_low_confidence() {
        let line = reply_line("Left", 0.3, LANDMARK_COUNT);
        assert!(parse_reply(&line, 640, 480, 0.5).unwrap().is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_handedness() {
        let line = reply_line("Ambidextrous", 0.9, LANDMARK_COUNT);
        assert!(parse_reply(&line, 640, 480, 0.5).unwrap().is_none());
    }

    #[test]
    fn test_parse_no_hands() {
        let reply = parse_reply(r#"{"hands": []}"#, 640, 480, 0.5).unwrap();
        assert!(reply.is_none());
    }

    #[test]
    fn test_parse_detector_error_is_absent_hand() {
        let line = r#"{"hands": [], "error": "model not loaded"}"#;
        assert!(parse_reply(line, 640, 480, 0.5).unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_json_is_protocol_error() {
        assert!(parse_reply("not json", 640, 480, 0.5).is_err());
        assert!(parse_reply("", 640, 480, 0.5).is_err());
    }

    #[test]
    fn test_parse_skips_to_first_confident_hand() {
        let landmarks: Vec<serde_json::Value> = (0..LANDMARK_COUNT)
            .map(|_| serde_json::json!({ "x": 0.5, "y": 0.5, "z": 0.0 }))
            .collect();
        let line = serde_json::json!({
            "hands": [
                { "handedness": "Left", "score": 0.2, "landmarks": landmarks.clone() },
                { "handedness": "Right", "score": 0.8, "landmarks": landmarks },
            ]
        })
        .to_string();

        let hand = parse_reply(&line, 100, 100, 0.5).unwrap().unwrap();
        assert_eq!(hand.landmarks.handedness(), Handedness::Right);
    }
}
