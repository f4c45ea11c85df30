//! The gesture worker loop.
//!
//! One background thread owns the camera, the detector, and the rover
//! link, and drives the capture, classify, transmit, publish cycle.
//! Readers only ever touch [`SharedState`] snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::camera::FrameSource;
use crate::detect::HandDetector;
use crate::drive::{CommandRelay, DriveCommand, LinkError};
use crate::hand::FingerState;
use crate::overlay;
use crate::state::SharedState;

/// Delay before retrying after a failed capture, so a missing device
/// does not spin the loop.
const CAPTURE_RETRY_DELAY: Duration = Duration::from_millis(100);

// ── Configuration ──────────────────────────────────────────

/// Worker tuning knobs.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// JPEG quality for published frames (1-100).
    pub jpeg_quality: u8,
    /// Interval between periodic status log lines.
    pub status_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            status_interval: Duration::from_secs(60),
        }
    }
}

// ── Errors ─────────────────────────────────────────────────

/// Fatal worker errors. Everything else is contained per cycle.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("rover link failed: {0}")]
    Link(#[from] LinkError),
}

// ── Worker ─────────────────────────────────────────────────

/// Owns the capture devices and runs the gesture cycle.
pub struct GestureWorker {
    camera: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    relay: CommandRelay,
    shared: Arc<SharedState>,
    config: WorkerConfig,
    frames: u64,
    camera_ok: bool,
}

impl GestureWorker {
    pub fn new(
        camera: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        relay: CommandRelay,
        shared: Arc<SharedState>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            camera,
            detector,
            relay,
            shared,
            config,
            frames: 0,
            camera_ok: true,
        }
    }

    /// One full cycle: capture, classify, transmit, annotate, publish.
    ///
    /// Capture and detection failures are contained here and the previous
    /// frame stays published; only a link failure propagates.
    pub fn step(&mut self) -> Result<(), WorkerError> {
        let mut frame = match self.camera.grab() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(()),
            Err(e) => {
                // Log the edge, not every failed cycle.
                if self.camera_ok {
                    warn!(error = %e, "camera capture failed");
                    self.camera_ok = false;
                }
                std::thread::sleep(CAPTURE_RETRY_DELAY);
                return Ok(());
            }
        };
        if !self.camera_ok {
            info!("camera capture recovered");
            self.camera_ok = true;
        }

        let detected = match self.detector.detect(&frame) {
            Ok(detected) => detected,
            Err(e) => {
                debug!(error = %e, "hand detection failed");
                None
            }
        };

        let fingers = match &detected {
            Some(hand) => {
                let count = FingerState::classify(&hand.landmarks).count();
                debug!(fingers = count, confidence = hand.confidence, "hand classified");
                count
            }
            None => 0,
        };
        let command = DriveCommand::from_finger_count(fingers);

        if self.relay.offer(command)? {
            info!(command = ?command, fingers, "command transmitted");
            self.shared.record_command(command);
        }

        if let Some(hand) = &detected {
            overlay::draw_landmarks(&mut frame, &hand.landmarks);
        }
        overlay::draw_hud(&mut frame, fingers, self.relay.last_sent());

        match overlay::encode_jpeg(&frame, self.config.jpeg_quality) {
            Ok(jpeg) => self.shared.publish_frame(jpeg),
            Err(e) => warn!(error = %e, "jpeg encode failed"),
        }
        self.frames += 1;
        Ok(())
    }

    /// Run cycles until `stop` is set or the link fails.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), WorkerError> {
        let mut last_report = Instant::now();
        while !stop.load(Ordering::Relaxed) {
            self.step()?;
            if last_report.elapsed() >= self.config.status_interval {
                info!(
                    frames = self.frames,
                    command = self.relay.last_sent().as_str(),
                    "worker status"
                );
                last_report = Instant::now();
            }
        }
        info!(frames = self.frames, "worker stopped");
        Ok(())
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use crate::camera::{synthetic::SyntheticCamera, CameraError, RgbFrame};
#[cfg(test)]
use crate::detect::{DetectError, DetectedHand};
#[cfg(test)]
use crate::drive::CommandLink;
#[cfg(test)]
use crate::hand::{HandLandmark, Handedness, Landmark, LandmarkSet, LANDMARK_COUNT};

/// Build a right-hand detection with exactly `count` raised fingers.
#[cfg(test)]
fn hand_with_count(count: u8) -> DetectedHand {
    let joints = [
        (HandLandmark::ThumbIp, HandLandmark::ThumbTip),
        (HandLandmark::IndexPip, HandLandmark::IndexTip),
        (HandLandmark::MiddlePip, HandLandmark::MiddleTip),
        (HandLandmark::RingPip, HandLandmark::RingTip),
        (HandLandmark::PinkyPip, HandLandmark::PinkyTip),
    ];

    // Folded baseline: tips below their reference joints, thumb tucked
    // across a right palm.
    let mut points = [Landmark::default(); LANDMARK_COUNT];
    for (i, (reference, tip)) in joints.iter().enumerate() {
        let column = 100 + 40 * i as i32;
        points[reference.index()] = Landmark { x: column, y: 200 };
        points[tip.index()] = Landmark { x: column, y: 260 };
    }
    points[HandLandmark::ThumbTip.index()].x = points[HandLandmark::ThumbIp.index()].x + 30;

    // Raise fingers index first, thumb last.
    for &i in [1usize, 2, 3, 4, 0].iter().take(count as usize) {
        let (reference, tip) = joints[i];
        if i == 0 {
            points[tip.index()].x = points[reference.index()].x - 30;
        } else {
            points[tip.index()].y = points[reference.index()].y - 60;
        }
    }

    DetectedHand {
        landmarks: LandmarkSet::new(points, Handedness::Right),
        confidence: 0.9,
    }
}

/// Detector that replays a fixed per-frame script, then reports no hand.
#[cfg(test)]
struct ScriptedDetector {
    script: VecDeque<Option<u8>>,
}

#[cfg(test)]
impl ScriptedDetector {
    fn new(counts: &[Option<u8>]) -> Self {
        Self {
            script: counts.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &RgbFrame) -> Result<Option<DetectedHand>, DetectError> {
        match self.script.pop_front() {
            Some(Some(count)) => Ok(Some(hand_with_count(count))),
            _ => Ok(None),
        }
    }
}

/// Link that records every transmitted byte.
#[cfg(test)]
fn recording_link() -> (Box<dyn CommandLink>, Arc<Mutex<Vec<u8>>>) {
    struct Recording(Arc<Mutex<Vec<u8>>>);

    impl CommandLink for Recording {
        fn send(&mut self, byte: u8) -> Result<(), LinkError> {
            self.0.lock().unwrap().push(byte);
            Ok(())
        }
    }

    let sent = Arc::new(Mutex::new(Vec::new()));
    (Box::new(Recording(sent.clone())), sent)
}

/// Camera whose every capture fails.
#[cfg(test)]
struct FailingCamera;

#[cfg(test)]
impl FrameSource for FailingCamera {
    fn grab(&mut self) -> Result<Option<RgbFrame>, CameraError> {
        Err(CameraError::Capture(std::io::Error::new(
            std::io::ErrorKind::Other,
            "device disappeared",
        )))
    }

    fn resolution(&self) -> (u32, u32) {
        (640, 480)
    }
}

#[cfg(test)]
fn test_worker(
    detector: ScriptedDetector,
    link: Box<dyn CommandLink>,
) -> (GestureWorker, Arc<SharedState>) {
    let shared = Arc::new(SharedState::new());
    let camera = SyntheticCamera::with_interval(64, 48, Duration::ZERO);
    let worker = GestureWorker::new(
        Box::new(camera),
        Box::new(detector),
        CommandRelay::new(link),
        Arc::clone(&shared),
        WorkerConfig::default(),
    );
    (worker, shared)
}

// ── Tests ──────────────────────────────────────────────────
