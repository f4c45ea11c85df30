//! Controller facade over the gesture worker thread.
//!
//! Owns the worker's lifecycle: start spawns the thread with its devices,
//! stop flags it down and joins. Reads go through [`SharedState`]
//! snapshots and never block on the worker.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{error, info};

use crate::camera::FrameSource;
use crate::detect::HandDetector;
use crate::drive::{CommandLink, CommandRelay};
use crate::state::{SharedState, Status};
use crate::worker::{GestureWorker, WorkerConfig};

/// Handle to a running gesture worker.
pub struct Controller {
    shared: Arc<SharedState>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Controller {
    /// Spawn the worker thread owning the given devices.
    ///
    /// The worker keeps exclusive ownership of camera, detector, and
    /// link until `stop`; a fatal worker error is recorded as a fault
    /// instead of tearing down the process.
    pub fn start(
        camera: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        link: Box<dyn CommandLink>,
        config: WorkerConfig,
    ) -> io::Result<Self> {
        let shared = Arc::new(SharedState::new());
        let stop = Arc::new(AtomicBool::new(false));

        let worker_shared = Arc::clone(&shared);
        let worker_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("gesture-worker".into())
            .spawn(move || {
                let mut worker = GestureWorker::new(
                    camera,
                    detector,
                    CommandRelay::new(link),
                    Arc::clone(&worker_shared),
                    config,
                );
                if let Err(e) = worker.run(&worker_stop) {
                    error!(error = %e, "gesture worker died");
                    worker_shared.set_fault(e.to_string());
                }
            })?;

        Ok(Self {
            shared,
            stop,
            worker: Some(handle),
        })
    }

    /// Latest published frame, or None before the first capture.
    #[allow(dead_code)]
    pub fn latest_frame(&self) -> Option<Arc<Vec<u8>>> {
        self.shared.latest_frame()
    }

    /// Point-in-time status snapshot.
    pub fn status(&self) -> Status {
        self.shared.status()
    }

    /// Why the worker died, if it has.
    pub fn fault(&self) -> Option<String> {
        self.shared.fault()
    }

    /// Shared state handle for the HTTP layer.
    pub fn shared(&self) -> Arc<SharedState> {
        Arc::clone(&self.shared)
    }

    /// Stop the worker and wait for its current cycle to finish.
    ///
    /// Devices close when the worker drops them. Safe to call twice.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("gesture worker panicked");
            } else {
                info!("gesture worker stopped");
            }
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
use std::time::{Duration, Instant};

#[cfg(test)]
use crate::camera::{synthetic::SyntheticCamera, RgbFrame};
#[cfg(test)]
use crate::detect::{DetectError, DetectedHand, NullDetector};
#[cfg(test)]
use crate::drive::{LinkError, LogLink};
#[cfg(test)]
use crate::hand::{HandLandmark, Handedness, Landmark, LandmarkSet, LANDMARK_COUNT};

/// Poll `check` until it passes or the deadline expires.
#[cfg(test)]
fn wait_for(deadline: Duration, check: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

/// Detector that always sees a right hand with one raised finger.
#[cfg(test)]
fn one_finger_detector() -> Box<dyn HandDetector> {
    struct OneFinger;

    impl HandDetector for OneFinger {
        fn detect(&mut self, _frame: &RgbFrame) -> Result<Option<DetectedHand>, DetectError> {
            let mut points = [Landmark::default(); LANDMARK_COUNT];
            points[HandLandmark::IndexPip.index()] = Landmark { x: 140, y: 200 };
            points[HandLandmark::IndexTip.index()] = Landmark { x: 140, y: 140 };
            Ok(Some(DetectedHand {
                landmarks: LandmarkSet::new(points, Handedness::Right),
                confidence: 0.9,
            }))
        }
    }

    Box::new(OneFinger)
}

// ── Tests ──────────────────────────────────────────────────
