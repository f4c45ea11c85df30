//! Shared state between the gesture worker and HTTP readers.
//!
//! Single-writer, multiple-reader: only the worker mutates, readers take
//! snapshots. The frame slot holds an `Arc` so a reader's copy is a
//! pointer clone and never observes a half-written frame.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::drive::{DriveCommand, PathTracker};

/// Transmitted commands retained in the history buffer.
pub const HISTORY_CAPACITY: usize = 10;

/// History entries included in a status snapshot.
const STATUS_HISTORY: usize = 5;

// ── Status snapshot ────────────────────────────────────────

/// Point-in-time view of the drive state, serialized for `/status`.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    /// Last transmitted command code.
    pub command: String,
    /// Movement trail normalized to [0, 100] per axis.
    pub path: Vec<(f32, f32)>,
    /// Most recent transmitted commands, oldest first.
    pub history: Vec<String>,
}

// ── Shared state ───────────────────────────────────────────

/// Worker-owned telemetry, mutated only from the worker thread.
#[derive(Debug)]
struct Telemetry {
    command: DriveCommand,
    history: VecDeque<DriveCommand>,
    path: PathTracker,
}

/// State shared between the worker and any number of readers.
///
/// Both locks are held only long enough to copy data in or out, so
/// readers never stall the capture loop noticeably.
#[derive(Debug)]
pub struct SharedState {
    frame: Mutex<Option<Arc<Vec<u8>>>>,
    telemetry: Mutex<Telemetry>,
    fault: Mutex<Option<String>>,
    shutting_down: AtomicBool,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            frame: Mutex::new(None),
            telemetry: Mutex::new(Telemetry {
                command: DriveCommand::Stop,
                history: VecDeque::new(),
                path: PathTracker::new(),
            }),
            fault: Mutex::new(None),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Replace the published frame with a freshly encoded JPEG.
    pub fn publish_frame(&self, jpeg: Vec<u8>) {
        *self.frame.lock().unwrap() = Some(Arc::new(jpeg));
    }

    /// Latest published frame, or None before the first capture.
    pub fn latest_frame(&self) -> Option<Arc<Vec<u8>>> {
        self.frame.lock().unwrap().clone()
    }

    /// Record a transmitted command: current command, history, trail.
    ///
    /// Callers invoke this only when a command actually went out, so
    /// every entry here corresponds to one serial write.
    pub fn record_command(&self, command: DriveCommand) {
        let mut telemetry = self.telemetry.lock().unwrap();
        telemetry.command = command;
        telemetry.history.push_back(command);
        if telemetry.history.len() > HISTORY_CAPACITY {
            telemetry.history.pop_front();
        }
        telemetry.path.advance(command);
    }

    /// Build a status snapshot from the current telemetry.
    ///
    /// Only the copy happens under the lock; normalization runs after it
    /// is released.
    pub fn status(&self) -> Status {
        let telemetry = self.telemetry.lock().unwrap();
        let command = telemetry.command;
        let skip = telemetry.history.len().saturating_sub(STATUS_HISTORY);
        let history: Vec<String> = telemetry
            .history
            .iter()
            .skip(skip)
            .map(|c| c.as_str().to_string())
            .collect();
        let path = telemetry.path.clone();
        drop(telemetry);

        Status {
            command: command.as_str().to_string(),
            path: path.normalized(),
            history,
        }
    }

    /// Mark the process as shutting down. Open frame streams observe
    /// this and end instead of yielding further parts.
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
    }

    /// Whether shutdown has begun.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Relaxed)
    }

    /// Record why the worker stopped, for the controller to report.
    pub fn set_fault(&self, message: String) {
        *self.fault.lock().unwrap() = Some(message);
    }

    /// Fatal worker error, if one occurred.
    pub fn fault(&self) -> Option<String> {
        self.fault.lock().unwrap().clone()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────
