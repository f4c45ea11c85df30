//! Synthetic frame source — deterministic test pattern, no hardware.
//!
//! Stands in for a real camera in CI and on machines without a V4L2
//! device: a color gradient with a bar sweeping across it, paced at a
//! configurable frame interval.

use std::time::Duration;

use super::{CameraError, FrameSource, RgbFrame};

/// Moving-bar test pattern generator.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    frame_index: u64,
    frame_interval: Duration,
}

impl SyntheticCamera {
    /// Pattern source pacing itself at roughly 30 fps.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_interval(width, height, Duration::from_millis(33))
    }

    /// Pattern source with an explicit frame interval (zero runs unpaced).
    pub fn with_interval(width: u32, height: u32, frame_interval: Duration) -> Self {
        Self {
            width,
            height,
            frame_index: 0,
            frame_interval,
        }
    }
}

impl FrameSource for SyntheticCamera {
    fn grab(&mut self) -> Result<Option<RgbFrame>, CameraError> {
        if !self.frame_interval.is_zero() {
            std::thread::sleep(self.frame_interval);
        }

        let w = self.width.max(1) as usize;
        let h = self.height.max(1) as usize;
        let bar = (self.frame_index as usize * 4) % w;

        let mut data = vec![0u8; w * h * 3];
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) * 3;
                data[i] = (x * 255 / w) as u8;
                data[i + 1] = (y * 255 / h) as u8;
                data[i + 2] = if x == bar { 255 } else { 32 };
            }
        }

        self.frame_index += 1;
        Ok(Some(RgbFrame::new(w as u32, h as u32, data)))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width.max(1), self.height.max(1))
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn unpaced(width: u32, height: u32) -> SyntheticCamera {
        SyntheticCamera::with_interval(width, height, Duration::ZERO)
    }

    #[test]
    fn test_frame_dimensions() {
        let mut camera = unpaced(64, 48);
        let frame = camera.grab().unwrap().unwrap();
        assert_eq!(frame.width, 64);
        assert_eq!(frame.height, 48);
        assert_eq!(frame.data.len(), 64 * 48 * 3);
    }

    #[test]
    fn test_deterministic_sequence() {
        let mut a = unpaced(32, 32);
        let mut b = unpaced(32, 32);
        for _ in 0..3 {
            let fa = a.grab().unwrap().unwrap();
            let fb = b.grab().unwrap().unwrap();
            assert_eq!(fa.data, fb.data);
        }
    }

    #[test]
    fn test_pattern_moves() {
        let mut camera = unpaced(32, 32);
        let first = camera.grab().unwrap().unwrap();
        let second = camera.grab().unwrap().unwrap();
        assert_ne!(first.data, second.data);
    }
}
