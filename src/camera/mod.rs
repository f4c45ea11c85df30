//! Camera backends — V4L2 capture and a synthetic test pattern.

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub mod synthetic;

use thiserror::Error;

// ── Errors ─────────────────────────────────────────────────

/// Errors from a frame source.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("failed to open camera {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("capture failed: {0}")]
    Capture(#[from] std::io::Error),
    #[error("frame decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

// ── Frames ─────────────────────────────────────────────────

/// An owned RGB frame, 8 bits per channel, row-major.
#[derive(Debug, Clone)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            data,
        }
    }
}

// ── Frame source trait ─────────────────────────────────────

/// A camera delivering RGB frames.
///
/// Construction opens the device and drop releases it. `grab` blocks for
/// the next frame, which paces the caller at the source's frame rate.
pub trait FrameSource: Send {
    /// Next frame, or None when the source momentarily has nothing.
    fn grab(&mut self) -> Result<Option<RgbFrame>, CameraError>;

    /// Configured capture resolution.
    fn resolution(&self) -> (u32, u32);
}

/// Parse a "WxH" resolution string. Returns (width, height) or None.
pub fn parse_resolution(s: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return None;
    }
    let w = parts[0].parse::<u32>().ok()?;
    let h = parts[1].parse::<u32>().ok()?;
    if w > 0 && h > 0 {
        Some((w, h))
    } else {
        None
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("640x480"), Some((640, 480)));
        assert_eq!(parse_resolution("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_resolution("640"), None);
        assert_eq!(parse_resolution("640x480x3"), None);
        assert_eq!(parse_resolution("0x480"), None);
        assert_eq!(parse_resolution("640x"), None);
        assert_eq!(parse_resolution("axb"), None);
    }

    #[test]
    fn test_rgb_frame_layout() {
        let frame = RgbFrame::new(4, 2, vec![0; 4 * 2 * 3]);
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.data.len(), 24);
    }
}
