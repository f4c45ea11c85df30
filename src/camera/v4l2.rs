//! V4L2 capture via rscam.
//!
//! Prefers raw RGB3 from the driver and falls back to MJPG with a
//! software JPEG decode, which nearly every UVC webcam supports.

use rscam::{Camera, Config};
use tracing::info;

use super::{CameraError, FrameSource, RgbFrame};

/// Pixel format negotiated with the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelFormat {
    Rgb3,
    Mjpg,
}

/// A V4L2 camera device.
pub struct V4l2Camera {
    camera: Camera,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl V4l2Camera {
    /// Open `/dev/video<index>` and start streaming at the given size.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, CameraError> {
        let device = format!("/dev/video{index}");

        let mut camera = Camera::new(&device).map_err(|e| CameraError::Open {
            device: device.clone(),
            reason: e.to_string(),
        })?;

        let config = |format: &'static [u8]| Config {
            interval: (1, 30),
            resolution: (width, height),
            format,
            ..Default::default()
        };

        let format = match camera.start(&config(b"RGB3")) {
            Ok(()) => PixelFormat::Rgb3,
            Err(_) => {
                camera
                    .start(&config(b"MJPG"))
                    .map_err(|e| CameraError::Open {
                        device: device.clone(),
                        reason: e.to_string(),
                    })?;
                PixelFormat::Mjpg
            }
        };

        info!(device = %device, width, height, format = ?format, "camera streaming");
        Ok(Self {
            camera,
            width,
            height,
            format,
        })
    }
}

impl FrameSource for V4l2Camera {
    fn grab(&mut self) -> Result<Option<RgbFrame>, CameraError> {
        let frame = self.camera.capture()?;
        let rgb = match self.format {
            PixelFormat::Rgb3 => {
                let (w, h) = frame.resolution;
                RgbFrame::new(w, h, frame.to_vec())
            }
            PixelFormat::Mjpg => {
                let decoded = image::load_from_memory(&frame)?.to_rgb8();
                let (w, h) = decoded.dimensions();
                RgbFrame::new(w, h, decoded.into_raw())
            }
        };
        Ok(Some(rgb))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
