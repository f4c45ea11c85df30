//! Frame annotation — landmark markers, HUD text, JPEG encoding.
//!
//! Text uses a small built-in 8x12 bitmap font drawn straight into the
//! RGB buffer: a dark outline pass under a light fill keeps the HUD
//! readable on any background.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::camera::RgbFrame;
use crate::drive::DriveCommand;
use crate::hand::LandmarkSet;

const GLYPH_WIDTH: usize = 8;
const GLYPH_HEIGHT: usize = 12;

const TEXT_FILL: (u8, u8, u8) = (255, 255, 255);
const TEXT_OUTLINE: (u8, u8, u8) = (0, 0, 0);
const MARKER_COLOR: (u8, u8, u8) = (0, 255, 96);
const MARKER_RADIUS: i32 = 3;

// ── Drawing ────────────────────────────────────────────────

/// Draw a filled square marker on every landmark of the hand.
pub fn draw_landmarks(frame: &mut RgbFrame, hand: &LandmarkSet) {
    for point in hand.points() {
        for dy in -MARKER_RADIUS..=MARKER_RADIUS {
            for dx in -MARKER_RADIUS..=MARKER_RADIUS {
                put_pixel(frame, point.x + dx, point.y + dy, MARKER_COLOR);
            }
        }
    }
}

/// Draw the two HUD lines: raised-finger count and transmitted command.
pub fn draw_hud(frame: &mut RgbFrame, fingers: u8, command: DriveCommand) {
    draw_text(frame, &format!("Fingers: {fingers}"), 10, 30);
    draw_text(frame, &format!("Command: {}", command.as_str()), 10, 60);
}

/// Draw outlined text with (x, y) at the top-left of the first glyph.
pub fn draw_text(frame: &mut RgbFrame, text: &str, x: i32, y: i32) {
    for (dx, dy) in [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ] {
        draw_text_plain(frame, text, x + dx, y + dy, TEXT_OUTLINE);
    }
    draw_text_plain(frame, text, x, y, TEXT_FILL);
}

fn draw_text_plain(frame: &mut RgbFrame, text: &str, x: i32, y: i32, color: (u8, u8, u8)) {
    let mut cursor = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if (bits >> (7 - col)) & 1 == 1 {
                        put_pixel(frame, cursor + col as i32, y + row as i32, color);
                    }
                }
            }
        }
        cursor += GLYPH_WIDTH as i32;
    }
}

fn put_pixel(frame: &mut RgbFrame, x: i32, y: i32, color: (u8, u8, u8)) {
    if x < 0 || y < 0 || x >= frame.width as i32 || y >= frame.height as i32 {
        return;
    }
    let i = (y as usize * frame.width as usize + x as usize) * 3;
    frame.data[i] = color.0;
    frame.data[i + 1] = color.1;
    frame.data[i + 2] = color.2;
}

// ── Encoding ───────────────────────────────────────────────

/// Encode the frame as JPEG at the given quality.
pub fn encode_jpeg(frame: &RgbFrame, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder.encode(
        &frame.data,
        frame.width,
        frame.height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg)
}

// ── Font ───────────────────────────────────────────────────

/// 8x12 glyph rows for the characters the HUD uses. Unknown characters
/// (and spaces) advance the cursor without drawing.
fn glyph(ch: char) -> Option<[u8; GLYPH_HEIGHT]> {
    let rows = match ch {
        'B' => [0x00, 0x7C, 0x42, 0x42, 0x7C, 0x42, 0x42, 0x42, 0x42, 0x7C, 0x00, 0x00],
        'C' => [0x00, 0x3C, 0x42, 0x40, 0x40, 0x40, 0x40, 0x40, 0x42, 0x3C, 0x00, 0x00],
        'F' => [0x00, 0x7E, 0x40, 0x40, 0x40, 0x7C, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00],
        'L' => [0x00, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x7E, 0x00, 0x00],
        'R' => [0x00, 0x7C, 0x42, 0x42, 0x42, 0x7C, 0x48, 0x44, 0x42, 0x42, 0x00, 0x00],
        'S' => [0x00, 0x3C, 0x42, 0x40, 0x30, 0x0C, 0x02, 0x42, 0x42, 0x3C, 0x00, 0x00],
        'a' => [0x00, 0x00, 0x00, 0x3C, 0x02, 0x3E, 0x42, 0x42, 0x46, 0x3A, 0x00, 0x00],
        'd' => [0x00, 0x02, 0x02, 0x3A, 0x46, 0x42, 0x42, 0x42, 0x46, 0x3A, 0x00, 0x00],
        'e' => [0x00, 0x00, 0x00, 0x3C, 0x42, 0x7E, 0x40, 0x40, 0x42, 0x3C, 0x00, 0x00],
        'g' => [0x00, 0x00, 0x00, 0x3A, 0x46, 0x42, 0x46, 0x3A, 0x02, 0x3C, 0x00, 0x00],
        'i' => [0x00, 0x08, 0x00, 0x18, 0x08, 0x08, 0x08, 0x08, 0x08, 0x3E, 0x00, 0x00],
        'm' => [0x00, 0x00, 0x00, 0x76, 0x49, 0x49, 0x49, 0x49, 0x49, 0x49, 0x00, 0x00],
        'n' => [0x00, 0x00, 0x00, 0x5C, 0x62, 0x42, 0x42, 0x42, 0x42, 0x42, 0x00, 0x00],
        'o' => [0x00, 0x00, 0x00, 0x3C, 0x42, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00, 0x00],
        'r' => [0x00, 0x00, 0x00, 0x5C, 0x62, 0x40, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00],
        's' => [0x00, 0x00, 0x00, 0x3E, 0x40, 0x3C, 0x02, 0x02, 0x42, 0x3C, 0x00, 0x00],
        '0' => [0x00, 0x3C, 0x42, 0x46, 0x4A, 0x52, 0x62, 0x42, 0x42, 0x3C, 0x00, 0x00],
        '1' => [0x00, 0x08, 0x18, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x3E, 0x00, 0x00],
        '2' => [0x00, 0x3C, 0x42, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x7E, 0x00, 0x00],
        '3' => [0x00, 0x3C, 0x42, 0x02, 0x1C, 0x02, 0x02, 0x02, 0x42, 0x3C, 0x00, 0x00],
        '4' => [0x00, 0x04, 0x0C, 0x14, 0x24, 0x44, 0x7E, 0x04, 0x04, 0x04, 0x00, 0x00],
        '5' => [0x00, 0x7E, 0x40, 0x40, 0x7C, 0x02, 0x02, 0x02, 0x42, 0x3C, 0x00, 0x00],
        '6' => [0x00, 0x1C, 0x20, 0x40, 0x7C, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00, 0x00],
        '7' => [0x00, 0x7E, 0x02, 0x04, 0x08, 0x08, 0x10, 0x10, 0x20, 0x20, 0x00, 0x00],
        '8' => [0x00, 0x3C, 0x42, 0x42, 0x3C, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00, 0x00],
        '9' => [0x00, 0x3C, 0x42, 0x42, 0x42, 0x3E, 0x02, 0x04, 0x08, 0x70, 0x00, 0x00],
        ':' => [0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00],
        _ => return None,
    };
    Some(rows)
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn blank_frame(width: u32, height: u32) -> RgbFrame {
    RgbFrame::new(width, height, vec![0; width as usize * height as usize * 3])
}

#[cfg(test)]
fn pixel(frame: &RgbFrame, x: usize, y: usize) -> (u8, u8, u8) {
    let i = (y * frame.width as usize + x) * 3;
    (frame.data[i], frame.data[i + 1], frame.data[i + 2])
}

// ── Tests ──────────────────────────────────────────────────
