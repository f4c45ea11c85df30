//! Drive commands and the finger-count mapping.

// ── Command enum ───────────────────────────────────────────

/// A rover drive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveCommand {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl DriveCommand {
    /// Map a raised-finger count to a command.
    ///
    /// One through four select a direction; anything else (no hand, a
    /// closed fist, or an open palm) halts the rover. The table is fixed
    /// rover policy and must not change.
    pub fn from_finger_count(count: u8) -> Self {
        match count {
            1 => Self::Forward,
            2 => Self::Backward,
            3 => Self::Left,
            4 => Self::Right,
            _ => Self::Stop,
        }
    }

    /// Single ASCII byte understood by the rover firmware.
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Forward => b'F',
            Self::Backward => b'B',
            Self::Left => b'L',
            Self::Right => b'R',
            Self::Stop => b'S',
        }
    }

    /// Single-letter form used in status payloads and history entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "F",
            Self::Backward => "B",
            Self::Left => "L",
            Self::Right => "R",
            Self::Stop => "S",
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
