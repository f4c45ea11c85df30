//! Debounced command transmission to the rover.
//!
//! `CommandLink` is the raw byte transport (serial port, or a logging
//! sink when no rover is attached). `CommandRelay` sits on top and only
//! transmits when the command actually changes, so the link sees one
//! message per gesture change instead of one per video frame.

use std::io;

use thiserror::Error;
use tracing::{debug, info};

use super::command::DriveCommand;

#[cfg(feature = "serial")]
use std::io::Write;

// ── Errors ─────────────────────────────────────────────────

/// Errors from the rover link.
#[derive(Debug, Error)]
pub enum LinkError {
    #[cfg(feature = "serial")]
    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),
    #[error("link write failed: {0}")]
    Io(#[from] io::Error),
}

// ── Link trait and implementations ─────────────────────────

/// Byte transport to the rover.
pub trait CommandLink: Send {
    /// Transmit one command byte.
    fn send(&mut self, byte: u8) -> Result<(), LinkError>;
}

/// Rover link over a serial port.
#[cfg(feature = "serial")]
pub struct SerialLink {
    port: Box<dyn serialport::SerialPort>,
}

#[cfg(feature = "serial")]
impl SerialLink {
    /// Open the serial device. The write timeout bounds every later send.
    pub fn open(path: &str, baud: u32, timeout: std::time::Duration) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud).timeout(timeout).open()?;
        info!(port = path, baud, "serial link open");
        Ok(Self { port })
    }
}

#[cfg(feature = "serial")]
impl CommandLink for SerialLink {
    fn send(&mut self, byte: u8) -> Result<(), LinkError> {
        self.port.write_all(&[byte])?;
        Ok(())
    }
}

/// Logging sink used when no rover is attached.
pub struct LogLink;

impl CommandLink for LogLink {
    fn send(&mut self, byte: u8) -> Result<(), LinkError> {
        info!(command = %char::from(byte), "command (no serial device)");
        Ok(())
    }
}

// ── Relay ──────────────────────────────────────────────────

/// Edge-triggered transmitter over a [`CommandLink`].
pub struct CommandRelay {
    link: Box<dyn CommandLink>,
    last_sent: DriveCommand,
}

impl CommandRelay {
    /// Wrap a link. The relay starts from Stop, matching the rover's
    /// power-on state, so an initial Stop gesture transmits nothing.
    pub fn new(link: Box<dyn CommandLink>) -> Self {
        Self {
            link,
            last_sent: DriveCommand::Stop,
        }
    }

    /// Offer this cycle's command.
    ///
    /// Returns true when the command changed and was transmitted. A write
    /// failure leaves `last_sent` untouched, so the next offer of the
    /// same command would retry the transmission.
    pub fn offer(&mut self, command: DriveCommand) -> Result<bool, LinkError> {
        if command == self.last_sent {
            return Ok(false);
        }
        self.link.send(command.as_byte())?;
        debug!(from = ?self.last_sent, to = ?command, "command transmitted");
        self.last_sent = command;
        Ok(true)
    }

    /// Last transmitted command (Stop before any transmission).
    pub fn last_sent(&self) -> DriveCommand {
        self.last_sent
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
use std::sync::{Arc, Mutex};

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

/// Link whose every send fails.
#[cfg(test)]
fn failing_link() -> Box<dyn CommandLink> {
    struct Failing;

    impl CommandLink for Failing {
        fn send(&mut self, _byte: u8) -> Result<(), LinkError> {
            Err(LinkError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device unplugged",
            )))
        }
    }

    Box::new(Failing)
}

// ── Tests ──────────────────────────────────────────────────
