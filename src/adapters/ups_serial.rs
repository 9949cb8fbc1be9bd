//! UPS status over a tty.
//!
//! The port is put into raw 8N1 mode with `stty`, with a VTIME read
//! timeout so a silent UPS turns into [`SerialError::Timeout`] instead of
//! a hung task.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::process::Command;
use std::time::Duration;

use log::debug;

use crate::app::ports::UpsLine;
use crate::error::SerialError;

/// Read timeout of the UPS port.
pub const READ_TIMEOUT: Duration = Duration::from_secs(3);

pub struct SerialUps {
    reader: BufReader<File>,
    line: String,
}

impl SerialUps {
    /// Configure and open `device`.
    pub fn open(device: &str, baud: u32) -> Result<Self, SerialError> {
        // VTIME counts tenths of a second.
        let vtime = (READ_TIMEOUT.as_millis() / 100).to_string();
        let status = Command::new("stty")
            .args(["-F", device, &baud.to_string()])
            .args(["cs8", "-cstopb", "-parenb", "raw", "-echo"])
            .args(["min", "0", "time", &vtime])
            .status()
            .map_err(|_| SerialError::Io)?;
        if !status.success() {
            debug!("stty failed on {device}: {status}");
            return Err(SerialError::Io);
        }

        let file = File::open(device).map_err(|_| SerialError::Io)?;
        Ok(Self::from_file(file))
    }

    /// Wrap an already configured port.
    pub fn from_file(file: File) -> Self {
        Self {
            reader: BufReader::new(file),
            line: String::with_capacity(64),
        }
    }
}

impl UpsLine for SerialUps {
    fn read_line(&mut self) -> Result<String, SerialError> {
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            // VTIME expired with nothing buffered.
            Ok(0) => Err(SerialError::Timeout),
            Ok(_) => Ok(self.line.trim_end().to_owned()),
            Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                Err(SerialError::Timeout)
            }
            // Non-UTF-8 bytes on the wire are noise too.
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(SerialError::MalformedFrame),
            Err(_) => Err(SerialError::Io),
        }
    }
}
