//! Button input through the sysfs GPIO interface.

use std::fs;
use std::io;
use std::path::PathBuf;

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin};
use log::debug;

#[derive(Debug)]
pub struct GpioError(pub io::Error);

impl digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "gpio: {}", self.0)
    }
}

impl std::error::Error for GpioError {}

/// One input line under `/sys/class/gpio/gpioN`.
pub struct SysfsButtonPin {
    value: PathBuf,
}

impl SysfsButtonPin {
    /// Export `line` (if needed) and configure it as an input.
    pub fn open(line: u32) -> Result<Self, GpioError> {
        Self::open_in("/sys/class/gpio", line)
    }

    pub fn open_in(root: impl Into<PathBuf>, line: u32) -> Result<Self, GpioError> {
        let root = root.into();
        let dir = root.join(format!("gpio{line}"));
        if !dir.exists() {
            debug!("Exporting GPIO {line}");
            fs::write(root.join("export"), line.to_string()).map_err(GpioError)?;
        }
        fs::write(dir.join("direction"), "in").map_err(GpioError)?;
        Ok(Self {
            value: dir.join("value"),
        })
    }
}

impl ErrorType for SysfsButtonPin {
    type Error = GpioError;
}

impl InputPin for SysfsButtonPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let raw = fs::read_to_string(&self.value).map_err(GpioError)?;
        Ok(raw.trim() == "1")
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_exported_line() {
        let root = std::env::temp_dir().join(format!("sitewatch-gpio-{}", std::process::id()));
        let dir = root.join("gpio4");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("value"), "1\n").unwrap();

        let mut pin = SysfsButtonPin::open_in(&root, 4).unwrap();
        assert_eq!(fs::read_to_string(dir.join("direction")).unwrap(), "in");
        assert!(pin.is_high().unwrap());
        fs::write(dir.join("value"), "0\n").unwrap();
        assert!(pin.is_low().unwrap());
        fs::remove_dir_all(&root).unwrap();
    }
}
