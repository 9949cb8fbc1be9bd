//! DHT11/DHT22 through the kernel `dht11` IIO driver.
//!
//! The driver exposes `in_temp_input` (milli-degrees Celsius) and
//! `in_humidityrelative_input` (milli-percent). Each read triggers a fresh
//! bus transaction; the driver reports wiring noise as EIO / ETIMEDOUT /
//! EAGAIN, which map onto the transient [`SensorError`] variants.

use std::io::{self, ErrorKind};
use std::path::PathBuf;

use crate::app::ports::ClimateSensor;
use crate::error::SensorError;

pub struct IioDht {
    dir: PathBuf,
}

impl IioDht {
    pub fn new(device_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: device_dir.into(),
        }
    }

    fn read_milli(&self, attr: &str) -> Result<f32, SensorError> {
        let raw = std::fs::read_to_string(self.dir.join(attr)).map_err(map_io)?;
        if raw.trim().is_empty() {
            return Err(SensorError::ShortRead);
        }
        let milli: i32 = raw.trim().parse().map_err(|_| SensorError::Garbled)?;
        Ok(milli as f32 / 1000.0)
    }
}

pub fn celsius_to_fahrenheit(c: f32) -> f32 {
    c * 9.0 / 5.0 + 32.0
}

fn map_io(e: io::Error) -> SensorError {
    if e.kind() == ErrorKind::NotFound {
        return SensorError::DeviceMissing;
    }
    match e.raw_os_error() {
        Some(libc::EIO) => SensorError::Checksum,
        Some(libc::ETIMEDOUT) => SensorError::Timeout,
        Some(libc::EAGAIN) => SensorError::ShortRead,
        Some(libc::ENODEV | libc::ENXIO) => SensorError::DeviceMissing,
        code => SensorError::Io(code),
    }
}

impl ClimateSensor for IioDht {
    fn read_temperature(&mut self) -> Result<Option<f32>, SensorError> {
        let c = self.read_milli("in_temp_input")?;
        Ok(Some(celsius_to_fahrenheit(c)))
    }

    fn read_humidity(&mut self) -> Result<Option<f32>, SensorError> {
        self.read_milli("in_humidityrelative_input").map(Some)
    }
}
