//! UPS HAT power sampler.
//!
//! The UPS streams one status line per second over its UART:
//!
//! ```text
//! $ SmartUPS V3.2P,Vin GOOD,BATCAP 100,Vout 5250 $
//! ```
//!
//! Field 1 is the external input status, field 2 the battery capacity.
//! Anything that does not parse is treated as line noise and dropped.

use log::{debug, info, warn};

use crate::app::ports::UpsLine;
use crate::error::SerialError;
use crate::state::SharedReadings;

/// One parsed status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsFrame {
    /// External input reported `GOOD`.
    pub power_good: bool,
    /// Battery capacity, percent.
    pub battery_percent: u8,
}

impl UpsFrame {
    pub fn parse(line: &str) -> Result<Self, SerialError> {
        let mut fields = line.trim().split(',');
        let _model = fields.next();
        let vin = fields.next().ok_or(SerialError::MalformedFrame)?;
        let batcap = fields.next().ok_or(SerialError::MalformedFrame)?;

        let status = vin.trim().trim_start_matches("Vin").trim();
        let capacity = batcap.trim().trim_start_matches("BATCAP").trim();

        let battery_percent: u8 = capacity
            .parse()
            .map_err(|_| SerialError::MalformedFrame)?;

        Ok(Self {
            power_good: status.contains("GOOD"),
            battery_percent: battery_percent.min(100),
        })
    }
}

pub struct PowerSampler<U> {
    port: U,
}

impl<U: UpsLine> PowerSampler<U> {
    pub fn new(port: U) -> Self {
        Self { port }
    }

    /// Read one line and publish it. Serial noise leaves the store as is.
    pub fn sample(&mut self, readings: &SharedReadings) -> Option<UpsFrame> {
        let frame = match self.port.read_line().and_then(|l| UpsFrame::parse(&l)) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("UPS: {e}, keeping last values");
                return None;
            }
        };

        let was_good = readings.power_good();
        if was_good && !frame.power_good {
            warn!("UPS: external power lost, battery {}%", frame.battery_percent);
        } else if !was_good && frame.power_good {
            info!("UPS: external power restored");
        }

        readings.set_power_good(frame.power_good);
        readings.set_battery(frame.battery_percent);
        Some(frame)
    }
}
