//! Temperature/humidity sampler.
//!
//! Keeps its own copy of the last good values rather than re-reading the
//! shared cells, so a missing reading always falls back to what *this* loop
//! last saw.

use log::{debug, error};

use crate::app::ports::ClimateSensor;
use crate::error::SensorError;
use crate::state::SharedReadings;

pub struct ClimateSampler<S> {
    sensor: S,
    last_temperature: f32,
    last_humidity: f32,
}

impl<S: ClimateSensor> ClimateSampler<S> {
    /// Seed with the values already in the store.
    pub fn new(sensor: S, readings: &SharedReadings) -> Self {
        Self {
            sensor,
            last_temperature: readings.temperature(),
            last_humidity: readings.humidity(),
        }
    }

    /// Read both quantities and publish them.
    ///
    /// Transient driver errors count as "no reading". Any other error is
    /// returned and the store is left untouched.
    pub fn sample(&mut self, readings: &SharedReadings) -> Result<(), SensorError> {
        let temperature = filter_transient(self.sensor.read_temperature())?;
        let humidity = filter_transient(self.sensor.read_humidity())?;

        if let Some(t) = temperature {
            self.last_temperature = t;
        }
        if let Some(h) = humidity {
            self.last_humidity = h;
        }

        readings.set_temperature(self.last_temperature);
        readings.set_humidity(self.last_humidity);
        Ok(())
    }
}

fn filter_transient(
    reading: Result<Option<f32>, SensorError>,
) -> Result<Option<f32>, SensorError> {
    match reading {
        Ok(value) => Ok(value),
        Err(e) if e.is_transient() => {
            debug!("DHT: {e}, keeping last value");
            Ok(None)
        }
        Err(e) => {
            error!("DHT: {e}");
            Err(e)
        }
    }
}
