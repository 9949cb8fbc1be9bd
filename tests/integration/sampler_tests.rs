//! Samplers publishing into the shared store, read back by the monitor.

use crate::mock_hw::{
    FixedProbe, MockLink, RecordingDelay, RecordingNotifier, RecordingSink, ScriptedClimate,
    ScriptedUps,
};

use sitewatch::alert::AlertDispatcher;
use sitewatch::config::SiteConfig;
use sitewatch::error::{SensorError, SerialError};
use sitewatch::monitor::ThresholdMonitor;
use sitewatch::sensors::{ClimateSampler, PowerSampler, UplinkSampler};
use sitewatch::state::SharedReadings;

#[test]
fn missing_readings_keep_last_value() {
    let readings = SharedReadings::new();
    let sensor = ScriptedClimate::temperatures([Ok(Some(72.0)), Ok(None), Ok(None), Ok(Some(75.0))]);
    let mut sampler = ClimateSampler::new(sensor, &readings);

    let mut seen = Vec::new();
    for _ in 0..4 {
        sampler.sample(&readings).unwrap();
        seen.push(readings.temperature());
    }
    assert_eq!(seen, vec![72.0, 72.0, 72.0, 75.0]);
}

#[test]
fn transient_sensor_noise_is_swallowed() {
    let readings = SharedReadings::new();
    let sensor = ScriptedClimate::temperatures([
        Ok(Some(70.0)),
        Err(SensorError::Checksum),
        Err(SensorError::Timeout),
    ]);
    let mut sampler = ClimateSampler::new(sensor, &readings);

    for _ in 0..3 {
        assert!(sampler.sample(&readings).is_ok());
    }
    assert_eq!(readings.temperature(), 70.0);
}

#[test]
fn fatal_sensor_error_propagates_and_leaves_store() {
    let readings = SharedReadings::new();
    readings.set_temperature(68.0);
    let sensor = ScriptedClimate::temperatures([Err(SensorError::DeviceMissing)]);
    let mut sampler = ClimateSampler::new(sensor, &readings);

    assert_eq!(sampler.sample(&readings), Err(SensorError::DeviceMissing));
    assert_eq!(readings.temperature(), 68.0);
}

#[test]
fn ups_noise_keeps_previous_frame() {
    let readings = SharedReadings::new();
    let mut ups = ScriptedUps::lines([
        "$ SmartUPS V3.2P,Vin NG,BATCAP 87,Vout 5250 $",
        "garbage",
    ]);
    ups.lines.push_back(Err(SerialError::Io));
    let mut sampler = PowerSampler::new(ups);

    assert!(sampler.sample(&readings).is_some());
    assert!(sampler.sample(&readings).is_none());
    assert!(sampler.sample(&readings).is_none());
    assert!(!readings.power_good());
    assert_eq!(readings.battery(), 87);
}

#[test]
fn lost_uplink_alerts_after_three_probes() {
    let readings = SharedReadings::new();
    let mut uplink = UplinkSampler::new(FixedProbe::new(false), MockLink::new());
    let mut monitor = ThresholdMonitor::new(&SiteConfig::default());
    let mut alerts = AlertDispatcher::new(
        RecordingNotifier::new(),
        RecordingDelay::new(),
        "Lab".into(),
        vec!["+15550001111".into()],
    );
    let mut sink = RecordingSink::new();

    for _ in 0..3 {
        assert_eq!(uplink.sample(&readings), Some(false));
        monitor.tick(&readings, &mut alerts, &mut sink);
    }
    assert_eq!(alerts.notifier().sent.len(), 1);
    assert!(readings.failover_requested());
}

#[test]
fn active_failover_skips_probe() {
    let readings = SharedReadings::new();
    readings.set_connected(false);
    let mut uplink = UplinkSampler::new(FixedProbe::new(true), MockLink::already_up());

    assert_eq!(uplink.sample(&readings), None);
    assert!(!readings.connected());
}
