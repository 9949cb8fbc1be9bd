//! Threshold monitor → alert dispatcher → notifier pipeline.

use crate::mock_hw::{RecordingDelay, RecordingNotifier, RecordingSink};

use sitewatch::alert::{AlertDispatcher, Channel};
use sitewatch::app::events::AppEvent;
use sitewatch::config::SiteConfig;
use sitewatch::monitor::{STRIKES, ThresholdMonitor};
use sitewatch::state::SharedReadings;

const RECIPIENTS: [&str; 2] = ["+15550001111", "+15550002222"];

fn dispatcher(notifier: RecordingNotifier) -> AlertDispatcher<RecordingNotifier, RecordingDelay> {
    AlertDispatcher::new(
        notifier,
        RecordingDelay::new(),
        "Pump House".into(),
        RECIPIENTS.iter().map(|r| r.to_string()).collect(),
    )
}

fn config() -> SiteConfig {
    let mut cfg = SiteConfig::default();
    cfg.monitor.temp_range = (53.0, 75.1);
    cfg.monitor.minute_interval = 1;
    cfg.monitor.monitor_interval = 20;
    cfg
}

#[test]
fn three_hot_readings_send_one_alert_per_recipient() {
    let readings = SharedReadings::new();
    let mut monitor = ThresholdMonitor::new(&config());
    let mut alerts = dispatcher(RecordingNotifier::new());
    let mut sink = RecordingSink::new();

    readings.set_temperature(80.0);
    let fired: usize = (0..STRIKES)
        .map(|_| monitor.tick(&readings, &mut alerts, &mut sink))
        .sum();

    assert_eq!(fired, 1);
    let sent = &alerts.notifier().sent;
    assert_eq!(sent.len(), RECIPIENTS.len());
    for ((to, body), expected) in sent.iter().zip(RECIPIENTS) {
        assert_eq!(to, expected);
        assert!(body.starts_with("Pump House SERVER ALERT\n"));
        assert!(body.contains("too hot"), "{body}");
        assert!(body.contains("80.0"), "{body}");
    }
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Strike { .. })),
        (STRIKES - 1) as usize
    );
}

#[test]
fn two_hot_readings_then_normal_send_nothing() {
    let readings = SharedReadings::new();
    let mut monitor = ThresholdMonitor::new(&config());
    let mut alerts = dispatcher(RecordingNotifier::new());
    let mut sink = RecordingSink::new();

    readings.set_temperature(80.0);
    monitor.tick(&readings, &mut alerts, &mut sink);
    monitor.tick(&readings, &mut alerts, &mut sink);
    readings.set_temperature(70.0);
    monitor.tick(&readings, &mut alerts, &mut sink);

    assert!(alerts.notifier().sent.is_empty());
    assert_eq!(monitor.failures(Channel::Temperature), 0);
    assert!(sink.events.contains(&AppEvent::Recovered(Channel::Temperature)));
}

#[test]
fn failed_recipient_does_not_stop_fan_out() {
    let readings = SharedReadings::new();
    let mut monitor = ThresholdMonitor::new(&config());
    let mut alerts = dispatcher(RecordingNotifier::failing_for(RECIPIENTS[0]));
    let mut sink = RecordingSink::new();

    readings.set_power_good(false);
    readings.set_battery(64);
    for _ in 0..STRIKES {
        monitor.tick(&readings, &mut alerts, &mut sink);
    }

    let sent = &alerts.notifier().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, RECIPIENTS[1]);
    assert!(sent[0].1.contains("UPS Capacity: 64%"));
    assert!(sink.events.contains(&AppEvent::AlertDispatched {
        channel: Channel::Power,
        delivered: 1,
        recipients: 2,
    }));
}

#[test]
fn cold_reading_sends_cold_text() {
    let readings = SharedReadings::new();
    let mut monitor = ThresholdMonitor::new(&config());
    let mut alerts = dispatcher(RecordingNotifier::new());
    let mut sink = RecordingSink::new();

    readings.set_temperature(40.0);
    for _ in 0..STRIKES {
        monitor.tick(&readings, &mut alerts, &mut sink);
    }
    let bodies = alerts.notifier().bodies();
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0].contains("Room temperature is too cold.\nCurrent Temperature: 40.0 F"));
}

#[test]
fn sustained_failure_repeats_after_cooldown() {
    // 1 minute at a 20 s monitor tick: 3 ticks between alerts.
    let readings = SharedReadings::new();
    let mut monitor = ThresholdMonitor::new(&config());
    let mut alerts = dispatcher(RecordingNotifier::new());
    let mut sink = RecordingSink::new();

    readings.set_humidity(75.0);
    let ticks_with_alert: Vec<usize> = (1..=9)
        .filter(|_| monitor.tick(&readings, &mut alerts, &mut sink) > 0)
        .collect();
    assert_eq!(ticks_with_alert, vec![3, 6, 9]);
    assert!(alerts.notifier().bodies().iter().all(|b| b.contains("too high")));
}

#[test]
fn connected_uplink_skips_grace_period() {
    let readings = SharedReadings::new();
    let delay = RecordingDelay::new();
    let mut monitor = ThresholdMonitor::new(&config());
    let mut alerts = AlertDispatcher::new(
        RecordingNotifier::new(),
        delay.clone(),
        "Pump House".into(),
        vec!["+15550001111".into()],
    );
    let mut sink = RecordingSink::new();

    readings.set_temperature(90.0);
    for _ in 0..STRIKES {
        monitor.tick(&readings, &mut alerts, &mut sink);
    }
    assert_eq!(delay.total_ms(), 0);
    assert!(!readings.failover_requested());
}
