//! Alert dispatch with the uplink down → failover request → trigger.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::mock_hw::{MockLink, RecordingDelay, RecordingNotifier, RecordingSink};

use sitewatch::alert::{AlertDispatcher, Channel, Direction, FAILOVER_GRACE_MS};
use sitewatch::app::events::AppEvent;
use sitewatch::config::SiteConfig;
use sitewatch::failover::{FailoverTrigger, HOLD_MS};
use sitewatch::monitor::{STRIKES, ThresholdMonitor};
use sitewatch::scheduler::Shutdown;
use sitewatch::state::SharedReadings;

fn monitor() -> ThresholdMonitor {
    ThresholdMonitor::new(&SiteConfig::default())
}

#[test]
fn uplink_down_requests_failover_before_sending() {
    let readings = Rc::new(SharedReadings::new());
    let delay = RecordingDelay::new();
    let mut alerts = AlertDispatcher::new(
        RecordingNotifier::observing(Rc::clone(&readings)),
        delay.clone(),
        "Pump House".into(),
        vec!["+15550001111".into(), "+15550002222".into()],
    );
    let mut monitor = monitor();
    let mut sink = RecordingSink::new();

    readings.set_connected(false);
    for _ in 0..STRIKES {
        monitor.tick(&readings, &mut alerts, &mut sink);
    }

    let notifier = alerts.notifier();
    assert_eq!(notifier.sent.len(), 2);
    assert!(notifier.bodies()[0].ends_with("Internet connection status:\nDisconnected"));
    assert_eq!(notifier.failover_at_send, vec![true, true]);
    assert_eq!(delay.total_ms(), u64::from(FAILOVER_GRACE_MS));
    assert!(sink.events.contains(&AppEvent::FailoverRequested(Channel::Internet)));

    // The trigger picks the request up, holds the link, and clears the flag.
    let hold = RecordingDelay::new();
    let mut trigger = FailoverTrigger::new(MockLink::new(), hold.clone());
    assert!(trigger.poll(&readings, &mut sink));

    assert!(!readings.failover_requested());
    assert_eq!(trigger.link().bring_ups, 1);
    assert_eq!(trigger.link().tear_downs, 1);
    assert!(!trigger.link().up);
    assert_eq!(hold.total_ms(), u64::from(HOLD_MS));
    assert!(sink.events.contains(&AppEvent::FailoverStarted));
    assert!(sink.events.contains(&AppEvent::FailoverEnded { dialed: true }));
}

#[test]
fn link_already_up_is_not_redialed() {
    let readings = SharedReadings::new();
    let hold = RecordingDelay::new();
    let mut trigger = FailoverTrigger::new(MockLink::already_up(), hold.clone());
    let mut sink = RecordingSink::new();

    readings.request_failover();
    assert!(trigger.poll(&readings, &mut sink));

    assert_eq!(trigger.link().bring_ups, 0);
    assert_eq!(hold.total_ms(), 0);
    assert!(!readings.failover_requested());
    assert_eq!(sink.events, vec![AppEvent::FailoverEnded { dialed: false }]);
}

#[test]
fn failed_dial_still_clears_request() {
    let readings = SharedReadings::new();
    let mut trigger = FailoverTrigger::new(MockLink::broken(), RecordingDelay::new());
    let mut sink = RecordingSink::new();

    readings.request_failover();
    assert!(trigger.poll(&readings, &mut sink));

    assert_eq!(trigger.link().bring_ups, 1);
    assert_eq!(trigger.link().tear_downs, 0);
    assert!(!readings.failover_requested());
    // Next poll finds nothing to do.
    assert!(!trigger.poll(&readings, &mut sink));
}

#[test]
fn idle_trigger_does_nothing() {
    let readings = SharedReadings::new();
    let mut trigger = FailoverTrigger::new(MockLink::new(), RecordingDelay::new());
    let mut sink = RecordingSink::new();

    for _ in 0..5 {
        assert!(!trigger.poll(&readings, &mut sink));
    }
    assert_eq!(trigger.link().bring_ups, 0);
    assert!(sink.events.is_empty());
}

#[test]
fn custom_windows_are_honoured() {
    let readings = SharedReadings::new();
    let grace = RecordingDelay::new();
    let mut alerts = AlertDispatcher::new(
        RecordingNotifier::new(),
        grace.clone(),
        "Lab".into(),
        vec!["+15550001111".into()],
    )
    .with_grace_ms(500);
    let mut sink = RecordingSink::new();

    readings.set_connected(false);
    let policy = monitor().policy(Channel::Internet);
    alerts.dispatch(Channel::Internet, &policy, Direction::Absent, &readings, &mut sink);
    assert_eq!(grace.total_ms(), 500);

    let hold = RecordingDelay::new();
    let mut trigger = FailoverTrigger::new(MockLink::new(), hold.clone()).with_hold_ms(2_000);
    trigger.poll(&readings, &mut sink);
    assert_eq!(hold.total_ms(), 2_000);
}

#[test]
fn shutdown_mid_hold_still_hangs_up() {
    let readings = SharedReadings::new();
    let shutdown = Shutdown::new();
    let mut trigger = FailoverTrigger::new(MockLink::new(), shutdown.delay());
    let mut sink = RecordingSink::new();

    let flag = shutdown.clone();
    let interrupter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        flag.trigger();
    });

    readings.request_failover();
    let started = Instant::now();
    assert!(trigger.poll(&readings, &mut sink));
    interrupter.join().unwrap();

    assert!(started.elapsed() < Duration::from_millis(u64::from(HOLD_MS)));
    assert_eq!(trigger.link().bring_ups, 1);
    assert_eq!(trigger.link().tear_downs, 1);
    assert!(!trigger.link().up);
    assert!(!readings.failover_requested());
}
