//! Sitewatch daemon: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Adapters (outer ring)                     │
//! │                                                                  │
//! │  IioDht        SerialUps      TcpProbe       SysfsButtonPin      │
//! │  (Climate)     (UpsLine)      (Reachability) (InputPin)          │
//! │  Lcd1602 / ConsoleDisplay     Twilio / ConsoleNotifier           │
//! │  PonLink / SimulatedLink      LogEventSink                       │
//! │                                                                  │
//! │  ──────────────── Port Trait Boundary ───────────────────        │
//! │                                                                  │
//! │  samplers · ThresholdMonitor · AlertDispatcher · FailoverTrigger │
//! │                 └──────── SharedReadings ────────┘               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use linux_embedded_hal::I2cdev;
use log::{info, warn};

use sitewatch::adapters::console_display::ConsoleDisplay;
use sitewatch::adapters::iio_dht::IioDht;
use sitewatch::adapters::link::{InterfaceLinkStatus, PonLink, SimulatedLink};
use sitewatch::adapters::log_sink::LogEventSink;
use sitewatch::adapters::net_probe::TcpProbe;
use sitewatch::adapters::notifier::{ConsoleNotifier, TwilioNotifier};
use sitewatch::adapters::sysfs_gpio::SysfsButtonPin;
use sitewatch::adapters::ups_serial::SerialUps;
use sitewatch::alert::AlertDispatcher;
use sitewatch::app::ports::{DisplayPort, FailoverLink, Notifier};
use sitewatch::config::{DEFAULT_CONFIG_PATH, SiteConfig};
use sitewatch::drivers::button::{self, ButtonDriver};
use sitewatch::drivers::lcd1602;
use sitewatch::failover::{self, FailoverTrigger};
use sitewatch::monitor::{STRIKES, ThresholdMonitor};
use sitewatch::scheduler::{MonotonicClock, Shutdown, StdDelay, run_periodic, spawn_task};
use sitewatch::sensors::{ClimateSampler, PowerSampler, UplinkSampler};
use sitewatch::state::SharedReadings;
use sitewatch::{display, display::LCD_COLS};

/// Stack for every task thread, KB.
const TASK_STACK_KB: usize = 64;

fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("SITEWATCH_CONFIG"))
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

fn main() -> Result<()> {
    // ── 1. Config + logging ───────────────────────────────────
    let path = config_path();
    let loaded = SiteConfig::load(&path);
    let level = match &loaded {
        Ok(cfg) if cfg.general.debug => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = loaded.with_context(|| format!("loading {}", path.display()))?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Sitewatch v{:<25}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!(
        "Site '{}', {} recipient(s), debug={}",
        config.general.location,
        config.general.alert_recipients.len(),
        config.general.debug
    );

    let readings = Arc::new(SharedReadings::new());
    let shutdown = Shutdown::new();
    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .context("installing signal handler")?;

    // ── 2. Samplers ───────────────────────────────────────────
    spawn_climate(&config, &readings, &shutdown)?;
    spawn_uplink(&config, &readings, &shutdown)?;
    spawn_power(&config, &readings, &shutdown)?;
    spawn_button(&config, &readings, &shutdown)?;

    // ── 3. Display ────────────────────────────────────────────
    let display_task = if config.hardware.lcd_i2c_bus.is_empty() {
        spawn_display(ConsoleDisplay::new(), &config, &readings, &shutdown)?
    } else {
        match open_lcd(&config) {
            Ok(lcd) => spawn_display(lcd, &config, &readings, &shutdown)?,
            Err(e) => {
                warn!("LCD unavailable ({e:#}), logging screens only");
                spawn_display(ConsoleDisplay::new(), &config, &readings, &shutdown)?
            }
        }
    };

    // ── 4. Monitor + failover ─────────────────────────────────
    let failover_task = if config.general.debug {
        spawn_monitor(ConsoleNotifier::new(), &config, &readings, &shutdown)?;
        spawn_failover(SimulatedLink::new(), &readings, &shutdown)?
    } else {
        spawn_monitor(TwilioNotifier::new(&config.twilio), &config, &readings, &shutdown)?;
        let status = InterfaceLinkStatus::new(&config.hardware.failover_interface);
        spawn_failover(PonLink::new(status), &readings, &shutdown)?
    };

    info!("System ready.");

    // ── 5. Wait for SIGINT / SIGTERM ──────────────────────────
    rx.recv().context("signal channel closed")?;

    info!("Interrupt received, shutting down");
    shutdown.trigger();
    // The display task clears the panel on its way out.
    if display_task.join().is_err() {
        warn!("Display task panicked");
    }
    // A hold in progress is cut short and the link hung up.
    if failover_task.join().is_err() {
        warn!("Failover task panicked");
    }
    info!("Bye");
    Ok(())
}

fn spawn_climate(config: &SiteConfig, readings: &Arc<SharedReadings>, shutdown: &Shutdown) -> Result<()> {
    let sensor = IioDht::new(&config.hardware.dht_iio_device);
    let mut sampler = ClimateSampler::new(sensor, readings);
    let (readings, shutdown, period) = (Arc::clone(readings), shutdown.clone(), config.env_period());
    spawn_task("climate", TASK_STACK_KB, move || {
        run_periodic("climate", period, &shutdown, || sampler.sample(&readings));
    })
    .context("spawning climate task")?;
    Ok(())
}

fn spawn_uplink(config: &SiteConfig, readings: &Arc<SharedReadings>, shutdown: &Shutdown) -> Result<()> {
    let probe = TcpProbe::new(config.monitor.check_host.clone(), config.monitor.check_port);
    let link = InterfaceLinkStatus::new(&config.hardware.failover_interface);
    let mut sampler = UplinkSampler::new(probe, link);
    let (readings, shutdown, period) = (Arc::clone(readings), shutdown.clone(), config.conn_period());
    spawn_task("uplink", TASK_STACK_KB, move || {
        run_periodic::<Infallible>("uplink", period, &shutdown, || {
            sampler.sample(&readings);
            Ok(())
        });
    })
    .context("spawning uplink task")?;
    Ok(())
}

fn spawn_power(config: &SiteConfig, readings: &Arc<SharedReadings>, shutdown: &Shutdown) -> Result<()> {
    let port = match SerialUps::open(&config.hardware.ups_device, config.hardware.ups_baud) {
        Ok(port) => port,
        Err(e) => {
            // Power stays at its "good" default rather than raising a
            // false alarm.
            warn!("UPS on {} unavailable ({e}), power not monitored", config.hardware.ups_device);
            return Ok(());
        }
    };
    let mut sampler = PowerSampler::new(port);
    let (readings, shutdown, period) = (Arc::clone(readings), shutdown.clone(), config.power_period());
    spawn_task("power", TASK_STACK_KB, move || {
        run_periodic::<Infallible>("power", period, &shutdown, || {
            sampler.sample(&readings);
            Ok(())
        });
    })
    .context("spawning power task")?;
    Ok(())
}

fn spawn_button(config: &SiteConfig, readings: &Arc<SharedReadings>, shutdown: &Shutdown) -> Result<()> {
    let pin = match SysfsButtonPin::open(config.hardware.button_gpio) {
        Ok(pin) => pin,
        Err(e) => {
            warn!("Button on GPIO {} unavailable ({e}), screens will not cycle", config.hardware.button_gpio);
            return Ok(());
        }
    };
    let mut driver = ButtonDriver::new(pin, config.hardware.button_active_low);
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let (readings, shutdown) = (Arc::clone(readings), shutdown.clone());
    spawn_task("button", TASK_STACK_KB, move || {
        run_periodic::<Infallible>("button", Duration::from_millis(button::POLL_MS), &shutdown, || {
            driver.poll(clock.now_ms(), &readings, &mut sink);
            Ok(())
        });
    })
    .context("spawning button task")?;
    Ok(())
}

fn open_lcd(config: &SiteConfig) -> Result<impl DisplayPort + Send + 'static> {
    let bus = I2cdev::new(&config.hardware.lcd_i2c_bus)
        .with_context(|| format!("opening {}", config.hardware.lcd_i2c_bus))?;
    let lcd = lcd1602::open(bus, StdDelay, config.hardware.lcd_address)
        .context("initialising LCD")?;
    info!(
        "LCD {}x2 at {}:0x{:02x}",
        LCD_COLS, config.hardware.lcd_i2c_bus, config.hardware.lcd_address
    );
    Ok(lcd)
}

fn spawn_display<D: DisplayPort + Send + 'static>(
    mut panel: D,
    config: &SiteConfig,
    readings: &Arc<SharedReadings>,
    shutdown: &Shutdown,
) -> Result<std::thread::JoinHandle<()>> {
    let (readings, shutdown, period) = (Arc::clone(readings), shutdown.clone(), config.screen_period());
    spawn_task("display", TASK_STACK_KB, move || {
        run_periodic::<Infallible>("display", period, &shutdown, || {
            display::refresh(&mut panel, &readings);
            Ok(())
        });
        if let Err(e) = panel.clear() {
            warn!("Display: clear on exit failed: {e}");
        }
    })
    .context("spawning display task")
}

fn spawn_monitor<N: Notifier + Send + 'static>(
    notifier: N,
    config: &SiteConfig,
    readings: &Arc<SharedReadings>,
    shutdown: &Shutdown,
) -> Result<()> {
    let mut monitor = ThresholdMonitor::new(config);
    let mut dispatcher = AlertDispatcher::new(
        notifier,
        StdDelay,
        config.general.location.clone(),
        config.general.alert_recipients.clone(),
    );
    info!(
        "Monitor: alert after {} failures, then every {} tick(s)",
        STRIKES,
        config.cooldown_ticks()
    );
    let mut sink = LogEventSink::new();
    let (readings, shutdown, period) = (Arc::clone(readings), shutdown.clone(), config.monitor_period());
    spawn_task("monitor", TASK_STACK_KB, move || {
        run_periodic::<Infallible>("monitor", period, &shutdown, || {
            monitor.tick(&readings, &mut dispatcher, &mut sink);
            Ok(())
        });
    })
    .context("spawning monitor task")?;
    Ok(())
}

fn spawn_failover<L: FailoverLink + Send + 'static>(
    link: L,
    readings: &Arc<SharedReadings>,
    shutdown: &Shutdown,
) -> Result<std::thread::JoinHandle<()>> {
    let mut trigger = FailoverTrigger::new(link, shutdown.delay());
    let mut sink = LogEventSink::new();
    let (readings, shutdown) = (Arc::clone(readings), shutdown.clone());
    let period = Duration::from_millis(failover::POLL_MS.into());
    spawn_task("failover", TASK_STACK_KB, move || {
        run_periodic::<Infallible>("failover", period, &shutdown, || {
            trigger.poll(&readings, &mut sink);
            Ok(())
        });
    })
    .context("spawning failover task")
}
