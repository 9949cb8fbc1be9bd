//! Site configuration.
//!
//! Loaded once at startup from a TOML file and immutable afterwards.
//! Every section falls back to [`Default`] when absent so a minimal file
//! only needs the site-specific values (location, recipients, credentials).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sitewatch/setup.toml";

/// Upper bound for `minute_interval`: one week.
pub const MAX_MINUTE_INTERVAL: u32 = 7 * 24 * 60;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub general: GeneralConfig,
    pub twilio: TwilioConfig,
    pub monitor: MonitorConfig,
    pub hardware: HardwareConfig,
}

/// Site identity and alert routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Announced at the top of every alert.
    pub location: String,
    /// Print alerts instead of sending them and never dial the failover link.
    pub debug: bool,
    /// Phone numbers (E.164) that receive every alert.
    pub alert_recipients: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            location: "Site".into(),
            debug: true,
            alert_recipients: Vec::new(),
        }
    }
}

/// Credentials for the SMS gateway. Only read when `debug = false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number owned by the account.
    pub messenger_number: String,
}

/// Thresholds and loop periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Host used for the reachability probe.
    pub check_host: String,
    pub check_port: u16,
    /// Acceptable temperature band, °F, inclusive.
    pub temp_range: (f32, f32),
    /// Acceptable humidity band, %RH, inclusive.
    pub humidity_range: (f32, f32),
    /// Minimum spacing between two alerts for the same channel (minutes).
    pub minute_interval: u32,
    /// Climate sampling period (seconds).
    pub up_env_interval: u32,
    /// Reachability probe period (seconds).
    pub up_conn_interval: u32,
    /// UPS polling period (seconds).
    pub up_power_interval: u32,
    /// Display refresh period (seconds).
    pub up_screen_interval: u32,
    /// Threshold evaluation period (seconds).
    pub monitor_interval: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_host: "8.8.8.8".into(),
            check_port: 53,
            temp_range: (53.0, 75.1),
            humidity_range: (20.0, 60.0),
            minute_interval: 30,
            up_env_interval: 5,
            up_conn_interval: 30,
            up_power_interval: 5,
            up_screen_interval: 2,
            monitor_interval: 20,
        }
    }
}

/// Device paths and pin numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// BCM pin of the front-panel button.
    pub button_gpio: u32,
    /// The button pulls the line low when pressed.
    pub button_active_low: bool,
    /// IIO device directory of the DHT22 (kernel `dht11` driver).
    pub dht_iio_device: String,
    /// Serial device of the UPS HAT.
    pub ups_device: String,
    pub ups_baud: u32,
    /// I2C bus of the LCD backpack. Empty = log the screen instead.
    pub lcd_i2c_bus: String,
    pub lcd_address: u8,
    /// Network interface created by the cellular dial-up.
    pub failover_interface: String,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            button_gpio: 4,
            button_active_low: true,
            dht_iio_device: "/sys/bus/iio/devices/iio:device0".into(),
            ups_device: "/dev/ttyAMA0".into(),
            ups_baud: 9600,
            lcd_i2c_bus: "/dev/i2c-1".into(),
            lcd_address: 0x27,
            failover_interface: "ppp0".into(),
        }
    }
}

impl SiteConfig {
    /// Read and validate the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound)?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without validating.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject values that would make the monitor misbehave silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.monitor;
        if self.general.location.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("location must not be empty"));
        }
        if self.general.alert_recipients.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "alert_recipients must list at least one number",
            ));
        }
        if !(m.temp_range.0 < m.temp_range.1) {
            return Err(ConfigError::ValidationFailed("temp_range low must be below high"));
        }
        if !(m.humidity_range.0 < m.humidity_range.1) {
            return Err(ConfigError::ValidationFailed(
                "humidity_range low must be below high",
            ));
        }
        if m.check_host.is_empty() || m.check_port == 0 {
            return Err(ConfigError::ValidationFailed("check_host/check_port unset"));
        }
        let intervals = [
            m.minute_interval,
            m.up_env_interval,
            m.up_conn_interval,
            m.up_power_interval,
            m.up_screen_interval,
            m.monitor_interval,
        ];
        if intervals.contains(&0) {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if m.minute_interval > MAX_MINUTE_INTERVAL {
            return Err(ConfigError::ValidationFailed(
                "minute_interval must not exceed one week",
            ));
        }
        if !self.general.debug {
            let t = &self.twilio;
            if t.account_sid.is_empty() || t.auth_token.is_empty() || t.messenger_number.is_empty()
            {
                return Err(ConfigError::ValidationFailed(
                    "twilio credentials required when debug = false",
                ));
            }
        }
        Ok(())
    }

    /// Number of monitor ticks that make up one cooldown window, rounded up
    /// so the window is never shorter than `minute_interval` minutes.
    /// Saturates at `i32::MAX` rather than wrapping.
    pub fn cooldown_ticks(&self) -> i32 {
        let Some(secs) = u64::from(self.monitor.minute_interval).checked_mul(60) else {
            return i32::MAX;
        };
        let ticks = secs.div_ceil(u64::from(self.monitor.monitor_interval.max(1)));
        i32::try_from(ticks).unwrap_or(i32::MAX)
    }

    pub fn env_period(&self) -> Duration {
        Duration::from_secs(self.monitor.up_env_interval.into())
    }

    pub fn conn_period(&self) -> Duration {
        Duration::from_secs(self.monitor.up_conn_interval.into())
    }

    pub fn power_period(&self) -> Duration {
        Duration::from_secs(self.monitor.up_power_interval.into())
    }

    pub fn screen_period(&self) -> Duration {
        Duration::from_secs(self.monitor.up_screen_interval.into())
    }

    pub fn monitor_period(&self) -> Duration {
        Duration::from_secs(self.monitor.monitor_interval.into())
    }
}
