//! Unified error types for the site monitor.
//!
//! A single `Error` enum that every subsystem converts into, so each task
//! loop handles failures the same way. Variants are `Copy` where the
//! payload allows it so they can be logged and returned without allocation.
//!
//! Errors fall into the classes the task loops care about:
//!
//! | Class                  | Type             | Loop behaviour                 |
//! |------------------------|------------------|--------------------------------|
//! | Transient sensor noise | `SensorError`    | swallowed, last value retained |
//! | Hardware fault         | `SensorError`    | task stops, error logged       |
//! | Serial frame noise     | `SerialError`    | swallowed, last value retained |
//! | Alert delivery failure | `NotifyError`    | logged, next recipient tried   |
//! | Failover link failure  | `LinkError`      | logged, flag still cleared     |

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the monitor funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The climate sensor could not be read.
    Sensor(SensorError),
    /// The UPS serial link failed or delivered garbage.
    Serial(SerialError),
    /// An alert could not be delivered.
    Notify(NotifyError),
    /// The failover link could not be controlled.
    Link(LinkError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The display device rejected a write.
    Display(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Serial(e) => write!(f, "serial: {e}"),
            Self::Notify(e) => write!(f, "notify: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Display(msg) => write!(f, "display: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Checksum on the one-wire frame did not validate.
    Checksum,
    /// The sensor returned fewer bits than a full frame.
    ShortRead,
    /// The driver timed out waiting for the sensor to answer.
    Timeout,
    /// The sensor device node is missing (driver not loaded, wrong path).
    DeviceMissing,
    /// The driver returned data that is not a number.
    Garbled,
    /// Any other I/O failure, carrying the raw OS error code when known.
    Io(Option<i32>),
}

impl SensorError {
    /// True for the known wiring-noise class that should be swallowed.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Checksum | Self::ShortRead | Self::Timeout)
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksum => write!(f, "checksum did not validate"),
            Self::ShortRead => write!(f, "a full buffer was not returned"),
            Self::Timeout => write!(f, "sensor timed out"),
            Self::DeviceMissing => write!(f, "sensor device not found"),
            Self::Garbled => write!(f, "sensor returned non-numeric data"),
            Self::Io(Some(code)) => write!(f, "I/O error (os error {code})"),
            Self::Io(None) => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Serial errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// No complete line arrived before the read timeout.
    Timeout,
    /// A line arrived but did not have the expected fields.
    MalformedFrame,
    /// The port could not be read at all.
    Io,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "read timed out"),
            Self::MalformedFrame => write!(f, "malformed UPS frame"),
            Self::Io => write!(f, "serial I/O error"),
        }
    }
}

impl std::error::Error for SerialError {}

impl From<SerialError> for Error {
    fn from(e: SerialError) -> Self {
        Self::Serial(e)
    }
}

// ---------------------------------------------------------------------------
// Alert transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The gateway could not be reached.
    Unreachable,
    /// The gateway answered with an error status.
    Rejected { status: u16, message: String },
    /// The gateway answered with something that is not a message receipt.
    BadResponse,
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "SMS gateway unreachable"),
            Self::Rejected { status, message } => {
                write!(f, "SMS gateway rejected message ({status}): {message}")
            }
            Self::BadResponse => write!(f, "unexpected SMS gateway response"),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<NotifyError> for Error {
    fn from(e: NotifyError) -> Self {
        Self::Notify(e)
    }
}

// ---------------------------------------------------------------------------
// Failover link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The dial-up command could not be started.
    SpawnFailed,
    /// The hang-up command failed.
    TeardownFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnFailed => write!(f, "failed to start failover link"),
            Self::TeardownFailed => write!(f, "failed to stop failover link"),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file does not exist or cannot be opened.
    NotFound,
    /// The file is not valid TOML for [`SiteConfig`](crate::config::SiteConfig).
    Parse(String),
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config file not found"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wiring_noise_is_transient() {
        assert!(SensorError::Checksum.is_transient());
        assert!(SensorError::ShortRead.is_transient());
        assert!(SensorError::Timeout.is_transient());
        assert!(!SensorError::DeviceMissing.is_transient());
        assert!(!SensorError::Garbled.is_transient());
        assert!(!SensorError::Io(Some(5)).is_transient());
    }

    #[test]
    fn display_is_prefixed_by_subsystem() {
        let e: Error = SerialError::MalformedFrame.into();
        assert_eq!(e.to_string(), "serial: malformed UPS frame");
        let e: Error = ConfigError::ValidationFailed("temp_range low >= high").into();
        assert_eq!(
            e.to_string(),
            "config: validation failed: temp_range low >= high"
        );
    }
}
