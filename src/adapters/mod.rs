//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter           | Implements           | Connects to                  |
//! |-------------------|----------------------|------------------------------|
//! | `iio_dht`         | ClimateSensor        | kernel dht11 IIO driver      |
//! | `ups_serial`      | UpsLine              | UPS HAT UART                 |
//! | `net_probe`       | ReachabilityProbe    | TCP connect to check host    |
//! | `link`            | LinkStatus           | /sys/class/net               |
//! |                   | FailoverLink         | pon / poff                   |
//! | `notifier`        | Notifier             | console or Twilio REST       |
//! | `sysfs_gpio`      | embedded-hal InputPin| /sys/class/gpio              |
//! | `console_display` | DisplayPort          | log output                   |
//! | `log_sink`        | EventSink            | log output                   |

pub mod console_display;
pub mod iio_dht;
pub mod link;
pub mod log_sink;
pub mod net_probe;
pub mod notifier;
pub mod sysfs_gpio;
pub mod ups_serial;
