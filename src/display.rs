//! Screen composition and the display refresh step.
//!
//! The front panel is a 16×2 character LCD. The screen index in
//! [`SharedReadings`] selects one of three layouts; when the display is
//! toggled off the panel is cleared instead. Rendering is idempotent and
//! best-effort: a failed write is retried on the next refresh.

use core::fmt::Write as _;

use heapless::String;
use log::{info, warn};

use crate::app::ports::DisplayPort;
use crate::state::{Screen, SharedReadings};

/// Characters per LCD row.
pub const LCD_COLS: usize = 16;

/// One LCD row.
pub type LcdLine = String<LCD_COLS>;

/// Both LCD rows, top first.
pub type ScreenLines = [LcdLine; 2];

/// Build an LCD row, truncating at the panel width.
pub fn line(text: &str) -> LcdLine {
    let mut out = LcdLine::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

fn formatted(args: core::fmt::Arguments<'_>) -> LcdLine {
    let mut buf = std::string::String::new();
    let _ = buf.write_fmt(args);
    line(&buf)
}

/// Lay out `screen` from the current readings.
pub fn compose(screen: Screen, readings: &SharedReadings) -> ScreenLines {
    match screen {
        Screen::Climate => [
            formatted(format_args!("Temp: {:.1} F", readings.temperature())),
            formatted(format_args!("Hmd: {:.1} rH", readings.humidity())),
        ],
        Screen::Internet => [
            line("Internet Status:"),
            line(if readings.connected() {
                "Connected"
            } else {
                "Not Connected"
            }),
        ],
        Screen::Power => [
            line(if readings.power_good() {
                "PWR Status: Good"
            } else {
                "PWR Status: Bad"
            }),
            formatted(format_args!("Battery: {}%", readings.battery())),
        ],
    }
}

/// Push the selected screen (or a clear) to the panel.
pub fn refresh(display: &mut impl DisplayPort, readings: &SharedReadings) {
    if !readings.display_enabled() {
        if let Err(e) = display.clear() {
            warn!("Display: clear failed: {e}");
        }
        return;
    }

    let lines = compose(readings.screen(), readings);
    info!("{} | {}", lines[0], lines[1]);
    if let Err(e) = display.render(&lines) {
        warn!("Display: render failed: {e}");
    }
}
