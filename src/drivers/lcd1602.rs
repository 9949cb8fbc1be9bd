//! HD44780 16×2 character LCD behind a PCF8574 I2C backpack.
//!
//! The controller protocol (4-bit init, nibble strobes, DDRAM addressing)
//! lives in `hd44780-driver`. This adapter only fits each row to the panel
//! and maps bus failures onto [`Error::Display`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use hd44780_driver::HD44780;
use hd44780_driver::bus::DataBus;
use hd44780_driver::charset::CharsetWithFallback;
use hd44780_driver::memory_map::{DisplayMemoryMap, MemoryMap1602};
use hd44780_driver::setup::DisplayOptionsI2C;
use log::debug;

use crate::app::ports::DisplayPort;
use crate::display::{LCD_COLS, LcdLine, ScreenLines};
use crate::error::{Error, Result};

pub struct Lcd1602<B: DataBus, M: DisplayMemoryMap, C: CharsetWithFallback, D> {
    lcd: HD44780<B, M, C>,
    delay: D,
}

/// Initialise the panel on `address` and leave it blank.
pub fn open<I: I2c, D: DelayNs>(
    i2c: I,
    mut delay: D,
    address: u8,
) -> Result<Lcd1602<impl DataBus, impl DisplayMemoryMap, impl CharsetWithFallback, D>> {
    let options = DisplayOptionsI2C::new(MemoryMap1602::new()).with_i2c_bus(i2c, address);
    let lcd = HD44780::new(options, &mut delay)
        .map_err(|_| Error::Display("LCD backpack did not acknowledge"))?;
    debug!("LCD ready at 0x{:02x}", address);
    Ok(Lcd1602 { lcd, delay })
}

/// Pad to the panel width; the character ROM only has ASCII in its lower half.
fn fit(text: &str) -> LcdLine {
    let mut out = LcdLine::new();
    for c in text.chars().take(LCD_COLS) {
        let _ = out.push(if c.is_ascii() { c } else { '?' });
    }
    while out.len() < LCD_COLS {
        let _ = out.push(' ');
    }
    out
}

impl<B, M, C, D> DisplayPort for Lcd1602<B, M, C, D>
where
    B: DataBus,
    M: DisplayMemoryMap,
    C: CharsetWithFallback,
    D: DelayNs,
{
    fn render(&mut self, lines: &ScreenLines) -> Result<()> {
        for (row, text) in (0u8..).zip(lines.iter()) {
            self.lcd
                .set_cursor_xy((0, row), &mut self.delay)
                .map_err(|_| Error::Display("LCD cursor move failed"))?;
            self.lcd
                .write_str(&fit(text), &mut self.delay)
                .map_err(|_| Error::Display("LCD write failed"))?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.lcd
            .clear(&mut self.delay)
            .map_err(|_| Error::Display("LCD clear failed"))
    }
}
