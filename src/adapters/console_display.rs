//! Display stand-in for hosts without the LCD.

use log::debug;

use crate::app::ports::DisplayPort;
use crate::display::ScreenLines;
use crate::error::Result;

/// Remembers what would be on the panel. The refresh step already logs
/// every frame, so this only tracks state.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    shown: Option<ScreenLines>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current panel contents; `None` when blank.
    pub fn shown(&self) -> Option<&ScreenLines> {
        self.shown.as_ref()
    }
}

impl DisplayPort for ConsoleDisplay {
    fn render(&mut self, lines: &ScreenLines) -> Result<()> {
        self.shown = Some(lines.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.shown.take().is_some() {
            debug!("Display cleared");
        }
        Ok(())
    }
}
