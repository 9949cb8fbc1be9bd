//! Peripheral drivers written against embedded-hal traits.

pub mod button;
pub mod lcd1602;
