//! Sitewatch library.
//!
//! Exposes the monitoring core and the Linux adapters for the daemon and
//! for integration testing. Everything hardware-specific sits behind the
//! port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod alert;
pub mod app;
pub mod config;
pub mod display;
pub mod drivers;
pub mod error;
pub mod failover;
pub mod monitor;
pub mod scheduler;
pub mod sensors;
pub mod state;
