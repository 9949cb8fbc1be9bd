//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. All tests run on the host with no real
//! hardware, processes, or sleeping.

mod failover_flow_tests;
mod mock_hw;
mod monitor_tests;
mod sampler_tests;
