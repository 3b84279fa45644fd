//! ESP32 implementations of the domain ports, network tasks and logging.

pub(crate) mod config;
pub mod adapters;
pub mod drivers;
pub mod tasks;
