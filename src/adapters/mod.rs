//! Driven adapters — port-trait implementations for real hardware
//! (ESP-IDF) and for host simulation.  Everything ESP-IDF-specific is
//! guarded by `#[cfg(target_os = "espidf")]` inside each module.

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod serial;
