//! PrintLock firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod rx;
pub mod store;

pub mod error;
pub mod pins;

// Adapter implementations; hardware backends are cfg-guarded inside.
pub mod adapters;
