//! System configuration parameters
//!
//! All tunable parameters for the PrintLock device.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Console UART ---
    /// Command console baud rate
    pub uart_baud: u32,

    // --- Boot ---
    /// Settle delay before the READY banner is sent (milliseconds)
    pub boot_delay_ms: u16,

    // --- Sensor head ---
    /// Presence line polarity: true = HIGH means a subject is present
    pub presence_active_high: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            uart_baud: 9600,
            boot_delay_ms: 100,
            presence_active_high: true,
        }
    }
}
