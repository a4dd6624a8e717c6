//! PrintLock Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative command loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  GpioSensor      UartConsole     NvsAdapter  LogEventSink│
//! │  (SensorPort)    (ReplyPort)     (Storage)   (EventSink) │
//! │                                                          │
//! │  UART RX thread ──▶ LineAssembler ──▶ LineMailbox        │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ─────────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            AppService (pure logic)             │      │
//! │  │  parse · presence gate · pattern table         │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod app;
mod adapters;
mod config;
mod error;
mod pins;
mod rx;
mod store;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::log_sink::LogEventSink;
use adapters::nvs::NvsAdapter;
use app::ports::{ConfigPort, EventSink, ReplyPort, SensorPort, StoragePort};
use app::service::AppService;
use config::SystemConfig;
use rx::LineMailbox;
use store::PatternStore;

/// Pending command line, shared between the RX context and the main loop.
static RX_LINE: LineMailbox = LineMailbox::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("PrintLock v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. NVS + config ───────────────────────────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({e}), running with defaults and no persistence");
            // Continue without NVS — enrolments will not survive this session.
            // On next reboot, NVS should self-heal.
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({e}), using defaults");
            SystemConfig::default()
        }
    };

    // ── 3. Pattern store (persisted table + init marker) ──────
    let store = match PatternStore::open(&mut nvs) {
        Ok(s) => s,
        Err(e) => {
            warn!("PatternStore open failed ({e}), starting with an empty table");
            PatternStore::fresh()
        }
    };
    let mut service = AppService::new(store);
    let mut sink = LogEventSink::new();

    // ── 4. Hardware adapters + command loop ───────────────────
    #[cfg(target_os = "espidf")]
    {
        use esp_idf_hal::gpio::AnyIOPin;
        use esp_idf_hal::peripherals::Peripherals;
        use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
        use esp_idf_hal::units::Hertz;

        let peripherals =
            Peripherals::take().map_err(|_| anyhow::anyhow!("peripherals already taken"))?;

        let uart_config = UartConfig::default().baudrate(Hertz(config.uart_baud));
        // SAFETY: UART pin numbers come from pins.rs and are claimed once.
        let uart = UartDriver::new(
            peripherals.uart1,
            unsafe { AnyIOPin::new(pins::UART_TX_GPIO) },
            unsafe { AnyIOPin::new(pins::UART_RX_GPIO) },
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &uart_config,
        )
        .map_err(|e| anyhow::anyhow!("UART init failed: {e}"))?;

        let mut console = adapters::serial::split_uart(uart, &RX_LINE);
        let mut sensor = adapters::hardware::board_sensor(config.presence_active_high)
            .map_err(|e| anyhow::anyhow!("sensor init failed: {e}"))?;

        run(
            &mut service,
            &config,
            &mut sensor,
            &mut console,
            &mut nvs,
            &mut sink,
        )
    }

    #[cfg(not(target_os = "espidf"))]
    {
        // Host demo: commands come from stdin, replies go to stdout.  The
        // simulated sensor head reads "no subject" until a harness pokes it.
        let (mut sensor, _handle) = adapters::hardware::SimSensor::new();
        adapters::serial::spawn_stdin_reader(&RX_LINE);
        let mut console = adapters::serial::HostConsole;

        run(
            &mut service,
            &config,
            &mut sensor,
            &mut console,
            &mut nvs,
            &mut sink,
        )
    }
}

// ── Command loop ──────────────────────────────────────────────

/// Settle, announce `READY`, then poll the mailbox forever.
///
/// Each pass either fully dispatches one pending command line or does
/// nothing; byte receive continues asynchronously in the RX thread.
fn run(
    service: &mut AppService,
    config: &SystemConfig,
    sensor: &mut impl SensorPort,
    console: &mut impl ReplyPort,
    storage: &mut impl StoragePort,
    sink: &mut impl EventSink,
) -> Result<()> {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(
        config.boot_delay_ms,
    )));
    service.announce_ready(console, sink);
    info!("System ready. Entering command loop.");

    loop {
        service.poll(&RX_LINE, sensor, console, storage, sink);
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}
