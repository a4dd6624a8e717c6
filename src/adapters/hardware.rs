//! Pattern sensor head adapter.
//!
//! [`GpioSensor`] implements [`SensorPort`] over any
//! [`embedded_hal::digital::InputPin`]s: one presence line plus seven
//! feature lines read fresh on every call, bit 0 first.  On ESP-IDF the
//! pins come from [`crate::pins`]; on the host a simulation backend
//! drives the same trait for the demo loop.

use embedded_hal::digital::InputPin;

use crate::app::ports::SensorPort;
use crate::store::Pattern;

/// GPIO-backed sensor head.
///
/// A pin read error is treated as "line low" — the sensor contract has no
/// error path, and a floating line must never abort a command.
pub struct GpioSensor<P: InputPin> {
    presence: P,
    features: [P; 7],
    presence_active_high: bool,
}

impl<P: InputPin> GpioSensor<P> {
    pub fn new(presence: P, features: [P; 7], presence_active_high: bool) -> Self {
        Self {
            presence,
            features,
            presence_active_high,
        }
    }
}

impl<P: InputPin> SensorPort for GpioSensor<P> {
    fn presence(&mut self) -> bool {
        match self.presence.is_high() {
            Ok(level) => level == self.presence_active_high,
            Err(_) => false,
        }
    }

    fn read_pattern(&mut self) -> Pattern {
        let mut raw = 0u8;
        for (bit, line) in self.features.iter_mut().enumerate() {
            if line.is_high().unwrap_or(false) {
                raw |= 1 << bit;
            }
        }
        Pattern::new(raw)
    }
}

// ── ESP-IDF constructor ───────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp_impl::board_sensor;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

    use super::GpioSensor;
    use crate::error::Error;
    use crate::pins;

    type BoardPin = PinDriver<'static, AnyIOPin, Input>;

    fn input_pull_up(gpio: i32) -> Result<BoardPin, Error> {
        // SAFETY: pin numbers come from pins.rs and are claimed exactly once.
        let pin = unsafe { AnyIOPin::new(gpio) };
        let mut driver = PinDriver::input(pin).map_err(|_| Error::Init("sensor gpio"))?;
        driver
            .set_pull(Pull::Up)
            .map_err(|_| Error::Init("sensor gpio pull"))?;
        Ok(driver)
    }

    /// Claim the sensor-head pins from [`crate::pins`] and build the adapter.
    pub fn board_sensor(presence_active_high: bool) -> Result<GpioSensor<BoardPin>, Error> {
        let presence = input_pull_up(pins::PRESENCE_GPIO)?;
        let features = [
            input_pull_up(pins::FEATURE_GPIOS[0])?,
            input_pull_up(pins::FEATURE_GPIOS[1])?,
            input_pull_up(pins::FEATURE_GPIOS[2])?,
            input_pull_up(pins::FEATURE_GPIOS[3])?,
            input_pull_up(pins::FEATURE_GPIOS[4])?,
            input_pull_up(pins::FEATURE_GPIOS[5])?,
            input_pull_up(pins::FEATURE_GPIOS[6])?,
        ];
        Ok(GpioSensor::new(presence, features, presence_active_high))
    }
}

// ── Host simulation backend ───────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use sim::{SimSensor, SimSensorHandle};

#[cfg(not(target_os = "espidf"))]
mod sim {
    use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
    use std::sync::Arc;

    use crate::app::ports::SensorPort;
    use crate::store::Pattern;

    /// Host-side stand-in for the sensor head; the paired
    /// [`SimSensorHandle`] pokes presence/pattern from another thread.
    pub struct SimSensor {
        present: Arc<AtomicBool>,
        pattern: Arc<AtomicU8>,
    }

    #[derive(Clone)]
    pub struct SimSensorHandle {
        present: Arc<AtomicBool>,
        pattern: Arc<AtomicU8>,
    }

    impl SimSensor {
        pub fn new() -> (Self, SimSensorHandle) {
            let present = Arc::new(AtomicBool::new(false));
            let pattern = Arc::new(AtomicU8::new(0));
            let handle = SimSensorHandle {
                present: present.clone(),
                pattern: pattern.clone(),
            };
            (Self { present, pattern }, handle)
        }
    }

    impl SimSensorHandle {
        pub fn set_present(&self, present: bool) {
            self.present.store(present, Ordering::Release);
        }

        pub fn set_pattern(&self, raw: u8) {
            self.pattern.store(raw & 0x7F, Ordering::Release);
        }
    }

    impl SensorPort for SimSensor {
        fn presence(&mut self) -> bool {
            self.present.load(Ordering::Acquire)
        }

        fn read_pattern(&mut self) -> Pattern {
            Pattern::new(self.pattern.load(Ordering::Acquire))
        }
    }
}
