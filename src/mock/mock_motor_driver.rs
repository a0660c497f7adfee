use log::debug;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::device::device_io::MotorDriver;
use crate::enums::PinLevel;
use crate::error::DeviceError;

/// Write issued to the motor driver.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MotorWrite {
    Digital(u8, PinLevel),
    Pwm(u8, u8),
}

/// Mock motor driver that records the writes and fails the writes to the
/// selected pins.
pub struct MockMotorDriver {
    // Writes in the order they are issued. Failed writes are not recorded.
    pub writes: Arc<Mutex<Vec<MotorWrite>>>,
    // Writes to these pins fail.
    pub failing_pins: Arc<Mutex<HashSet<u8>>>,
    _is_recording: bool,
}

impl MockMotorDriver {
    /// Create a new mock motor driver.
    ///
    /// # Arguments
    /// * `is_recording` - Record the writes or not. The simulation mode runs
    /// without the recording to keep the memory bounded.
    ///
    /// # Returns
    /// A new mock motor driver.
    pub fn new(is_recording: bool) -> Self {
        Self {
            writes: Arc::new(Mutex::new(Vec::new())),
            failing_pins: Arc::new(Mutex::new(HashSet::new())),
            _is_recording: is_recording,
        }
    }

    /// Issue the write.
    ///
    /// # Arguments
    /// * `write` - Write to issue.
    ///
    /// # Errors
    /// If the pin is set to fail.
    fn issue(&mut self, write: MotorWrite) -> Result<(), DeviceError> {
        let pin = match write {
            MotorWrite::Digital(pin, _) | MotorWrite::Pwm(pin, _) => pin,
        };

        let is_failing = self
            .failing_pins
            .lock()
            .map(|pins| pins.contains(&pin))
            .unwrap_or(false);
        if is_failing {
            return Err(DeviceError::Write {
                pin,
                reason: String::from("simulated fault"),
            });
        }

        debug!("Mock motor driver: {write:?}.");
        if self._is_recording {
            if let Ok(mut writes) = self.writes.lock() {
                writes.push(write);
            }
        }

        Ok(())
    }
}

impl MotorDriver for MockMotorDriver {
    fn write_digital(&mut self, pin: u8, level: PinLevel) -> Result<(), DeviceError> {
        self.issue(MotorWrite::Digital(pin, level))
    }

    fn write_pwm(&mut self, pin: u8, duty: u8) -> Result<(), DeviceError> {
        self.issue(MotorWrite::Pwm(pin, duty))
    }
}
