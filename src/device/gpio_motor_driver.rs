// This file is part of run_arm_controller.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use log::info;
use rppal::gpio::{Gpio, OutputPin};
use std::collections::HashMap;

use crate::constants::PWM_MAX_DUTY;
use crate::device::device_io::MotorDriver;
use crate::enums::PinLevel;
use crate::error::DeviceError;
use crate::utility::header_pin_to_bcm;

/// Motor driver on the GPIO of the Raspberry Pi. The pins are identified by
/// their physical number on the 40-pin header.
pub struct GpioMotorDriver {
    // Claimed output pins keyed by the header pin number.
    _pins: HashMap<u8, OutputPin>,
    // Frequency of the software PWM in Hz.
    _pwm_frequency: f64,
}

impl GpioMotorDriver {
    /// Create a new GPIO motor driver and claim the pins as outputs in the
    /// low state.
    ///
    /// # Arguments
    /// * `pins` - Header pins to claim.
    /// * `pwm_frequency` - Frequency of the PWM in Hz.
    ///
    /// # Returns
    /// A new GPIO motor driver.
    ///
    /// # Errors
    /// If the GPIO is not available or a pin can not be claimed.
    pub fn new(pins: &[u8], pwm_frequency: f64) -> Result<Self, DeviceError> {
        let gpio = Gpio::new()?;

        let mut output_pins = HashMap::new();
        for pin in pins {
            let bcm = header_pin_to_bcm(*pin)?;
            output_pins.insert(*pin, gpio.get(bcm)?.into_output_low());

            info!("Header pin {pin} (GPIO {bcm}) is claimed as output.");
        }

        Ok(Self {
            _pins: output_pins,
            _pwm_frequency: pwm_frequency,
        })
    }

    /// Get the claimed output pin.
    ///
    /// # Arguments
    /// * `pin` - Header pin.
    ///
    /// # Returns
    /// Output pin.
    ///
    /// # Errors
    /// If the pin is not claimed.
    fn output_pin(&mut self, pin: u8) -> Result<&mut OutputPin, DeviceError> {
        self._pins
            .get_mut(&pin)
            .ok_or(DeviceError::PinNotClaimed(pin))
    }
}

impl MotorDriver for GpioMotorDriver {
    fn write_digital(&mut self, pin: u8, level: PinLevel) -> Result<(), DeviceError> {
        let output = self.output_pin(pin)?;
        match level {
            PinLevel::High => output.set_high(),
            PinLevel::Low => output.set_low(),
        }

        Ok(())
    }

    fn write_pwm(&mut self, pin: u8, duty: u8) -> Result<(), DeviceError> {
        let frequency = self._pwm_frequency;
        let duty_cycle = (duty as f64) / (PWM_MAX_DUTY as f64);

        self.output_pin(pin)?
            .set_pwm_frequency(frequency, duty_cycle)
            .map_err(|error| DeviceError::Write {
                pin,
                reason: error.to_string(),
            })
    }
}
