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

use thiserror::Error;

/// Errors of the control parameters. All of them are fatal at start-up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read the parameters file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: config::ConfigError,
    },

    #[error("invalid parameter {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    /// Create an invalid parameter error.
    ///
    /// # Arguments
    /// * `name` - Name of the parameter.
    /// * `reason` - Why the value is rejected.
    ///
    /// # Returns
    /// A new error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Errors of the device access (ADC, GPIO and PWM).
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("pin {0} is not a GPIO on the header")]
    UnknownPin(u8),

    #[error("pin {0} is not claimed by the motor driver")]
    PinNotClaimed(u8),

    #[error("ADC channel {0} is out of range")]
    UnknownChannel(u8),

    #[error("conversion of ADC channel {0} is not ready")]
    ConversionNotReady(u8),

    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("I2C error: {0}")]
    I2c(#[from] rppal::i2c::Error),

    #[error("failed to write pin {pin}: {reason}")]
    Write { pin: u8, reason: String },
}
