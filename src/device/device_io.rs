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

use crate::enums::PinLevel;
use crate::error::DeviceError;

pub trait AnalogInput: Send {
    /// Read the raw value of an analog channel.
    ///
    /// # Notes
    /// The read never fails. The implementation handles the transient faults
    /// by itself and supplies a defined value instead. The call is timed
    /// against the device call budget but never cancelled, so it should
    /// bound its own blocking time; the value it returns is always used.
    ///
    /// # Arguments
    /// * `channel` - Analog channel.
    ///
    /// # Returns
    /// Raw reading in the native range of the converter.
    fn read_raw(&mut self, channel: u8) -> i32;
}

pub trait MotorDriver: Send {
    /// Set the level of a digital output pin.
    ///
    /// # Notes
    /// Calls are timed against the device call budget and an overrun is only
    /// logged, so the implementation should bound its own blocking time.
    ///
    /// # Arguments
    /// * `pin` - Pin identifier.
    /// * `level` - Level to set.
    ///
    /// # Errors
    /// If the pin can not be written.
    fn write_digital(&mut self, pin: u8, level: PinLevel) -> Result<(), DeviceError>;

    /// Set the duty cycle of a PWM output pin.
    ///
    /// # Arguments
    /// * `pin` - Pin identifier.
    /// * `duty` - Duty cycle from 0 (off) to 255 (always on).
    ///
    /// # Errors
    /// If the pin can not be written.
    fn write_pwm(&mut self, pin: u8, duty: u8) -> Result<(), DeviceError>;
}
