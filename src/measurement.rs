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

/// Raw readings taken in one sampling tick.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Measurement {
    // Reading of the flexing muscle sensor.
    pub flexing: i32,
    // Reading of the extending muscle sensor.
    pub extending: i32,
    // Fixed speed, or the reading of the speed potentiometer.
    pub speed: i32,
}

impl Measurement {
    /// Create a new measurement.
    ///
    /// # Arguments
    /// * `flexing` - Reading of the flexing muscle sensor.
    /// * `extending` - Reading of the extending muscle sensor.
    /// * `speed` - Speed value.
    ///
    /// # Returns
    /// A new measurement.
    pub fn new(flexing: i32, extending: i32, speed: i32) -> Self {
        Self {
            flexing,
            extending,
            speed,
        }
    }
}
