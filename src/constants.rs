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

// Analog-to-digital converter (ADC)
// The raw readings of the muscle sensors and the potentiometer are scaled
// against this full scale.
pub const ADC_FULL_SCALE: i64 = 1024;
// Number of analog input lines on the ADC Pi board (two chips, four each).
pub const NUM_ADC_CHANNEL: u8 = 8;
pub const NUM_ADC_CHANNEL_PER_CHIP: u8 = 4;

// Maximum retries of a failed I2C conversion before the last known good
// value is reused.
pub const MAX_RETRY_ADC_READ: usize = 3;

// Pulse-width modulation (PWM)
pub const PWM_MAX_DUTY: u8 = 255;

// Receive timeout of the actuator in milliseconds. The stop flag is checked
// at least this often while the handoff channel is empty.
pub const TIMEOUT_RECEIVE_MS: u64 = 50;

// Default path of the control parameters.
pub const FILEPATH_PARAMETERS_CONTROL: &str = "config/parameters_control.yaml";

// Default path of the log file.
pub const FILEPATH_LOG: &str = "application.log";

// Raspberry Pi 40-pin header. Each entry maps the physical pin number to the
// Broadcom (BCM) GPIO number. Power and ground pins are not listed.
pub const HEADER_PIN_TO_BCM: [(u8, u8); 28] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (27, 0),
    (28, 1),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

// Wait between two polls of the converter in milliseconds.
pub const POLL_INTERVAL_ADC_MS: u64 = 1;
