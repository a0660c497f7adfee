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

use crate::constants::{ADC_FULL_SCALE, PWM_MAX_DUTY};
use crate::enums::PinLevel;
use crate::measurement::Measurement;

/// Command to the H-bridge derived from one measurement.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MotorCommand {
    // Level of IN1 (extending direction).
    pub extending: PinLevel,
    // Level of IN2 (flexing direction).
    pub flexing: PinLevel,
    // Duty cycle of ENA.
    pub duty: u8,
}

/// The muscle is active or not.
///
/// # Arguments
/// * `reading` - Raw reading of the muscle sensor.
/// * `threshold` - Activation threshold.
///
/// # Returns
/// True if 0 < reading < threshold. Otherwise, False.
pub fn is_muscle_active(reading: i32, threshold: i32) -> bool {
    (reading > 0) && (reading < threshold)
}

/// Scale the speed from the ADC range (0-1023) to the duty cycle (0-255).
///
/// # Notes
/// The truncating integer division gives floor(speed / 1024 * 255), so the
/// full ADC range maps to 0-254. A speed outside the ADC range saturates.
///
/// # Arguments
/// * `speed` - Speed in the ADC range.
///
/// # Returns
/// Duty cycle.
pub fn speed_to_duty(speed: i32) -> u8 {
    let duty = (speed as i64) * (PWM_MAX_DUTY as i64) / ADC_FULL_SCALE;

    duty.clamp(0, PWM_MAX_DUTY as i64) as u8
}

/// Decide the motor command with the bang-bang control. The two muscles are
/// decided independently, so both directions can be high at the same time.
///
/// # Arguments
/// * `measurement` - Measurement of the tick.
/// * `threshold` - Activation threshold.
///
/// # Returns
/// Motor command.
pub fn decide(measurement: &Measurement, threshold: i32) -> MotorCommand {
    MotorCommand {
        extending: PinLevel::from_bool(is_muscle_active(measurement.extending, threshold)),
        flexing: PinLevel::from_bool(is_muscle_active(measurement.flexing, threshold)),
        duty: speed_to_duty(measurement.speed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_muscle_active() {
        let threshold = 100;

        for reading in 1..threshold {
            assert!(is_muscle_active(reading, threshold));
        }

        for reading in [i32::MIN, -1, 0, 100, 101, 1023, i32::MAX] {
            assert!(!is_muscle_active(reading, threshold));
        }
    }

    #[test]
    fn test_speed_to_duty() {
        assert_eq!(speed_to_duty(0), 0);
        assert_eq!(speed_to_duty(3), 0);
        assert_eq!(speed_to_duty(512), 127);
        assert_eq!(speed_to_duty(1023), 254);

        for speed in 0..1024 {
            let expected = ((speed as f64) / 1024.0 * 255.0).floor() as u8;
            assert_eq!(speed_to_duty(speed), expected);
        }
    }

    #[test]
    fn test_speed_to_duty_saturation() {
        assert_eq!(speed_to_duty(-1), 0);
        assert_eq!(speed_to_duty(i32::MIN), 0);
        assert_eq!(speed_to_duty(1024), 255);
        assert_eq!(speed_to_duty(4095), 255);
        assert_eq!(speed_to_duty(i32::MAX), 255);
    }

    #[test]
    fn test_decide() {
        let command = decide(&Measurement::new(150, 50, 512), 100);

        assert_eq!(
            command,
            MotorCommand {
                extending: PinLevel::High,
                flexing: PinLevel::Low,
                duty: 127,
            }
        );
    }

    #[test]
    fn test_decide_zero_readings() {
        let command = decide(&Measurement::new(0, 0, 800), 100);

        assert_eq!(command.extending, PinLevel::Low);
        assert_eq!(command.flexing, PinLevel::Low);
    }

    #[test]
    fn test_decide_both_active() {
        let command = decide(&Measurement::new(20, 30, 0), 100);

        assert_eq!(command.extending, PinLevel::High);
        assert_eq!(command.flexing, PinLevel::High);
        assert_eq!(command.duty, 0);
    }
}
