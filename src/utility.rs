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

use config::Config;
use log::warn;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::constants::HEADER_PIN_TO_BCM;
use crate::error::{ConfigError, DeviceError};

/// Get the configuation from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
///
/// # Returns
/// The configuration.
///
/// # Errors
/// If the file can not be read or parsed.
pub fn get_config(filepath: &Path) -> Result<Config, ConfigError> {
    let name = filepath.to_string_lossy().to_string();

    Config::builder()
        .add_source(config::File::from(filepath))
        .build()
        .map_err(|source| ConfigError::Read { path: name, source })
}

/// Convert the physical pin number on the 40-pin header to the BCM GPIO
/// number.
///
/// # Parameters
/// * `pin` - Physical pin number.
///
/// # Returns
/// BCM GPIO number.
///
/// # Errors
/// If the pin is not a GPIO (power, ground, or out of the header).
pub fn header_pin_to_bcm(pin: u8) -> Result<u8, DeviceError> {
    HEADER_PIN_TO_BCM
        .iter()
        .find(|(header, _)| *header == pin)
        .map(|(_, bcm)| *bcm)
        .ok_or(DeviceError::UnknownPin(pin))
}

/// Run a device call and warn if it takes longer than the budget.
///
/// # Parameters
/// * `name` - Name of the call used in the log.
/// * `budget` - Time budget of the call. Zero disables the check.
/// * `call` - Device call.
///
/// # Returns
/// The result of the call.
pub fn time_device_call<T>(name: &str, budget: Duration, call: impl FnOnce() -> T) -> T {
    let now = Instant::now();
    let result = call();

    let elapsed = now.elapsed();
    if !budget.is_zero() && elapsed > budget {
        warn!(
            "Device call {name} took {} ms, longer than the budget of {} ms.",
            elapsed.as_millis(),
            budget.as_millis()
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread::sleep;

    #[test]
    fn test_get_config() {
        let config = get_config(Path::new("config/parameters_control.yaml")).unwrap();

        assert_eq!(config.get_int("threshold").unwrap(), 100);
        assert_eq!(config.get_float("interval").unwrap(), 0.1);
    }

    #[test]
    fn test_get_config_missing_file() {
        let result = get_config(Path::new("config/no_such_file.yaml"));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_header_pin_to_bcm() {
        // Historical motor pins
        assert_eq!(header_pin_to_bcm(38).unwrap(), 20);
        assert_eq!(header_pin_to_bcm(40).unwrap(), 21);
        assert_eq!(header_pin_to_bcm(35).unwrap(), 19);

        // Ground and out of the header
        assert!(matches!(
            header_pin_to_bcm(6),
            Err(DeviceError::UnknownPin(6))
        ));
        assert!(matches!(
            header_pin_to_bcm(41),
            Err(DeviceError::UnknownPin(41))
        ));
    }

    #[test]
    fn test_time_device_call() {
        let value = time_device_call("fast", Duration::from_millis(100), || 42);
        assert_eq!(value, 42);

        // Over the budget still returns the value
        let value = time_device_call("slow", Duration::from_millis(1), || {
            sleep(Duration::from_millis(5));
            7
        });
        assert_eq!(value, 7);
    }
}
