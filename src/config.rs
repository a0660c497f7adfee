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

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::constants::NUM_ADC_CHANNEL;
use crate::enums::AdcBitRate;
use crate::error::ConfigError;
use crate::utility::get_config;

/// Parameters as written in the parameters file. Each value can be overridden
/// from the command line before the configuration is validated.
#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct Parameters {
    pub address: u16,
    pub adc_bit_rate: u8,
    pub flexing_channel: u8,
    pub extending_channel: u8,
    pub speed_channel: u8,
    pub motor_in1: u8,
    pub motor_in2: u8,
    pub motor_ena: u8,
    pub pwm_frequency: f64,
    pub interval: f64,
    pub speed: i32,
    pub threshold: i32,
    pub channel_capacity: usize,
    pub device_call_budget_ms: u64,
}

impl Parameters {
    /// Read the parameters from the file.
    ///
    /// # Arguments
    /// * `filepath` - Path to the parameters file.
    ///
    /// # Returns
    /// Parameters.
    ///
    /// # Errors
    /// If the file can not be read or a key is missing.
    pub fn from_file(filepath: &Path) -> Result<Self, ConfigError> {
        get_config(filepath)?
            .try_deserialize()
            .map_err(|source| ConfigError::Read {
                path: filepath.to_string_lossy().to_string(),
                source,
            })
    }
}

/// Validated configuration shared by the sampler and the actuator. It is
/// never changed after the start-up.
#[derive(Clone, PartialEq, Debug)]
pub struct ControlConfig {
    // I2C address of the ADC board.
    pub address: u16,
    // Resolution of the converter.
    pub adc_bit_rate: AdcBitRate,
    // Analog channels.
    pub flexing_channel: u8,
    pub extending_channel: u8,
    pub speed_channel: u8,
    // Motor driver pins. IN1 is the extending direction, IN2 is the flexing
    // direction, and ENA is the PWM enable.
    pub motor_in1: u8,
    pub motor_in2: u8,
    pub motor_ena: u8,
    // PWM frequency in Hz.
    pub pwm_frequency: f64,
    // Time between two measurements.
    pub interval: Duration,
    // Fixed speed. None means the potentiometer is used.
    pub fixed_speed: Option<i32>,
    // A reading is active when 0 < reading < threshold.
    pub threshold: i32,
    // Bound of the handoff channel.
    pub channel_capacity: usize,
    // Time budget of a single device call.
    pub device_call_budget: Duration,
}

impl ControlConfig {
    /// Create a new control configuration.
    ///
    /// # Arguments
    /// * `parameters` - Parameters to validate.
    ///
    /// # Returns
    /// A new control configuration.
    ///
    /// # Errors
    /// If any parameter is out of its valid range.
    pub fn new(parameters: &Parameters) -> Result<Self, ConfigError> {
        let adc_bit_rate = AdcBitRate::from_repr(parameters.adc_bit_rate).ok_or_else(|| {
            ConfigError::invalid("adc_bit_rate", "should be one of 12, 14, 16, 18")
        })?;

        for (name, channel) in [
            ("flexing_channel", parameters.flexing_channel),
            ("extending_channel", parameters.extending_channel),
            ("speed_channel", parameters.speed_channel),
        ] {
            if channel < 1 || channel > NUM_ADC_CHANNEL {
                return Err(ConfigError::invalid(
                    name,
                    format!("{channel} is out of 1-{NUM_ADC_CHANNEL}"),
                ));
            }
        }

        if parameters.flexing_channel == parameters.extending_channel {
            return Err(ConfigError::invalid(
                "extending_channel",
                "should differ from the flexing channel",
            ));
        }

        let pins = [
            parameters.motor_in1,
            parameters.motor_in2,
            parameters.motor_ena,
        ];
        if pins[0] == pins[1] || pins[0] == pins[2] || pins[1] == pins[2] {
            return Err(ConfigError::invalid(
                "motor pins",
                format!("IN1, IN2 and ENA should be distinct, got {pins:?}"),
            ));
        }

        if !(parameters.interval.is_finite() && parameters.interval > 0.0) {
            return Err(ConfigError::invalid(
                "interval",
                format!("{} should be positive", parameters.interval),
            ));
        }

        let interval = Duration::try_from_secs_f64(parameters.interval).map_err(|_| {
            ConfigError::invalid(
                "interval",
                format!("{} is too large", parameters.interval),
            )
        })?;

        if !(parameters.pwm_frequency.is_finite() && parameters.pwm_frequency > 0.0) {
            return Err(ConfigError::invalid(
                "pwm_frequency",
                format!("{} should be positive", parameters.pwm_frequency),
            ));
        }

        if parameters.threshold <= 0 {
            return Err(ConfigError::invalid(
                "threshold",
                format!("{} should be positive", parameters.threshold),
            ));
        }

        if parameters.channel_capacity == 0 {
            return Err(ConfigError::invalid(
                "channel_capacity",
                "should be at least 1",
            ));
        }

        Ok(Self {
            address: parameters.address,
            adc_bit_rate,

            flexing_channel: parameters.flexing_channel,
            extending_channel: parameters.extending_channel,
            speed_channel: parameters.speed_channel,

            motor_in1: parameters.motor_in1,
            motor_in2: parameters.motor_in2,
            motor_ena: parameters.motor_ena,

            pwm_frequency: parameters.pwm_frequency,

            interval,

            fixed_speed: if parameters.speed < 0 {
                None
            } else {
                Some(parameters.speed)
            },
            threshold: parameters.threshold,

            channel_capacity: parameters.channel_capacity,
            device_call_budget: Duration::from_millis(parameters.device_call_budget_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use tempfile::Builder;

    fn create_parameters() -> Parameters {
        Parameters::from_file(Path::new("config/parameters_control.yaml")).unwrap()
    }

    #[test]
    fn test_parameters_from_file() {
        let parameters = create_parameters();

        assert_eq!(parameters.address, 0x68);
        assert_eq!(parameters.adc_bit_rate, 12);
        assert_eq!(parameters.flexing_channel, 1);
        assert_eq!(parameters.extending_channel, 2);
        assert_eq!(parameters.speed_channel, 3);
        assert_eq!(parameters.motor_in1, 38);
        assert_eq!(parameters.motor_in2, 40);
        assert_eq!(parameters.motor_ena, 35);
        assert_eq!(parameters.interval, 0.1);
        assert_eq!(parameters.speed, -1);
        assert_eq!(parameters.threshold, 100);
    }

    #[test]
    fn test_parameters_from_file_missing_key() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "address: 0x68").unwrap();
        writeln!(file, "threshold: 100").unwrap();

        let result = Parameters::from_file(file.path());

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_new() {
        let config = ControlConfig::new(&create_parameters()).unwrap();

        assert_eq!(config.adc_bit_rate, AdcBitRate::Twelve);
        assert_eq!(config.interval, Duration::from_millis(100));
        assert_eq!(config.fixed_speed, None);
        assert_eq!(config.threshold, 100);
        assert_eq!(config.device_call_budget, Duration::from_millis(20));
    }

    #[test]
    fn test_new_fixed_speed() {
        let mut parameters = create_parameters();

        parameters.speed = 0;
        assert_eq!(ControlConfig::new(&parameters).unwrap().fixed_speed, Some(0));

        parameters.speed = 700;
        assert_eq!(
            ControlConfig::new(&parameters).unwrap().fixed_speed,
            Some(700)
        );
    }

    #[test]
    fn test_new_invalid_threshold() {
        let mut parameters = create_parameters();

        for threshold in [0, -5] {
            parameters.threshold = threshold;
            assert!(matches!(
                ControlConfig::new(&parameters),
                Err(ConfigError::Invalid {
                    name: "threshold",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_new_invalid_interval() {
        let mut parameters = create_parameters();

        for interval in [0.0, -0.1, f64::NAN, f64::INFINITY, 1e30] {
            parameters.interval = interval;
            assert!(matches!(
                ControlConfig::new(&parameters),
                Err(ConfigError::Invalid {
                    name: "interval",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_new_invalid_channels() {
        let mut parameters = create_parameters();
        parameters.speed_channel = 9;

        assert!(matches!(
            ControlConfig::new(&parameters),
            Err(ConfigError::Invalid {
                name: "speed_channel",
                ..
            })
        ));

        let mut parameters = create_parameters();
        parameters.extending_channel = parameters.flexing_channel;

        assert!(matches!(
            ControlConfig::new(&parameters),
            Err(ConfigError::Invalid {
                name: "extending_channel",
                ..
            })
        ));
    }

    #[test]
    fn test_new_invalid_pins() {
        let mut parameters = create_parameters();
        parameters.motor_ena = parameters.motor_in1;

        assert!(matches!(
            ControlConfig::new(&parameters),
            Err(ConfigError::Invalid {
                name: "motor pins",
                ..
            })
        ));
    }

    #[test]
    fn test_new_invalid_others() {
        let mut parameters = create_parameters();
        parameters.adc_bit_rate = 10;
        assert!(ControlConfig::new(&parameters).is_err());

        let mut parameters = create_parameters();
        parameters.pwm_frequency = 0.0;
        assert!(ControlConfig::new(&parameters).is_err());

        let mut parameters = create_parameters();
        parameters.channel_capacity = 0;
        assert!(ControlConfig::new(&parameters).is_err());
    }
}
