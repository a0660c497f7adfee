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

use log::{info, warn};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag::register,
};
use std::sync::atomic::Ordering;
use std::thread::sleep;
use std::time::Duration;

use crate::config::ControlConfig;
use crate::device::{
    adc_pi::AdcPi,
    device_io::{AnalogInput, MotorDriver},
    gpio_motor_driver::GpioMotorDriver,
};
use crate::error::DeviceError;
use crate::mock::{mock_adc::MockAdc, mock_motor_driver::MockMotorDriver};
use crate::model::Model;

/// Run the application until SIGINT or SIGTERM, or until a process stops by
/// itself.
///
/// # Arguments
/// * `config` - Validated configuration.
/// * `is_simulation_mode` - Is the simulation mode or not.
///
/// # Errors
/// If the devices can not be opened or the motor driver can not be
/// initialized. No process is running in this case.
pub fn run(config: ControlConfig, is_simulation_mode: bool) -> Result<(), DeviceError> {
    // Log the running mode
    let mode = if is_simulation_mode {
        "simulation mode"
    } else {
        "hardware mode"
    };
    info!("Run the arm controller in {mode}.");

    let (adc, driver) = create_devices(&config, is_simulation_mode)?;

    let mut model = Model::new(config);

    // Register the signals that stop the application
    for signal in [SIGTERM, SIGINT].iter() {
        if let Err(error) = register(*signal, model.stop.clone()) {
            warn!("Failed to register the signal {signal}: {error}.");
        }
    }

    // Run the processes
    model.run_processes(adc, driver)?;

    // Wait until stopped
    while !model.stop.load(Ordering::Relaxed) && model.is_running() {
        sleep(Duration::from_millis(100));
    }

    info!("Stopping the arm controller...");

    model.stop();

    info!("Arm controller is stopped.");

    Ok(())
}

/// Create the devices.
///
/// # Arguments
/// * `config` - Validated configuration.
/// * `is_simulation_mode` - Is the simulation mode or not.
///
/// # Returns
/// Analog-to-digital converter and motor driver.
///
/// # Errors
/// If a hardware device can not be opened or a pin can not be claimed.
fn create_devices(
    config: &ControlConfig,
    is_simulation_mode: bool,
) -> Result<(Box<dyn AnalogInput>, Box<dyn MotorDriver>), DeviceError> {
    if is_simulation_mode {
        return Ok((
            Box::new(MockAdc::simulated(
                config.flexing_channel,
                config.extending_channel,
                config.speed_channel,
            )),
            Box::new(MockMotorDriver::new(false)),
        ));
    }

    let adc = AdcPi::new(config.address, config.adc_bit_rate)?;
    let driver = GpioMotorDriver::new(
        &[config.motor_in1, config.motor_in2, config.motor_ena],
        config.pwm_frequency,
    )?;

    Ok((Box::new(adc), Box::new(driver)))
}
