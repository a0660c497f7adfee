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

use log::{debug, error, info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{Receiver, RecvTimeoutError},
    Arc,
};
use std::time::Duration;

use crate::config::ControlConfig;
use crate::constants::TIMEOUT_RECEIVE_MS;
use crate::control::bang_bang::{decide, MotorCommand};
use crate::device::device_io::MotorDriver;
use crate::enums::PinLevel;
use crate::error::DeviceError;
use crate::measurement::Measurement;
use crate::utility::time_device_call;

pub struct ActuatorProcess {
    // Motor driver (H-bridge).
    _driver: Box<dyn MotorDriver>,
    // Configuration.
    _config: Arc<ControlConfig>,
    // Receiver of the measurement from the sampler.
    _receiver_from_sampler: Receiver<Measurement>,
    // Stop the loop.
    _stop: Arc<AtomicBool>,
    // Number of the applied measurements.
    _count_applied: u64,
    // Number of the failed writes after the initialization.
    _count_failed_write: u64,
}

impl ActuatorProcess {
    /// Create a new instance of the actuator process.
    ///
    /// # Arguments
    /// * `driver` - Motor driver.
    /// * `config` - Configuration.
    /// * `receiver_from_sampler` - Receiver from the sampler.
    /// * `stop` - An Arc instance that holds the AtomicBool instance to stop
    /// the loop.
    ///
    /// # Returns
    /// New instance of the actuator process.
    pub fn new(
        driver: Box<dyn MotorDriver>,
        config: &Arc<ControlConfig>,
        receiver_from_sampler: Receiver<Measurement>,
        stop: &Arc<AtomicBool>,
    ) -> Self {
        Self {
            _driver: driver,
            _config: config.clone(),
            _receiver_from_sampler: receiver_from_sampler,
            _stop: stop.clone(),
            _count_applied: 0,
            _count_failed_write: 0,
        }
    }

    /// Put the H-bridge into the fail-stop state: both direction pins are low
    /// and the duty cycle is 0. This must succeed before any measurement is
    /// applied.
    ///
    /// # Errors
    /// If any pin can not be written.
    pub fn initialize(&mut self) -> Result<(), DeviceError> {
        self.write_fail_stop()?;

        info!(
            "Motor driver is initialized: IN1 {}, IN2 {}, ENA {}.",
            self._config.motor_in1, self._config.motor_in2, self._config.motor_ena
        );

        Ok(())
    }

    /// Write the fail-stop state.
    ///
    /// # Errors
    /// At the first pin that can not be written.
    fn write_fail_stop(&mut self) -> Result<(), DeviceError> {
        self.write_digital(self._config.motor_in1, PinLevel::Low)?;
        self.write_digital(self._config.motor_in2, PinLevel::Low)?;
        self.write_pwm(self._config.motor_ena, 0)
    }

    /// Apply the measurement to the motor driver. Every write is issued even
    /// if the pin already has the value. A failed write is logged and
    /// skipped.
    ///
    /// # Arguments
    /// * `measurement` - Measurement to apply.
    ///
    /// # Returns
    /// Motor command decided from the measurement.
    pub fn apply(&mut self, measurement: &Measurement) -> MotorCommand {
        let command = decide(measurement, self._config.threshold);
        debug!("Apply {measurement:?} as {command:?}.");

        for (pin, level) in [
            (self._config.motor_in1, command.extending),
            (self._config.motor_in2, command.flexing),
        ] {
            if let Err(error) = self.write_digital(pin, level) {
                self._count_failed_write += 1;
                warn!("Failed to set pin {pin} to {}: {error}.", level.as_ref());
            }
        }

        let pin = self._config.motor_ena;
        if let Err(error) = self.write_pwm(pin, command.duty) {
            self._count_failed_write += 1;
            warn!("Failed to set the duty of pin {pin} to {}: {error}.", command.duty);
        }

        self._count_applied += 1;

        command
    }

    /// Write the digital pin within the device call budget.
    ///
    /// # Arguments
    /// * `pin` - Pin identifier.
    /// * `level` - Level to set.
    ///
    /// # Errors
    /// If the pin can not be written.
    fn write_digital(&mut self, pin: u8, level: PinLevel) -> Result<(), DeviceError> {
        let driver = &mut self._driver;
        time_device_call(
            &format!("write pin {pin}"),
            self._config.device_call_budget,
            || driver.write_digital(pin, level),
        )
    }

    /// Write the PWM pin within the device call budget.
    ///
    /// # Arguments
    /// * `pin` - Pin identifier.
    /// * `duty` - Duty cycle.
    ///
    /// # Errors
    /// If the pin can not be written.
    fn write_pwm(&mut self, pin: u8, duty: u8) -> Result<(), DeviceError> {
        let driver = &mut self._driver;
        time_device_call(
            &format!("write PWM {pin}"),
            self._config.device_call_budget,
            || driver.write_pwm(pin, duty),
        )
    }

    /// Get the number of the applied measurements.
    ///
    /// # Returns
    /// Number of the applied measurements.
    pub fn count_applied(&self) -> u64 {
        self._count_applied
    }

    /// Get the number of the failed writes.
    ///
    /// # Returns
    /// Number of the failed writes.
    pub fn count_failed_write(&self) -> u64 {
        self._count_failed_write
    }

    /// Run the actuator. The loop ends when the stop flag is set or the
    /// sampler is gone. The H-bridge is put back into the fail-stop state at
    /// the end.
    pub fn run(&mut self) {
        info!("Actuator is running.");

        let timeout = Duration::from_millis(TIMEOUT_RECEIVE_MS);
        while !self._stop.load(Ordering::Relaxed) {
            match self._receiver_from_sampler.recv_timeout(timeout) {
                Ok(measurement) => {
                    self.apply(&measurement);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Sampler is gone.");
                    break;
                }
            }
        }

        if let Err(error) = self.write_fail_stop() {
            error!("Failed to put the motor driver into the fail-stop state: {error}.");
        }

        info!(
            "Actuator is stopped after {} measurements with {} failed writes.",
            self._count_applied, self._count_failed_write
        );
    }
}
