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

use log::{error, info};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::sync_channel,
    Arc,
};
use std::thread::{spawn, JoinHandle};

use crate::config::ControlConfig;
use crate::control::{actuator_process::ActuatorProcess, sampler_process::SamplerProcess};
use crate::device::device_io::{AnalogInput, MotorDriver};
use crate::error::DeviceError;

pub struct Model {
    // Configuration shared by the processes.
    _config: Arc<ControlConfig>,
    // An Arc instance that holds the AtomicBool instance to stop the threads.
    pub stop: Arc<AtomicBool>,
    // Handles of the threads.
    _handles: Vec<JoinHandle<()>>,
}

impl Model {
    /// Create a new model.
    ///
    /// # Arguments
    /// * `config` - Validated configuration.
    ///
    /// # Returns
    /// A new model.
    pub fn new(config: ControlConfig) -> Self {
        Self {
            _config: Arc::new(config),
            stop: Arc::new(AtomicBool::new(false)),
            _handles: Vec::new(),
        }
    }

    /// Run the processes. The motor driver is initialized before any thread
    /// is spawned.
    ///
    /// # Arguments
    /// * `adc` - Analog-to-digital converter for the sampler.
    /// * `driver` - Motor driver for the actuator.
    ///
    /// # Errors
    /// If the motor driver can not be initialized. No process is running in
    /// this case.
    pub fn run_processes(
        &mut self,
        adc: Box<dyn AnalogInput>,
        driver: Box<dyn MotorDriver>,
    ) -> Result<(), DeviceError> {
        let (sender_to_actuator, receiver_from_sampler) =
            sync_channel(self._config.channel_capacity);

        let mut actuator_process =
            ActuatorProcess::new(driver, &self._config, receiver_from_sampler, &self.stop);
        actuator_process.initialize()?;

        let mut sampler_process =
            SamplerProcess::new(adc, &self._config, sender_to_actuator, &self.stop);

        self._handles.push(spawn(move || {
            actuator_process.run();
        }));
        self._handles.push(spawn(move || {
            sampler_process.run();
        }));

        info!(
            "Processes are running with the interval of {} ms and the threshold of {}.",
            self._config.interval.as_millis(),
            self._config.threshold
        );

        Ok(())
    }

    /// The processes are running or not.
    ///
    /// # Returns
    /// True if all the processes are running. Otherwise, False.
    pub fn is_running(&self) -> bool {
        !self._handles.is_empty() && self._handles.iter().all(|handle| !handle.is_finished())
    }

    /// Stop the threads.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);

        for handle in self._handles.drain(..) {
            if handle.join().is_err() {
                error!("Process panicked before it stopped.");
            }
        }
    }
}
