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

use log::{info, trace};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::SyncSender,
    Arc,
};
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::config::ControlConfig;
use crate::constants::TIMEOUT_RECEIVE_MS;
use crate::device::device_io::AnalogInput;
use crate::measurement::Measurement;
use crate::utility::time_device_call;

pub struct SamplerProcess {
    // Analog-to-digital converter.
    _adc: Box<dyn AnalogInput>,
    // Configuration.
    _config: Arc<ControlConfig>,
    // Sender of the measurement to the actuator.
    _sender_to_actuator: SyncSender<Measurement>,
    // Stop the loop.
    _stop: Arc<AtomicBool>,
}

impl SamplerProcess {
    /// Create a new instance of the sampler process.
    ///
    /// # Arguments
    /// * `adc` - Analog-to-digital converter.
    /// * `config` - Configuration.
    /// * `sender_to_actuator` - Sender to the actuator.
    /// * `stop` - An Arc instance that holds the AtomicBool instance to stop
    /// the loop.
    ///
    /// # Returns
    /// New instance of the sampler process.
    pub fn new(
        adc: Box<dyn AnalogInput>,
        config: &Arc<ControlConfig>,
        sender_to_actuator: SyncSender<Measurement>,
        stop: &Arc<AtomicBool>,
    ) -> Self {
        Self {
            _adc: adc,
            _config: config.clone(),
            _sender_to_actuator: sender_to_actuator,
            _stop: stop.clone(),
        }
    }

    /// Take one measurement. The speed channel is only read when there is no
    /// fixed speed.
    ///
    /// # Returns
    /// Measurement.
    pub fn sample(&mut self) -> Measurement {
        let flexing = self.read_channel(self._config.flexing_channel);
        let extending = self.read_channel(self._config.extending_channel);
        let speed = match self._config.fixed_speed {
            Some(speed) => speed,
            None => self.read_channel(self._config.speed_channel),
        };

        Measurement::new(flexing, extending, speed)
    }

    /// Read the analog channel within the device call budget.
    ///
    /// # Arguments
    /// * `channel` - Analog channel.
    ///
    /// # Returns
    /// Raw reading.
    fn read_channel(&mut self, channel: u8) -> i32 {
        let adc = &mut self._adc;
        time_device_call(
            &format!("read channel {channel}"),
            self._config.device_call_budget,
            || adc.read_raw(channel),
        )
    }

    /// Sleep for the configured interval in short slices, returning early
    /// when the stop flag is set.
    fn wait_interval(&self) {
        let deadline = Instant::now() + self._config.interval;
        let slice = Duration::from_millis(TIMEOUT_RECEIVE_MS);
        while !self._stop.load(Ordering::Relaxed) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            sleep(remaining.min(slice));
        }
    }

    /// Run the sampler. The loop ends when the stop flag is set or the
    /// actuator is gone.
    pub fn run(&mut self) {
        info!("Sampler is running.");

        let mut count = 0_u64;
        while !self._stop.load(Ordering::Relaxed) {
            let measurement = self.sample();
            trace!("Sample {count}: {measurement:?}.");

            // Blocks when the channel is full.
            if self._sender_to_actuator.send(measurement).is_err() {
                info!("Actuator is gone.");
                break;
            }
            count += 1;

            self.wait_interval();
        }

        info!("Sampler is stopped after {count} samples.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::mpsc::{sync_channel, Receiver};
    use std::sync::Mutex;
    use std::thread::spawn;

    use crate::config::Parameters;
    use crate::mock::mock_adc::MockAdc;

    fn create_config(speed: i32, interval: f64) -> Arc<ControlConfig> {
        let mut parameters =
            Parameters::from_file(Path::new("config/parameters_control.yaml")).unwrap();
        parameters.speed = speed;
        parameters.interval = interval;

        Arc::new(ControlConfig::new(&parameters).unwrap())
    }

    fn create_sampler_process(
        speed: i32,
        capacity: usize,
    ) -> (SamplerProcess, Receiver<Measurement>, Arc<Mutex<Vec<u8>>>) {
        let mut adc = MockAdc::new(true);
        adc.set_readings(1, vec![10, 11, 12, 13]);
        adc.set_readings(2, vec![20, 21, 22, 23]);
        adc.set_readings(3, vec![300, 301, 302, 303]);

        let read_log = adc.read_log.clone();

        let (sender, receiver) = sync_channel(capacity);
        let stop = Arc::new(AtomicBool::new(false));

        (
            SamplerProcess::new(Box::new(adc), &create_config(speed, 0.01), sender, &stop),
            receiver,
            read_log,
        )
    }

    #[test]
    fn test_sample_potentiometer() {
        let (mut sampler_process, _receiver, read_log) = create_sampler_process(-1, 1);

        assert_eq!(sampler_process.sample(), Measurement::new(10, 20, 300));
        assert_eq!(sampler_process.sample(), Measurement::new(11, 21, 301));

        // One read per channel per tick in the order flexing, extending, speed
        assert_eq!(*read_log.lock().unwrap(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_sample_pass_through() {
        let mut adc = MockAdc::new(false);
        adc.set_readings(1, vec![-5, 0, i32::MAX]);
        adc.set_readings(2, vec![5000, i32::MIN, 1024]);
        adc.set_readings(3, vec![0, -1, 5000]);

        let (sender, _receiver) = sync_channel(1);
        let stop = Arc::new(AtomicBool::new(false));
        let mut sampler_process =
            SamplerProcess::new(Box::new(adc), &create_config(-1, 0.01), sender, &stop);

        // Implausible readings are not filtered or clamped
        assert_eq!(sampler_process.sample(), Measurement::new(-5, 5000, 0));
        assert_eq!(sampler_process.sample(), Measurement::new(0, i32::MIN, -1));
        assert_eq!(
            sampler_process.sample(),
            Measurement::new(i32::MAX, 1024, 5000)
        );
    }

    #[test]
    fn test_sample_fixed_speed() {
        let (mut sampler_process, _receiver, read_log) = create_sampler_process(700, 1);

        for idx in 0..4 {
            let measurement = sampler_process.sample();

            assert_eq!(measurement.flexing, 10 + idx);
            assert_eq!(measurement.speed, 700);
        }

        // The speed channel is never read
        assert!(!read_log.lock().unwrap().contains(&3));
    }

    #[test]
    fn test_run() {
        let (mut sampler_process, receiver, _read_log) = create_sampler_process(-1, 100);
        let stop = sampler_process._stop.clone();

        let handle = spawn(move || {
            sampler_process.run();
        });

        sleep(Duration::from_millis(200));

        stop.store(true, Ordering::Relaxed);
        assert!(handle.join().is_ok());

        // Samples arrive in the order they are taken
        let measurements: Vec<Measurement> = receiver.try_iter().collect();
        assert!(measurements.len() >= 4);
        for (idx, measurement) in measurements.iter().enumerate() {
            let offset = (idx % 4) as i32;
            assert_eq!(
                *measurement,
                Measurement::new(10 + offset, 20 + offset, 300 + offset)
            );
        }
    }

    #[test]
    fn test_run_receiver_dropped() {
        let (mut sampler_process, receiver, _read_log) = create_sampler_process(-1, 1);
        drop(receiver);

        // Returns without the stop flag
        sampler_process.run();

        assert!(!sampler_process._stop.load(Ordering::Relaxed));
    }

    #[test]
    fn test_run_stop_during_interval() {
        let mut adc = MockAdc::new(false);
        adc.set_readings(1, vec![10]);

        let (sender, receiver) = sync_channel(10);
        let stop = Arc::new(AtomicBool::new(false));
        let mut sampler_process =
            SamplerProcess::new(Box::new(adc), &create_config(-1, 60.0), sender, &stop);

        let handle = spawn(move || {
            sampler_process.run();
        });

        sleep(Duration::from_millis(100));

        let start = Instant::now();
        stop.store(true, Ordering::Relaxed);
        assert!(handle.join().is_ok());

        // The sampler does not wait out the whole interval
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(receiver.try_iter().count(), 1);
    }
}
