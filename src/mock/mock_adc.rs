use std::collections::HashMap;
use std::iter::repeat;
use std::sync::{Arc, Mutex};

use crate::constants::ADC_FULL_SCALE;
use crate::device::device_io::AnalogInput;
use crate::mock::mock_constants::{
    SIMULATION_READING_ACTIVE, SIMULATION_READING_RELAXED, SIMULATION_SPEED_STEP,
    SIMULATION_TICKS_PER_PHASE,
};

/// Mock analog-to-digital converter. Each channel replays its readings in a
/// cycle. A channel without readings reads 0.
pub struct MockAdc {
    // Readings of each channel and the index of the next one.
    _readings: HashMap<u8, (Vec<i32>, usize)>,
    // Channels in the order they are read.
    pub read_log: Arc<Mutex<Vec<u8>>>,
    _is_recording: bool,
}

impl MockAdc {
    /// Create a new mock ADC.
    ///
    /// # Arguments
    /// * `is_recording` - Record the read channels in the log or not.
    ///
    /// # Returns
    /// A new mock ADC.
    pub fn new(is_recording: bool) -> Self {
        Self {
            _readings: HashMap::new(),
            read_log: Arc::new(Mutex::new(Vec::new())),
            _is_recording: is_recording,
        }
    }

    /// Create a mock ADC that simulates a slow cycle of flexing, extending
    /// and resting, with the speed potentiometer ramping over its range.
    ///
    /// # Arguments
    /// * `flexing_channel` - Channel of the flexing muscle.
    /// * `extending_channel` - Channel of the extending muscle.
    /// * `speed_channel` - Channel of the speed potentiometer.
    ///
    /// # Returns
    /// A new mock ADC.
    pub fn simulated(flexing_channel: u8, extending_channel: u8, speed_channel: u8) -> Self {
        let phase = |value: i32| repeat(value).take(SIMULATION_TICKS_PER_PHASE);

        let flexing = phase(SIMULATION_READING_ACTIVE)
            .chain(phase(SIMULATION_READING_RELAXED))
            .chain(phase(SIMULATION_READING_RELAXED))
            .collect();
        let extending = phase(SIMULATION_READING_RELAXED)
            .chain(phase(SIMULATION_READING_ACTIVE))
            .chain(phase(SIMULATION_READING_RELAXED))
            .collect();
        let speed = (0..(ADC_FULL_SCALE as i32))
            .step_by(SIMULATION_SPEED_STEP as usize)
            .collect();

        let mut adc = Self::new(false);
        adc.set_readings(flexing_channel, flexing);
        adc.set_readings(extending_channel, extending);
        adc.set_readings(speed_channel, speed);

        adc
    }

    /// Set the readings of the channel.
    ///
    /// # Arguments
    /// * `channel` - Analog channel.
    /// * `readings` - Readings to replay in a cycle.
    pub fn set_readings(&mut self, channel: u8, readings: Vec<i32>) {
        self._readings.insert(channel, (readings, 0));
    }
}

impl AnalogInput for MockAdc {
    fn read_raw(&mut self, channel: u8) -> i32 {
        if self._is_recording {
            if let Ok(mut read_log) = self.read_log.lock() {
                read_log.push(channel);
            }
        }

        match self._readings.get_mut(&channel) {
            Some((readings, index)) if !readings.is_empty() => {
                let value = readings[*index];
                *index = (*index + 1) % readings.len();

                value
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_raw() {
        let mut adc = MockAdc::new(true);
        adc.set_readings(1, vec![10, 20, 30]);

        let values: Vec<i32> = (0..5).map(|_| adc.read_raw(1)).collect();

        assert_eq!(values, vec![10, 20, 30, 10, 20]);
        assert_eq!(adc.read_raw(2), 0);

        assert_eq!(*adc.read_log.lock().unwrap(), vec![1, 1, 1, 1, 1, 2]);
    }

    #[test]
    fn test_read_raw_not_recording() {
        let mut adc = MockAdc::new(false);
        adc.read_raw(1);

        assert!(adc.read_log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_simulated() {
        let mut adc = MockAdc::simulated(1, 2, 3);

        // Flexing phase
        assert_eq!(adc.read_raw(1), SIMULATION_READING_ACTIVE);
        assert_eq!(adc.read_raw(2), SIMULATION_READING_RELAXED);

        // Extending phase
        for _ in 1..SIMULATION_TICKS_PER_PHASE {
            adc.read_raw(1);
            adc.read_raw(2);
        }
        assert_eq!(adc.read_raw(1), SIMULATION_READING_RELAXED);
        assert_eq!(adc.read_raw(2), SIMULATION_READING_ACTIVE);

        // Speed ramps over the ADC range
        let speed: Vec<i32> = (0..17).map(|_| adc.read_raw(3)).collect();
        assert_eq!(speed[0], 0);
        assert_eq!(speed[15], 960);
        assert_eq!(speed[16], 0);
    }
}
