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
use rppal::i2c::I2c;
use std::thread::sleep;
use std::time::Duration;

use crate::constants::{
    MAX_RETRY_ADC_READ, NUM_ADC_CHANNEL, NUM_ADC_CHANNEL_PER_CHIP, POLL_INTERVAL_ADC_MS,
};
use crate::device::device_io::AnalogInput;
use crate::enums::AdcBitRate;
use crate::error::DeviceError;

// Configuration register of the MCP3424: bit 7 is the ready flag, bits 6-5
// select the channel, bit 4 is the continuous mode, bits 3-2 are the sample
// rate and bits 1-0 are the gain (x1).
const CONFIG_READY: u8 = 0x80;
const CONFIG_CONTINUOUS: u8 = 0x10;

/// ADC Pi board: two MCP3424 converters on the I2C bus. Channels 1-4 are on
/// the converter at the base address and channels 5-8 on the next address.
pub struct AdcPi {
    _i2c: I2c,
    // Base I2C address.
    _address: u16,
    _bit_rate: AdcBitRate,
    // Last configuration written, as (address, configuration byte).
    _current_config: Option<(u16, u8)>,
    // Last good reading of each channel.
    _last_good: [i32; NUM_ADC_CHANNEL as usize],
}

impl AdcPi {
    /// Create a new ADC Pi instance.
    ///
    /// # Arguments
    /// * `address` - I2C address of the first converter.
    /// * `bit_rate` - Resolution of the conversion.
    ///
    /// # Returns
    /// A new ADC Pi instance.
    ///
    /// # Errors
    /// If the I2C bus can not be opened.
    pub fn new(address: u16, bit_rate: AdcBitRate) -> Result<Self, DeviceError> {
        let i2c = I2c::new()?;
        info!(
            "ADC Pi opened on I2C bus {} at address {address:#04x} with {} bits.",
            i2c.bus(),
            bit_rate as u8
        );

        Ok(Self {
            _i2c: i2c,
            _address: address,
            _bit_rate: bit_rate,
            _current_config: None,
            _last_good: [0; NUM_ADC_CHANNEL as usize],
        })
    }

    /// Read one conversion of the channel.
    ///
    /// # Arguments
    /// * `channel` - 1-based channel of the board.
    ///
    /// # Returns
    /// Raw conversion result.
    ///
    /// # Errors
    /// If the channel is unknown, the bus fails, or the conversion does not
    /// become ready in time.
    fn read_conversion(&mut self, channel: u8) -> Result<i32, DeviceError> {
        let (address, config) = select_chip(self._address, channel, self._bit_rate)?;

        if self._current_config != Some((address, config)) {
            self._i2c.set_slave_address(address)?;
            self._i2c.write(&[config])?;
            self._current_config = Some((address, config));
        }

        let num_data = self._bit_rate.data_bytes();
        let mut buffer = [0u8; 4];
        let max_poll = self._bit_rate.conversion_time_ms() * 2 / POLL_INTERVAL_ADC_MS;
        for _ in 0..max_poll {
            self._i2c.read(&mut buffer[..=num_data])?;

            if (buffer[num_data] & CONFIG_READY) == 0 {
                return Ok(decode_conversion(&buffer[..num_data], self._bit_rate));
            }

            sleep(Duration::from_millis(POLL_INTERVAL_ADC_MS));
        }

        Err(DeviceError::ConversionNotReady(channel))
    }
}

impl AnalogInput for AdcPi {
    fn read_raw(&mut self, channel: u8) -> i32 {
        for attempt in 1..=MAX_RETRY_ADC_READ {
            match self.read_conversion(channel) {
                Ok(value) => {
                    self._last_good[(channel - 1) as usize] = value;
                    return value;
                }
                Err(DeviceError::UnknownChannel(_)) => {
                    warn!("ADC channel {channel} does not exist. Use 0 instead.");
                    return 0;
                }
                Err(error) => {
                    warn!(
                        "Failed to read ADC channel {channel} ({attempt}/{MAX_RETRY_ADC_READ}): {error}."
                    );

                    // The configuration may not have reached the converter.
                    self._current_config = None;
                }
            }
        }

        let value = self._last_good[(channel - 1) as usize];
        warn!("Use the last good value {value} of ADC channel {channel}.");

        value
    }
}

/// Select the converter and the configuration byte of a channel.
///
/// # Arguments
/// * `address` - I2C address of the first converter.
/// * `channel` - 1-based channel of the board.
/// * `bit_rate` - Resolution of the conversion.
///
/// # Returns
/// I2C address of the converter and the configuration byte.
///
/// # Errors
/// If the channel is not in 1-8.
fn select_chip(
    address: u16,
    channel: u8,
    bit_rate: AdcBitRate,
) -> Result<(u16, u8), DeviceError> {
    if channel < 1 || channel > NUM_ADC_CHANNEL {
        return Err(DeviceError::UnknownChannel(channel));
    }

    let index = channel - 1;
    let chip = (index / NUM_ADC_CHANNEL_PER_CHIP) as u16;
    let chip_channel = index % NUM_ADC_CHANNEL_PER_CHIP;

    Ok((
        address + chip,
        CONFIG_READY | (chip_channel << 5) | CONFIG_CONTINUOUS | bit_rate.config_bits(),
    ))
}

/// Decode the data bytes of a conversion. The board is single-ended, so a
/// negative result (sign bit set) is reported as 0.
///
/// # Arguments
/// * `data` - Data bytes, most significant first.
/// * `bit_rate` - Resolution of the conversion.
///
/// # Returns
/// Raw value.
fn decode_conversion(data: &[u8], bit_rate: AdcBitRate) -> i32 {
    let raw = data
        .iter()
        .fold(0u32, |value, byte| (value << 8) | (*byte as u32))
        & bit_rate.data_mask();

    let sign_bit = (bit_rate.data_mask() + 1) >> 1;
    if (raw & sign_bit) != 0 {
        0
    } else {
        raw as i32
    }
}
