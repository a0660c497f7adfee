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

use strum_macros::{AsRefStr, EnumIter, FromRepr};

/// Level of a digital output pin.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, Eq, Hash, EnumIter, AsRefStr)]
#[repr(u8)]
pub enum PinLevel {
    Low = 0,
    High = 1,
}

impl PinLevel {
    /// Get the level from a boolean state.
    ///
    /// # Arguments
    /// * `is_high` - The pin should be high or not.
    ///
    /// # Returns
    /// Pin level.
    pub fn from_bool(is_high: bool) -> Self {
        if is_high {
            Self::High
        } else {
            Self::Low
        }
    }
}

/// Resolution of the analog-to-digital converter in bits.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, EnumIter)]
#[repr(u8)]
pub enum AdcBitRate {
    Twelve = 12,
    Fourteen = 14,
    Sixteen = 16,
    Eighteen = 18,
}

impl AdcBitRate {
    /// Sample rate bits (S1, S0) of the MCP3424 configuration register.
    ///
    /// # Returns
    /// Configuration bits already shifted into place.
    pub fn config_bits(&self) -> u8 {
        match self {
            Self::Twelve => 0x00,
            Self::Fourteen => 0x04,
            Self::Sixteen => 0x08,
            Self::Eighteen => 0x0C,
        }
    }

    /// Time of a single conversion in milliseconds, rounded up.
    ///
    /// # Returns
    /// Conversion time.
    pub fn conversion_time_ms(&self) -> u64 {
        match self {
            Self::Twelve => 5,
            Self::Fourteen => 17,
            Self::Sixteen => 67,
            Self::Eighteen => 267,
        }
    }

    /// Number of data bytes returned by a conversion.
    ///
    /// # Returns
    /// Number of bytes before the configuration byte.
    pub fn data_bytes(&self) -> usize {
        match self {
            Self::Eighteen => 3,
            _ => 2,
        }
    }

    /// Mask of the valid data bits in the raw conversion result.
    ///
    /// # Returns
    /// Bit mask.
    pub fn data_mask(&self) -> u32 {
        match self {
            Self::Twelve => 0x0FFF,
            Self::Fourteen => 0x3FFF,
            Self::Sixteen => 0xFFFF,
            Self::Eighteen => 0x3FFFF,
        }
    }
}
