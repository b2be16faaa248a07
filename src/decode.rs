//! Sample decoding and calibration.
//!
//! Each axis arrives as a big-endian 16-bit word whose upper 14 bits hold a
//! two's complement value and whose lowest two bits carry no data:
//!
//! ```text
//!  15                              2  1   0
//! +----------------------------------+-------+
//! |   14-bit signed acceleration     |  --   |
//! +----------------------------------+-------+
//! ```
//!
//! Decoding drops the two non-data bits and sign-extends from bit 13. The
//! widths are fixed by the wire format.

use crate::params::Axis;
use crate::registers::RAW_AXIS_BYTES;

/// Number of non-data bits below each axis field.
pub const AXIS_SHIFT: u32 = 2;
/// Bit index of the sign bit once the field is right-aligned.
pub const AXIS_SIGN_BIT: u32 = 13;

/// Sign-extends `value` treating bit `index` as the sign bit.
#[inline]
pub const fn sign_extend(value: u32, index: u32) -> i32 {
    let unused = 31 - index;
    ((value << unused) as i32) >> unused
}

/// Decodes one big-endian axis word into its signed count.
#[inline]
pub const fn decode_axis(word: u16) -> i32 {
    sign_extend((word >> AXIS_SHIFT) as u32, AXIS_SIGN_BIT)
}

/// Three axis words as read in one burst transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// X, Y, Z words in host order.
    pub words: [u16; 3],
}

impl RawSample {
    /// Splits the burst buffer into its three big-endian words.
    pub fn from_be_bytes(raw: [u8; RAW_AXIS_BYTES]) -> Self {
        Self {
            words: [
                u16::from_be_bytes([raw[0], raw[1]]),
                u16::from_be_bytes([raw[2], raw[3]]),
                u16::from_be_bytes([raw[4], raw[5]]),
            ],
        }
    }

    /// Re-encodes the words exactly as they appeared on the wire.
    pub fn to_be_bytes(self) -> [u8; RAW_AXIS_BYTES] {
        let [x, y, z] = self.words.map(u16::to_be_bytes);
        [x[0], x[1], y[0], y[1], z[0], z[1]]
    }

    /// Raw word for a single axis.
    pub fn word(&self, axis: Axis) -> u16 {
        self.words[axis.scan_index()]
    }

    /// Decodes all three axes without calibration.
    pub fn decode(&self) -> Sample {
        let [x, y, z] = self.words.map(decode_axis);
        Sample { x, y, z }
    }
}

/// A decoded acceleration triplet in device counts (1 mg/LSB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// X-axis reading.
    pub x: i32,
    /// Y-axis reading.
    pub y: i32,
    /// Z-axis reading.
    pub z: i32,
}

impl Sample {
    /// Reading for a single axis.
    pub fn axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Per-axis additive calibration bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    bias: [i16; 3],
}

impl Calibration {
    /// Bias currently applied to `axis`.
    pub fn bias(&self, axis: Axis) -> i16 {
        self.bias[axis.scan_index()]
    }

    /// Replaces the bias applied to `axis`.
    pub fn set_bias(&mut self, axis: Axis, bias: i16) {
        self.bias[axis.scan_index()] = bias;
    }

    /// Adds the per-axis bias to a decoded sample.
    pub fn apply(&self, sample: Sample) -> Sample {
        Sample {
            x: sample.x + i32::from(self.bias[0]),
            y: sample.y + i32::from(self.bias[1]),
            z: sample.z + i32::from(self.bias[2]),
        }
    }
}
