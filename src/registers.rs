//! Register map definitions for the MMA8491 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0x00;
/// Register address of `OUT_X_MSB`.
pub const REG_OUT_X_MSB: u8 = 0x01;

/// Default 7-bit I²C address of the device.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x55;

/// Number of consecutive bytes spanning X, Y, Z axis samples.
pub const RAW_AXIS_BYTES: usize = 6;

/// `STATUS` bits that must all be set before a burst read is valid (XDR, YDR, ZDR).
pub const STATUS_DATA_READY_MASK: u8 = 0b0000_0111;

/// Bitfield representation of the `STATUS` register (address `0x00`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // X-axis new data available (bit 0).
    pub x_ready: bool,
    // Y-axis new data available (bit 1).
    pub y_ready: bool,
    // Z-axis new data available (bit 2).
    pub z_ready: bool,
    // Any axis new data available (bit 3).
    pub xyz_ready: bool,
    // X-axis data overwritten before being read (bit 4).
    pub x_overwrite: bool,
    // Y-axis data overwritten before being read (bit 5).
    pub y_overwrite: bool,
    // Z-axis data overwritten before being read (bit 6).
    pub z_overwrite: bool,
    // Any axis data overwritten (bit 7).
    pub xyz_overwrite: bool,
}

impl Status {
    /// True when X, Y and Z all report fresh data.
    ///
    /// Only the three per-axis flags are consulted; the combined `xyz_ready`
    /// flag is ignored.
    pub fn all_axes_ready(self) -> bool {
        u8::from(self) & STATUS_DATA_READY_MASK == STATUS_DATA_READY_MASK
    }
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}
