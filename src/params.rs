//! Strongly typed parameter enumerations for the MMA8491 driver.
//!
//! These enums name the device's axes and acquisition modes and are used
//! across the channel table, the decoder, and the high-level driver APIs.
//!
//! # Examples
//!
//! ```rust
//! use mma8491::params::{AcquisitionMode, Axis};
//!
//! assert_eq!(Axis::Y.scan_index(), 1);
//! assert_eq!(AcquisitionMode::default(), AcquisitionMode::Idle);
//! ```

/// Measurement axes, ordered as they appear in a burst sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis (`OUT_X`, scan index 0).
    X,
    /// Y axis (`OUT_Y`, scan index 1).
    Y,
    /// Z axis (`OUT_Z`, scan index 2).
    Z,
}

impl Axis {
    /// All axes in scan order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis within a burst sample.
    pub const fn scan_index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Ownership state of the acquisition sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionMode {
    /// On-demand reads are allowed.
    #[default]
    Idle,
    /// The triggered pipeline owns the device; on-demand reads are rejected.
    Streaming,
}

/// Sign of a scan element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sign {
    /// Two's complement.
    Signed,
    /// Plain binary.
    Unsigned,
}

/// Byte order of a scan element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endianness {
    /// Most significant byte first, as transmitted by the device.
    Big,
    /// Native byte order of the host CPU.
    Cpu,
}
