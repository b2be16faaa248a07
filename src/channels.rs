//! Static channel descriptors consumed by a host sampling framework.
//!
//! The table mirrors what the device exposes: three acceleration channels
//! that are always sampled together, followed by a software timestamp.

use crate::params::{Axis, Endianness, Sign};

/// Layout of one element inside a scan record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanType {
    /// Signedness of the element.
    pub sign: Sign,
    /// Number of meaningful bits.
    pub realbits: u8,
    /// Number of bits the element occupies in the record.
    pub storagebits: u8,
    /// Right shift applied before masking to `realbits`.
    pub shift: u8,
    /// Byte order of the stored element.
    pub endianness: Endianness,
}

/// Queries a host can issue against a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelInfo {
    /// On-demand raw reading.
    Raw,
    /// Additive calibration bias.
    CalibBias,
    /// Conversion factor from counts to m/s².
    Scale,
    /// Sampling frequency.
    SamplingFrequency,
}

/// Set of [`ChannelInfo`] queries attached to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InfoMask {
    /// [`ChannelInfo::Raw`].
    pub raw: bool,
    /// [`ChannelInfo::CalibBias`].
    pub calibbias: bool,
    /// [`ChannelInfo::Scale`].
    pub scale: bool,
    /// [`ChannelInfo::SamplingFrequency`].
    pub sampling_frequency: bool,
}

impl InfoMask {
    /// Empty mask.
    pub const NONE: InfoMask = InfoMask {
        raw: false,
        calibbias: false,
        scale: false,
        sampling_frequency: false,
    };

    /// Whether `info` is part of this mask.
    pub const fn contains(&self, info: ChannelInfo) -> bool {
        match info {
            ChannelInfo::Raw => self.raw,
            ChannelInfo::CalibBias => self.calibbias,
            ChannelInfo::Scale => self.scale,
            ChannelInfo::SamplingFrequency => self.sampling_frequency,
        }
    }
}

/// What a channel measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelKind {
    /// Acceleration along one axis.
    Acceleration(Axis),
    /// Monotonic capture time in nanoseconds.
    Timestamp,
}

/// Immutable description of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSpec {
    /// Measured quantity.
    pub kind: ChannelKind,
    /// Position within a scan record.
    pub scan_index: u8,
    /// Element layout within a scan record.
    pub scan_type: ScanType,
    /// Queries specific to this channel.
    pub info_separate: InfoMask,
    /// Queries shared by every channel of the same kind.
    pub info_shared_by_type: InfoMask,
}

impl ChannelSpec {
    /// Axis measured by this channel, if any.
    pub const fn axis(&self) -> Option<Axis> {
        match self.kind {
            ChannelKind::Acceleration(axis) => Some(axis),
            ChannelKind::Timestamp => None,
        }
    }

    /// Whether the channel serves `info`, either separately or shared.
    pub const fn supports(&self, info: ChannelInfo) -> bool {
        self.info_separate.contains(info) || self.info_shared_by_type.contains(info)
    }
}

const fn accel_channel(axis: Axis) -> ChannelSpec {
    ChannelSpec {
        kind: ChannelKind::Acceleration(axis),
        scan_index: axis.scan_index() as u8,
        scan_type: ScanType {
            sign: Sign::Signed,
            realbits: 12,
            storagebits: 16,
            shift: 4,
            endianness: Endianness::Big,
        },
        info_separate: InfoMask {
            raw: true,
            calibbias: true,
            ..InfoMask::NONE
        },
        info_shared_by_type: InfoMask {
            scale: true,
            sampling_frequency: true,
            ..InfoMask::NONE
        },
    }
}

/// Channel table in scan order.
pub static CHANNELS: [ChannelSpec; 4] = [
    accel_channel(Axis::X),
    accel_channel(Axis::Y),
    accel_channel(Axis::Z),
    ChannelSpec {
        kind: ChannelKind::Timestamp,
        scan_index: 3,
        scan_type: ScanType {
            sign: Sign::Signed,
            realbits: 64,
            storagebits: 64,
            shift: 0,
            endianness: Endianness::Cpu,
        },
        info_separate: InfoMask::NONE,
        info_shared_by_type: InfoMask::NONE,
    },
];

/// Scan masks the device can serve: X, Y and Z always together.
pub const AVAILABLE_SCAN_MASKS: [u32; 1] = [0b0111];

/// Conversion factor from counts to m/s², integer part.
pub const SCALE_INT: i32 = 0;
/// Conversion factor from counts to m/s², millionths (1 mg/LSB).
pub const SCALE_MICRO: i32 = 9_807;

/// Descriptor for the acceleration channel of `axis`.
pub fn accel(axis: Axis) -> &'static ChannelSpec {
    &CHANNELS[axis.scan_index()]
}

/// Descriptor for the timestamp channel.
pub fn timestamp() -> &'static ChannelSpec {
    &CHANNELS[3]
}

/// Value returned by a channel query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelValue {
    /// Plain integer.
    Int(i32),
    /// Integer plus millionths.
    IntPlusMicro(i32, i32),
}
