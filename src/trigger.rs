//! Triggered acquisition into a host streaming buffer.
//!
//! While streaming is enabled the host calls [`Mma8491::on_trigger`] from its
//! trigger context. Each call runs the same locked power/poll/read sequence as
//! an on-demand read, stamps the result and pushes it to a [`SampleSink`].
//! Failed acquisitions are dropped, but the trigger is always acknowledged.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::decode::{RawSample, Sample};
use crate::device::Mma8491;
use crate::error::{Error, Result};
use crate::interface::Mma8491Interface;
use crate::params::AcquisitionMode;
use crate::registers::RAW_AXIS_BYTES;

/// Size of one record in the host scan layout.
pub const SCAN_BYTES: usize = 16;
/// Byte offset of the timestamp within the host scan layout.
pub const SCAN_TIMESTAMP_OFFSET: usize = 8;

/// Monotonic time source used to stamp triggered samples.
pub trait MonotonicClock {
    /// Current time in nanoseconds.
    fn now_ns(&mut self) -> i64;
}

/// Consumer of triggered samples.
pub trait SampleSink {
    /// Accepts one complete record.
    fn push(&mut self, record: ScanRecord);
}

/// The trigger that fired the acquisition.
pub trait TriggerSource {
    /// Signals that the acquisition attempt for the last event is over.
    fn notify_done(&mut self);
}

/// One timestamped triggered sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanRecord {
    /// Axis words as read from the device.
    pub raw: RawSample,
    /// Decoded and calibrated triplet.
    pub sample: Sample,
    /// Capture time in nanoseconds.
    pub timestamp_ns: i64,
}

impl ScanRecord {
    /// Encodes the record in the host scan layout.
    ///
    /// ```text
    /// 0       2       4       6       8                              16
    /// +-------+-------+-------+-------+-------------------------------+
    /// | X BE  | Y BE  | Z BE  |  pad  |  timestamp (i64, native)      |
    /// +-------+-------+-------+-------+-------------------------------+
    /// ```
    pub fn to_scan_bytes(&self) -> [u8; SCAN_BYTES] {
        let mut bytes = [0u8; SCAN_BYTES];
        bytes[..RAW_AXIS_BYTES].copy_from_slice(&self.raw.to_be_bytes());
        bytes[SCAN_TIMESTAMP_OFFSET..].copy_from_slice(&self.timestamp_ns.to_ne_bytes());
        bytes
    }
}

/// Acknowledges the trigger when dropped, on every exit path.
struct DoneGuard<'a, T>
where
    T: TriggerSource,
{
    trigger: &'a mut T,
}

impl<T> Drop for DoneGuard<'_, T>
where
    T: TriggerSource,
{
    fn drop(&mut self) {
        self.trigger.notify_done();
    }
}

impl<IFACE, EN, D, M> Mma8491<IFACE, EN, D, M>
where
    IFACE: Mma8491Interface,
    EN: OutputPin,
    D: DelayNs,
    M: RawMutex,
{
    /// Handles one trigger event.
    ///
    /// Requires streaming mode ([`Error::NotStreaming`] otherwise). On success
    /// the record is pushed to `sink` and also returned. On failure nothing is
    /// pushed. `trigger` is notified exactly once in either case.
    pub fn on_trigger<C, S, T>(
        &self,
        clock: &mut C,
        sink: &mut S,
        trigger: &mut T,
    ) -> Result<ScanRecord, IFACE::Error, EN::Error>
    where
        C: MonotonicClock,
        S: SampleSink,
        T: TriggerSource,
    {
        let _done = DoneGuard { trigger };

        if self.mode() != AcquisitionMode::Streaming {
            return Err(Error::NotStreaming);
        }

        let raw = self.acquire_locked().inspect_err(|_| {
            warn!("triggered acquisition failed, sample dropped");
        })?;

        let record = ScanRecord {
            raw,
            sample: self.calibration().apply(raw.decode()),
            timestamp_ns: clock.now_ns(),
        };
        sink.push(record);

        Ok(record)
    }
}
