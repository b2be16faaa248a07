//! Error handling primitives for the MMA8491 driver.

/// Crate-wide result type alias.
pub type Result<T, CommE, PinE> = core::result::Result<T, Error<CommE, PinE>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CommE, PinE> {
    /// A register transaction failed on the underlying bus.
    Bus(CommE),
    /// The enable line could not be driven during an acquisition.
    Pin(PinE),
    /// The enable line could not be driven low while attaching the device.
    Init(PinE),
    /// The data-ready poll exhausted its retry budget.
    DeviceTimeout,
    /// The device is owned by streaming mode, or an acquisition is already in flight.
    Busy,
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// A trigger fired while streaming mode is disabled.
    NotStreaming,
    /// The channel does not serve the requested query.
    Unsupported,
}
