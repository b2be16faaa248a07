//! High-level MMA8491 device driver implementation.
//!
//! The driver is used through shared references so that an on-demand reader
//! and a trigger callback can hold the same instance. Two independent guards
//! protect the hardware:
//!
//! * the acquisition lease serializes access to the bus and the enable
//!   line. The raw mutex is only held while the hardware is taken out of,
//!   or put back into, its slot; power-on, polling and the burst read run
//!   with the mutex released;
//! * the mode guard ([`AcquisitionMode`]) is checked before any acquisition
//!   starts and rejects on-demand reads with [`Error::Busy`] while streaming.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use crate::acquire::{read_axes, wait_data_ready};
use crate::channels::{ChannelInfo, ChannelSpec, ChannelValue, SCALE_INT, SCALE_MICRO};
use crate::config::Config;
use crate::decode::{Calibration, RawSample, Sample};
use crate::error::{Error, Result};
use crate::interface::Mma8491Interface;
use crate::interface::i2c::I2cInterface;
use crate::params::{AcquisitionMode, Axis};
use crate::power::PowerGate;

/// Hardware owned by the acquisition lock.
struct Core<IFACE, EN, D> {
    interface: IFACE,
    gate: PowerGate<EN>,
    delay: D,
}

impl<IFACE, EN, D> Core<IFACE, EN, D>
where
    IFACE: Mma8491Interface,
    EN: OutputPin,
    D: DelayNs,
{
    /// Power on, wait for fresh data, burst-read, power off.
    fn acquire(&mut self, config: &Config) -> Result<RawSample, IFACE::Error, EN::Error> {
        let Self {
            interface,
            gate,
            delay,
        } = self;

        let session = gate
            .power_on(delay, config.power_on_delay_us)
            .map_err(Error::Pin)?;

        let result = wait_data_ready(interface, delay, config).and_then(|_| read_axes(interface));
        let released = session.finish();

        // An acquisition failure outranks a failed power-off.
        let raw = result?;
        released.map_err(Error::Pin)?;

        Ok(RawSample::from_be_bytes(raw))
    }
}

/// Exclusive hold on the hardware for one acquisition.
///
/// Claiming takes the [`Core`] out of its slot; dropping puts it back, on
/// every exit path.
struct CoreLease<'a, IFACE, EN, D, M>
where
    M: RawMutex,
{
    slot: &'a Mutex<M, RefCell<Option<Core<IFACE, EN, D>>>>,
    core: Option<Core<IFACE, EN, D>>,
}

impl<'a, IFACE, EN, D, M> CoreLease<'a, IFACE, EN, D, M>
where
    M: RawMutex,
{
    /// Takes the hardware, or returns `None` if another acquisition holds it.
    fn claim(slot: &'a Mutex<M, RefCell<Option<Core<IFACE, EN, D>>>>) -> Option<Self> {
        let core = slot.lock(RefCell::take)?;
        Some(Self {
            slot,
            core: Some(core),
        })
    }
}

impl<IFACE, EN, D, M> Drop for CoreLease<'_, IFACE, EN, D, M>
where
    M: RawMutex,
{
    fn drop(&mut self) {
        if let Some(core) = self.core.take() {
            self.slot.lock(|slot| *slot.borrow_mut() = Some(core));
        }
    }
}

/// High-level synchronous driver for the MMA8491 accelerometer.
///
/// `M` selects the raw mutex backing the internal guards. The default
/// [`NoopRawMutex`] suits a driver used from a single execution context;
/// pick a `CriticalSectionRawMutex` when sharing it with interrupt handlers.
/// Critical sections only cover the short state hand-offs, never the
/// data-ready poll.
pub struct Mma8491<IFACE, EN, D, M = NoopRawMutex>
where
    M: RawMutex,
{
    core: Mutex<M, RefCell<Option<Core<IFACE, EN, D>>>>,
    mode: Mutex<M, Cell<AcquisitionMode>>,
    calibration: Mutex<M, Cell<Calibration>>,
    config: Config,
}

impl<IFACE, EN, D> Mma8491<IFACE, EN, D>
where
    IFACE: Mma8491Interface,
    EN: OutputPin,
    D: DelayNs,
{
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Attaches the driver using single-context guards.
    ///
    /// Validates `config` and drives the enable line low; the device stays
    /// unpowered until the first acquisition.
    pub fn new(
        interface: IFACE,
        enable: EN,
        delay: D,
        config: Config,
    ) -> Result<Self, IFACE::Error, EN::Error> {
        Self::with_mutex(interface, enable, delay, config)
    }
}

impl<I2C, EN, D> Mma8491<I2cInterface<I2C>, EN, D>
where
    I2C: I2c,
    EN: OutputPin,
    D: DelayNs,
{
    // ==================================================================
    // == I²C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I²C transports at the default address.
    pub fn new_i2c(
        i2c: I2C,
        enable: EN,
        delay: D,
        config: Config,
    ) -> Result<Self, I2C::Error, EN::Error> {
        Self::new(I2cInterface::new(i2c), enable, delay, config)
    }

    /// Releases the driver, returning the I²C bus, enable line and delay.
    pub fn release_i2c(self) -> Option<(I2C, EN, D)> {
        let (iface, enable, delay) = self.release()?;
        Some((iface.release(), enable, delay))
    }
}

impl<IFACE, EN, D, M> Mma8491<IFACE, EN, D, M>
where
    IFACE: Mma8491Interface,
    EN: OutputPin,
    D: DelayNs,
    M: RawMutex,
{
    /// Attaches the driver with guards backed by the raw mutex `M`.
    pub fn with_mutex(
        interface: IFACE,
        enable: EN,
        delay: D,
        config: Config,
    ) -> Result<Self, IFACE::Error, EN::Error> {
        config.validate().map_err(|_| Error::InvalidConfig)?;

        let gate = PowerGate::new(enable).map_err(|err| {
            error!("failed to drive enable line low");
            Error::Init(err)
        })?;

        debug!("attached, poll budget {} ms", config.max_poll_time_ms());

        Ok(Self {
            core: Mutex::new(RefCell::new(Some(Core {
                interface,
                gate,
                delay,
            }))),
            mode: Mutex::new(Cell::new(AcquisitionMode::Idle)),
            calibration: Mutex::new(Cell::new(Calibration::default())),
            config,
        })
    }

    /// Consumes the driver and returns the owned interface, enable line and delay.
    ///
    /// Returns `None` only if an acquisition lease was leaked with
    /// [`core::mem::forget`].
    pub fn release(self) -> Option<(IFACE, EN, D)> {
        let core = self.core.into_inner().into_inner()?;
        Some((core.interface, core.gate.release(), core.delay))
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the acquisition configuration.
    pub fn set_config(&mut self, config: Config) -> Result<(), IFACE::Error, EN::Error> {
        config.validate().map_err(|_| Error::InvalidConfig)?;
        self.config = config;
        Ok(())
    }

    // ==================================================================
    // == Mode Guard ====================================================
    // ==================================================================
    /// Current owner of the acquisition sequence.
    pub fn mode(&self) -> AcquisitionMode {
        self.mode.lock(Cell::get)
    }

    /// Hands the device to the triggered pipeline.
    ///
    /// Fails with [`Error::Busy`] if streaming is already enabled.
    pub fn enable_streaming(&self) -> Result<(), IFACE::Error, EN::Error> {
        self.mode.lock(|mode| match mode.get() {
            AcquisitionMode::Streaming => Err(Error::Busy),
            AcquisitionMode::Idle => {
                mode.set(AcquisitionMode::Streaming);
                debug!("streaming enabled");
                Ok(())
            }
        })
    }

    /// Returns the device to on-demand mode.
    pub fn disable_streaming(&self) {
        self.mode.lock(|mode| mode.set(AcquisitionMode::Idle));
        debug!("streaming disabled");
    }

    // ==================================================================
    // == Calibration ===================================================
    // ==================================================================
    /// Bias added to every reading of `axis`.
    pub fn calibbias(&self, axis: Axis) -> i16 {
        self.calibration().bias(axis)
    }

    /// Sets the bias added to every reading of `axis`.
    pub fn set_calibbias(&self, axis: Axis, bias: i16) {
        self.calibration.lock(|cell| {
            let mut calibration = cell.get();
            calibration.set_bias(axis, bias);
            cell.set(calibration);
        });
    }

    pub(crate) fn calibration(&self) -> Calibration {
        self.calibration.lock(Cell::get)
    }

    // ==================================================================
    // == On-Demand Acquisition =========================================
    // ==================================================================
    /// Reads one calibrated axis.
    ///
    /// All three axes are acquired; the others are discarded.
    pub fn read_channel(&self, axis: Axis) -> Result<i32, IFACE::Error, EN::Error> {
        self.read_xyz().map(|sample| sample.axis(axis))
    }

    /// Reads a calibrated acceleration triplet.
    pub fn read_xyz(&self) -> Result<Sample, IFACE::Error, EN::Error> {
        if self.mode() == AcquisitionMode::Streaming {
            return Err(Error::Busy);
        }

        let raw = self.acquire_locked()?;
        Ok(self.calibration().apply(raw.decode()))
    }

    /// Reads the undecoded axis words.
    pub fn read_xyz_raw(&self) -> Result<RawSample, IFACE::Error, EN::Error> {
        if self.mode() == AcquisitionMode::Streaming {
            return Err(Error::Busy);
        }

        self.acquire_locked()
    }

    // ==================================================================
    // == Host Channel Queries ==========================================
    // ==================================================================
    /// Answers a host query against one of the [`CHANNELS`](crate::channels::CHANNELS).
    pub fn read_info(
        &self,
        channel: &ChannelSpec,
        info: ChannelInfo,
    ) -> Result<ChannelValue, IFACE::Error, EN::Error> {
        if !channel.supports(info) {
            return Err(Error::Unsupported);
        }

        match (channel.axis(), info) {
            (Some(axis), ChannelInfo::Raw) => self.read_channel(axis).map(ChannelValue::Int),
            (Some(axis), ChannelInfo::CalibBias) => {
                Ok(ChannelValue::Int(i32::from(self.calibbias(axis))))
            }
            (Some(_), ChannelInfo::Scale) => Ok(ChannelValue::IntPlusMicro(SCALE_INT, SCALE_MICRO)),
            _ => Err(Error::Unsupported),
        }
    }

    /// Applies a host write against one of the [`CHANNELS`](crate::channels::CHANNELS).
    ///
    /// Only the calibration bias is writable; it must fit in an `i16`.
    pub fn write_info(
        &self,
        channel: &ChannelSpec,
        info: ChannelInfo,
        value: i32,
    ) -> Result<(), IFACE::Error, EN::Error> {
        match (channel.axis(), info) {
            (Some(axis), ChannelInfo::CalibBias) => {
                let bias = i16::try_from(value).map_err(|_| Error::InvalidConfig)?;
                self.set_calibbias(axis, bias);
                Ok(())
            }
            _ => Err(Error::Unsupported),
        }
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    /// Runs one acquisition while holding the hardware lease.
    ///
    /// Starting while another acquisition holds the lease yields
    /// [`Error::Busy`] immediately.
    pub(crate) fn acquire_locked(&self) -> Result<RawSample, IFACE::Error, EN::Error> {
        self.with_core(|core| core.acquire(&self.config))
    }

    fn with_core<R>(
        &self,
        f: impl FnOnce(&mut Core<IFACE, EN, D>) -> Result<R, IFACE::Error, EN::Error>,
    ) -> Result<R, IFACE::Error, EN::Error> {
        let mut lease = CoreLease::claim(&self.core).ok_or(Error::Busy)?;
        match lease.core.as_mut() {
            Some(core) => f(core),
            None => Err(Error::Busy),
        }
    }
}
