//! Enable-line power gating.
//!
//! The MMA8491 only samples while its `EN` pin is high and returns to its
//! lowest-power state when the pin drops. Every acquisition is bracketed by a
//! [`PoweredSession`], which deasserts the line on every exit path, including
//! early returns and unwinding.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Owner of the active-high enable line.
pub struct PowerGate<EN> {
    enable: EN,
}

impl<EN> PowerGate<EN>
where
    EN: OutputPin,
{
    /// Takes ownership of the enable line and drives it low.
    pub fn new(mut enable: EN) -> core::result::Result<Self, EN::Error> {
        enable.set_low()?;
        Ok(Self { enable })
    }

    /// Asserts the enable line and waits `settle_us` before returning.
    ///
    /// The returned session deasserts the line when finished or dropped. If
    /// asserting fails, the line is driven low again before the error is
    /// returned.
    pub fn power_on<D>(
        &mut self,
        delay: &mut D,
        settle_us: u32,
    ) -> core::result::Result<PoweredSession<'_, EN>, EN::Error>
    where
        D: DelayNs,
    {
        if let Err(err) = self.enable.set_high() {
            if self.enable.set_low().is_err() {
                warn!("failed to deassert enable line after failed assert");
            }
            return Err(err);
        }

        if settle_us > 0 {
            delay.delay_us(settle_us);
        }

        Ok(PoweredSession {
            enable: &mut self.enable,
            released: false,
        })
    }

    /// Deasserts the enable line unconditionally.
    pub fn power_off(&mut self) -> core::result::Result<(), EN::Error> {
        self.enable.set_low()
    }

    /// Consumes the gate and returns the owned enable line.
    pub fn release(self) -> EN {
        self.enable
    }
}

/// Scope during which the device is powered.
pub struct PoweredSession<'a, EN>
where
    EN: OutputPin,
{
    enable: &'a mut EN,
    released: bool,
}

impl<EN> PoweredSession<'_, EN>
where
    EN: OutputPin,
{
    /// Deasserts the enable line and reports whether that succeeded.
    pub fn finish(mut self) -> core::result::Result<(), EN::Error> {
        self.released = true;
        self.enable.set_low()
    }
}

impl<EN> Drop for PoweredSession<'_, EN>
where
    EN: OutputPin,
{
    fn drop(&mut self) {
        if !self.released && self.enable.set_low().is_err() {
            warn!("failed to deassert enable line");
        }
    }
}
