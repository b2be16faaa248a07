//! Data-ready polling and the three-axis burst read.
//!
//! Both steps assume the device is already powered; see
//! [`PowerGate`](crate::power::PowerGate).

use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::Mma8491Interface;
use crate::registers::{Status, RAW_AXIS_BYTES, REG_OUT_X_MSB, REG_STATUS};

/// Polls `STATUS` until X, Y and Z all report fresh data.
///
/// Reads `STATUS` at most `config.poll_attempts` times and sleeps
/// `config.poll_interval_ms` after every read that is not ready. Returns the
/// first ready snapshot without further reads or delays. A bus error aborts
/// the loop immediately; an exhausted budget yields [`Error::DeviceTimeout`].
pub fn wait_data_ready<IFACE, D, PinE>(
    interface: &mut IFACE,
    delay: &mut D,
    config: &Config,
) -> Result<Status, IFACE::Error, PinE>
where
    IFACE: Mma8491Interface,
    D: DelayNs,
{
    for attempt in 0..config.poll_attempts {
        let status = interface
            .read_register(REG_STATUS)
            .map(Status::from)
            .map_err(Error::Bus)?;

        if status.all_axes_ready() {
            trace!("data ready after {} status reads", attempt + 1);
            return Ok(status);
        }

        delay.delay_ms(config.poll_interval_ms);
    }

    error!("data not ready after {} status reads", config.poll_attempts);
    Err(Error::DeviceTimeout)
}

/// Reads `OUT_X_MSB..=OUT_Z_LSB` in a single bus transaction.
///
/// Must only follow a successful [`wait_data_ready`] within the same powered
/// session, otherwise the axes may come from different conversions.
pub fn read_axes<IFACE, PinE>(interface: &mut IFACE) -> Result<[u8; RAW_AXIS_BYTES], IFACE::Error, PinE>
where
    IFACE: Mma8491Interface,
{
    let mut raw = [0u8; RAW_AXIS_BYTES];
    interface
        .read_many(REG_OUT_X_MSB, &mut raw)
        .map_err(Error::Bus)?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::{read_axes, wait_data_ready};
    use crate::config::Config;
    use crate::error::Error;
    use crate::testing::{Event, Recorder};
    use core::convert::Infallible;
    use embedded_hal::i2c::ErrorKind;

    type TestError = Error<ErrorKind, Infallible>;

    #[test]
    fn returns_on_first_ready_status() {
        let recorder = Recorder::new();
        recorder.push_status(&[0x00, 0x01, 0x03, 0x07]);
        let mut bus = recorder.bus();
        let mut delay = recorder.delay();

        let status: Result<_, TestError> =
            wait_data_ready(&mut bus, &mut delay, &Config::default());

        assert!(status.unwrap().all_axes_ready());
        assert_eq!(
            recorder.events(),
            vec![
                Event::StatusRead,
                Event::DelayMs(20),
                Event::StatusRead,
                Event::DelayMs(20),
                Event::StatusRead,
                Event::DelayMs(20),
                Event::StatusRead,
            ]
        );
    }

    #[test]
    fn ready_on_first_read_skips_delay() {
        let recorder = Recorder::new();
        recorder.push_status(&[0x0F]);
        let mut bus = recorder.bus();
        let mut delay = recorder.delay();

        let status: Result<_, TestError> =
            wait_data_ready(&mut bus, &mut delay, &Config::default());

        assert!(status.is_ok());
        assert_eq!(recorder.events(), vec![Event::StatusRead]);
    }

    #[test]
    fn ready_on_last_attempt_succeeds() {
        let recorder = Recorder::new();
        recorder.push_status(&[0x00; 149]);
        recorder.push_status(&[0x07]);
        let mut bus = recorder.bus();
        let mut delay = recorder.delay();

        let status: Result<_, TestError> =
            wait_data_ready(&mut bus, &mut delay, &Config::default());

        assert!(status.is_ok());
        assert_eq!(recorder.count(Event::StatusRead), 150);
        assert_eq!(recorder.count(Event::DelayMs(20)), 149);
    }

    #[test]
    fn times_out_after_exactly_budget_reads() {
        let recorder = Recorder::new();
        // Combined flag and two axes, never all three.
        recorder.set_idle_status(0x0B);
        let mut bus = recorder.bus();
        let mut delay = recorder.delay();

        let status: Result<_, TestError> =
            wait_data_ready(&mut bus, &mut delay, &Config::default());

        assert_eq!(status, Err(Error::DeviceTimeout));
        assert_eq!(recorder.count(Event::StatusRead), 150);
        assert_eq!(recorder.count(Event::DelayMs(20)), 150);
        let events = recorder.events();
        for pair in events.chunks(2) {
            assert_eq!(pair, [Event::StatusRead, Event::DelayMs(20)]);
        }
    }

    #[test]
    fn custom_budget_is_honoured() {
        let recorder = Recorder::new();
        let mut bus = recorder.bus();
        let mut delay = recorder.delay();
        let config = Config::new().poll_attempts(3).poll_interval_ms(1).build();

        let status: Result<_, TestError> = wait_data_ready(&mut bus, &mut delay, &config);

        assert_eq!(status, Err(Error::DeviceTimeout));
        assert_eq!(recorder.count(Event::StatusRead), 3);
        assert_eq!(recorder.count(Event::DelayMs(1)), 3);
    }

    #[test]
    fn bus_error_short_circuits_retries() {
        let recorder = Recorder::new();
        recorder.push_status(&[0x00, 0x00]);
        recorder.push_status_error();
        recorder.set_idle_status(0x07);
        let mut bus = recorder.bus();
        let mut delay = recorder.delay();

        let status: Result<_, TestError> =
            wait_data_ready(&mut bus, &mut delay, &Config::default());

        assert_eq!(status, Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(recorder.count(Event::StatusRead), 3);
        assert_eq!(recorder.count(Event::DelayMs(20)), 2);
    }

    #[test]
    fn burst_reads_six_bytes_from_out_x() {
        let recorder = Recorder::new();
        recorder.push_burst([0x00, 0x04, 0xFF, 0xFC, 0x80, 0x00]);
        let mut bus = recorder.bus();

        let raw: Result<_, TestError> = read_axes(&mut bus);

        assert_eq!(raw, Ok([0x00, 0x04, 0xFF, 0xFC, 0x80, 0x00]));
        assert_eq!(recorder.events(), vec![Event::BurstRead]);
    }

    #[test]
    fn burst_error_propagates_unchanged() {
        let recorder = Recorder::new();
        recorder.push_burst_error();
        let mut bus = recorder.bus();

        let raw: Result<_, TestError> = read_axes(&mut bus);

        assert_eq!(raw, Err(Error::Bus(ErrorKind::Other)));
    }
}
