//! Bus interface abstraction for the MMA8491 driver.

pub mod i2c;

/// Abstraction over the low-level bus access required by the driver.
///
/// The device exposes no writable registers; acquisition only needs single
/// register reads and one multi-byte burst.
pub trait Mma8491Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads multiple consecutive registers into the provided buffer in one transaction.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;
}
