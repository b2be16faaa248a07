#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;
mod error;

pub mod acquire;
pub mod channels;
pub mod config;
pub mod decode;
pub mod device;
pub mod interface;
pub mod params;
pub mod power;
pub mod registers;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use crate::device::Mma8491;
pub use crate::error::{Error, Result};
