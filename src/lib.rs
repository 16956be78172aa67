#![no_std]
#![allow(clippy::unnecessary_lazy_evaluations)]

pub mod at_command;
pub mod clock;
mod error;
pub mod modem;
pub mod read;
pub mod response;

#[cfg(all(feature = "log", feature = "defmt"))]
compile_error!("'log' and 'defmt' features are mutually exclusive");
#[cfg(not(any(feature = "log", feature = "defmt")))]
compile_error!("please enable a logging feature, e.g. 'log' or 'defmt'");
#[cfg(feature = "defmt")]
pub(crate) use defmt as log;
#[cfg(feature = "log")]
pub(crate) use log;

#[cfg(test)]
extern crate std;

pub use error::Error;
pub use modem::{LinkState, Sim800};
pub use read::{Extracted, FieldDest, Timeouts};
pub use response::{Response, ResponseShape};

use embedded_time::duration::Milliseconds;

/// Base trait for the serial channel connecting the host to the modem.
///
/// The channel also provides the monotonic clock that every deadline in
/// this crate is measured against, since response timing (in particular
/// inter-character gap detection) only makes sense relative to the
/// transport actually delivering the bytes.
pub trait Serial {
    type SerialError: core::fmt::Debug;

    /// Milliseconds since an arbitrary epoch. Must be monotonic.
    fn now(&mut self) -> Milliseconds<u64>;
}

/// Byte-wise, non-blocking read access to the modem channel.
pub trait SerialRead: Serial {
    /// Whether at least one byte can be read without blocking.
    fn data_available(&mut self) -> bool;

    /// Read one byte. Only valid after [SerialRead::data_available]
    /// returned `true`.
    fn read_byte(&mut self) -> Result<u8, Self::SerialError>;
}

/// Best-effort write access to the modem channel.
pub trait SerialWrite: Serial {
    fn write(&mut self, buf: &[u8]) -> Result<(), Self::SerialError>;
}
