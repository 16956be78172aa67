use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// AT+CMEE=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigureCMEErrors(pub CMEErrorMode);

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CMEErrorMode {
    Disable = 0,
    Numeric = 1,
    Verbose = 2,
}

impl AtRequest for ConfigureCMEErrors {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "AT+CMEE={}\r", self.0 as u8).unwrap();
        buf
    }
}
