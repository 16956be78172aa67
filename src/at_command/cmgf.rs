use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// AT+CMGF=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetSmsMessageFormat(pub SmsMessageFormat);

#[repr(u8)]
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmsMessageFormat {
    Pdu = 0,
    Text = 1,
}

impl AtRequest for SetSmsMessageFormat {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "AT+CMGF={}\r", self.0 as u8).unwrap();
        buf
    }
}
