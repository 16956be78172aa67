use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// AT+CNMI=...
///
/// The driver polls for messages with `AT+CMGL`, so unsolicited
/// new-message indications are switched off during initialization.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetSmsIndication {
    pub mode: SmsIndicationMode,
    /// mt
    pub routing: SmsMtMode,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SmsIndicationMode {
    BufferInTa = 0,
    DiscardWhenLinkBusy = 1,
    BufferWhenLinkBusy = 2,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SmsMtMode {
    NoRouting = 0,
    Index = 1,
}

impl AtRequest for SetSmsIndication {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "AT+CNMI={},{}\r", self.mode as u8, self.routing as u8).unwrap();
        buf
    }
}
