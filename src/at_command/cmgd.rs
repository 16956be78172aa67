use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// AT+CMGD=...
///
/// Delete the message at one storage index. Wholesale deletion goes
/// through [super::DeleteAllSms] instead.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeleteSms {
    pub index: u8,
}

impl AtRequest for DeleteSms {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "AT+CMGD={}\r", self.index).unwrap();
        buf
    }
}
