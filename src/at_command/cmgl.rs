use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// AT+CMGL=...
///
/// List stored messages in text mode without touching their read
/// status. The first line of the reply starts with `+CMGL: <index>,`.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListSms(pub ListFilter);

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListFilter {
    All,
    Unread,
}

impl ListFilter {
    fn as_str(&self) -> &'static str {
        match self {
            ListFilter::All => "ALL",
            ListFilter::Unread => "REC UNREAD",
        }
    }
}

impl AtRequest for ListSms {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "AT+CMGL=\"{}\",0\r", self.0.as_str()).unwrap();
        buf
    }
}
