use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// Longest sender address the driver keeps, in characters.
pub const SENDER_CAPACITY: usize = 14;

/// Longest text-mode message body, in characters.
pub const MESSAGE_CAPACITY: usize = 160;

/// AT+CMGR=...
///
/// Read the message at one storage index. The reply looks like
/// `+CMGR: "REC READ","+15551234567","","24/01/02,03:04:05+00"` followed
/// by the body on its own line.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadSms {
    pub index: u8,
}

impl AtRequest for ReadSms {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "AT+CMGR={}\r", self.index).unwrap();
        buf
    }
}

/// One fully decoded text-mode message.
///
/// A record only ever exists complete: the classifier either decodes
/// sender, timestamp and body in one pass or produces nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmsRecord {
    pub sender: String<SENDER_CAPACITY>,
    pub message: String<MESSAGE_CAPACITY>,
    /// Unix seconds, decoded from the message metadata.
    pub timestamp: i64,
}
