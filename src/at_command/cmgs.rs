use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// Control byte (SUB) that terminates a text-mode message body.
pub const END_OF_MESSAGE: u8 = 0x1A;

/// AT+CMGS=...
///
/// Opens a send transaction. The modem answers with the `>` prompt and
/// expects [SendSmsBody] next; nothing else may go on the wire in
/// between.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SendSms<'a> {
    pub destination: &'a str,
}

impl AtRequest for SendSms<'_> {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "AT+CMGS=\"{}\"\r", self.destination).unwrap();
        buf
    }
}

/// Message body, sent only after the `>` prompt has been seen.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SendSmsBody<'a>(pub &'a str);

impl AtRequest for SendSmsBody<'_> {
    fn encode(&self) -> String<256> {
        let mut buf = String::new();
        write!(buf, "{}{}", self.0, END_OF_MESSAGE as char).unwrap();
        buf
    }
}
