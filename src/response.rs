//! Response classification: one scanner pass for the shape's marker,
//! then the shape-specific field extraction, in a single stream read.

use core::str;

use embedded_time::duration::Milliseconds;
use heapless::{String, Vec};

use crate::at_command::cmgr::{SmsRecord, MESSAGE_CAPACITY, SENDER_CAPACITY};
use crate::clock::{decode_timestamp, TIMESTAMP_CAPACITY};
use crate::read::{drain, fetch_field, find_label, FieldDest, Timeouts};
use crate::{Error, SerialRead};

pub const MARKER_OK: &str = "OK";
pub const MARKER_PROMPT: &str = ">";
pub const MARKER_CPMS: &str = "+CPMS:";
const MARKER_CMGL: &str = "+CMGL:";
const MARKER_CMGR: &str = "+CMGR:";
const MARKER_CCLK: &str = "+CCLK:";
const MARKER_CSQ: &str = "+CSQ:";

/// How long the stream is allowed to keep chattering after a response
/// has been classified, before the next command goes out.
const SETTLE: Timeouts = Timeouts::new(1_000, 50);

/// The response the caller expects for the command it just sent.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseShape {
    /// Marker only, no payload. Covers `OK`, the `>` write prompt and
    /// `+CPMS:` storage confirmation.
    Plain(&'static str),
    /// `+CMGL:` followed by the index of the first listed message.
    SmsListing,
    /// `+CMGR:` followed by status, sender, name, timestamp and body.
    SmsContent,
    /// `+CCLK:` followed by one quoted clock string.
    ClockQuery,
    /// `+CSQ:` followed by the RSSI index.
    SignalQuery,
}

impl ResponseShape {
    fn marker(&self) -> &'static str {
        match self {
            ResponseShape::Plain(marker) => marker,
            ResponseShape::SmsListing => MARKER_CMGL,
            ResponseShape::SmsContent => MARKER_CMGR,
            ResponseShape::ClockQuery => MARKER_CCLK,
            ResponseShape::SignalQuery => MARKER_CSQ,
        }
    }
}

/// Successfully classified response, one per read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    Simple,
    SmsIndex(u8),
    Sms(SmsRecord),
    ClockValue(i64),
    SignalStrength(u8),
}

/// Read one response of the given shape off the stream.
///
/// The marker scan is bounded by the full timeout pair; every extraction
/// after it only by the inter-character window. Any failure along the way
/// aborts the whole classification; nothing partial is returned. After a
/// hit the stream is drained so the next command starts clean.
pub fn classify<B: SerialRead>(
    serial: &mut B,
    shape: ResponseShape,
    timeouts: Timeouts,
) -> Result<Response, Error<B::SerialError>> {
    find_label(serial, shape.marker().as_bytes(), timeouts)?;

    let response = match shape {
        ResponseShape::Plain(_) => Response::Simple,
        ResponseShape::SmsListing => Response::SmsIndex(numeric_field(serial, timeouts.interchar)?),
        ResponseShape::SignalQuery => {
            Response::SignalStrength(numeric_field(serial, timeouts.interchar)?)
        }
        ResponseShape::SmsContent => Response::Sms(sms_content(serial, timeouts.interchar)?),
        ResponseShape::ClockQuery => {
            let mut stamp: Vec<u8, TIMESTAMP_CAPACITY> = Vec::new();
            fetch_field(
                serial,
                FieldDest::Keep(&mut stamp),
                b'"',
                b'"',
                timeouts.interchar,
            )?;
            Response::ClockValue(timestamp(&stamp)?)
        }
    };

    drain(serial, SETTLE)?;
    Ok(response)
}

/// One space/comma-delimited decimal field, as in `+CMGL: 3,...` and
/// `+CSQ: 17,0`.
fn numeric_field<B: SerialRead>(
    serial: &mut B,
    interchar: Milliseconds<u32>,
) -> Result<u8, Error<B::SerialError>> {
    let mut digits: Vec<u8, 3> = Vec::new();
    fetch_field(serial, FieldDest::Keep(&mut digits), b' ', b',', interchar)?;

    let text = str::from_utf8(&digits).map_err(|_| Error::InvalidUtf8)?;
    text.parse().map_err(|_| Error::MalformedField)
}

/// The `+CMGR:` payload: status (discarded), sender, phonebook name
/// (discarded), timestamp, then the body between line-feed and carriage
/// return. The body is not quote-delimited because message text may
/// itself contain quotes.
fn sms_content<B: SerialRead>(
    serial: &mut B,
    interchar: Milliseconds<u32>,
) -> Result<SmsRecord, Error<B::SerialError>> {
    fetch_field::<_, 0>(serial, FieldDest::Discard, b'"', b'"', interchar)?;

    let mut sender: Vec<u8, SENDER_CAPACITY> = Vec::new();
    fetch_field(serial, FieldDest::Keep(&mut sender), b'"', b'"', interchar)?;

    fetch_field::<_, 0>(serial, FieldDest::Discard, b'"', b'"', interchar)?;

    let mut stamp: Vec<u8, TIMESTAMP_CAPACITY> = Vec::new();
    fetch_field(serial, FieldDest::Keep(&mut stamp), b'"', b'"', interchar)?;
    let timestamp = timestamp(&stamp)?;

    let mut body: Vec<u8, MESSAGE_CAPACITY> = Vec::new();
    fetch_field(serial, FieldDest::Keep(&mut body), b'\n', b'\r', interchar)?;

    Ok(SmsRecord {
        sender: text(&sender)?,
        message: text(&body)?,
        timestamp,
    })
}

fn timestamp<S, const N: usize>(bytes: &Vec<u8, N>) -> Result<i64, Error<S>> {
    let stamp = str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    decode_timestamp(stamp).map_err(|_| Error::MalformedField)
}

fn text<S, const N: usize>(bytes: &Vec<u8, N>) -> Result<String<N>, Error<S>> {
    let text = str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    Ok(text.into())
}
