//! Byte-stream primitives: label scanning, field extraction and draining.
//!
//! These are busy-poll loops bounded by wall-clock deadlines, matching the
//! timing model of the modem link: once bytes start flowing they keep
//! flowing, so a short inter-character window is enough to detect the end
//! of a response, while a longer first-byte window covers the modem still
//! thinking about the command.

use embedded_time::duration::Milliseconds;
use heapless::Vec;

use crate::{Error, SerialRead};

/// Deadline pair for one blocking read operation.
///
/// `comm` bounds the wait for the very first byte; once any byte has
/// arrived only `interchar` applies.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub comm: Milliseconds<u32>,
    pub interchar: Milliseconds<u32>,
}

impl Timeouts {
    pub const fn new(comm: u32, interchar: u32) -> Self {
        Timeouts {
            comm: Milliseconds(comm),
            interchar: Milliseconds(interchar),
        }
    }
}

/// Where [fetch_field] puts the bytes between the delimiters.
pub enum FieldDest<'a, const N: usize> {
    Keep(&'a mut Vec<u8, N>),
    Discard,
}

/// Successful [fetch_field] outcome.
///
/// Truncation is not a failure: the field was delimited correctly, the
/// destination was just too small for all of it. The length is the number
/// of bytes actually retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Extracted {
    Complete(usize),
    Truncated(usize),
}

fn timed_out(start: Milliseconds<u64>, now: Milliseconds<u64>, window: Milliseconds<u32>) -> bool {
    now.0.wrapping_sub(start.0) >= u64::from(window.0)
}

/// Scan the incoming stream for `label`.
///
/// Matching is a naive restart-on-mismatch search: a byte that fails to
/// extend the current partial match resets the cursor to zero. The modem
/// talks slowly enough that this is plenty.
///
/// Acts like a flush on failure only; after a hit the caller is expected
/// to keep reading (or [drain]) itself.
pub fn find_label<B: SerialRead>(
    serial: &mut B,
    label: &[u8],
    timeouts: Timeouts,
) -> Result<(), Error<B::SerialError>> {
    debug_assert!(!label.is_empty());

    let start = serial.now();
    while !serial.data_available() {
        if timed_out(start, serial.now(), timeouts.comm) {
            return Err(Error::Timeout);
        }
    }

    let mut cursor = 0;
    let mut last_byte = serial.now();
    while !timed_out(last_byte, serial.now(), timeouts.interchar) {
        if !serial.data_available() {
            continue;
        }

        let byte = serial.read_byte()?;
        if label[cursor] == byte {
            cursor += 1;
            if cursor == label.len() {
                // Early exit, trailing bytes stay in the stream.
                return Ok(());
            }
        } else {
            cursor = 0;
        }
        last_byte = serial.now();
    }

    Err(Error::Timeout)
}

/// Extract the bytes between `begin` and `end` into `dest`.
///
/// Everything before the first occurrence of `begin` is discarded. Once
/// inside the field, bytes beyond the destination's capacity are silently
/// dropped and the result becomes [Extracted::Truncated]. A timeout
/// before `end` arrives discards whatever was read and leaves `dest`
/// empty; partial fields are never surfaced.
pub fn fetch_field<B: SerialRead, const N: usize>(
    serial: &mut B,
    dest: FieldDest<'_, N>,
    begin: u8,
    end: u8,
    interchar: Milliseconds<u32>,
) -> Result<Extracted, Error<B::SerialError>> {
    let mut dest = dest;
    if let FieldDest::Keep(buf) = &mut dest {
        buf.clear();
    }

    let mut inside = false;
    let mut truncated = false;
    let mut last_byte = serial.now();
    while !timed_out(last_byte, serial.now(), interchar) {
        if !serial.data_available() {
            continue;
        }

        let byte = serial.read_byte()?;
        last_byte = serial.now();

        if !inside {
            inside = byte == begin;
            continue;
        }

        if byte == end {
            let len = match &dest {
                FieldDest::Keep(buf) => buf.len(),
                FieldDest::Discard => 0,
            };
            return Ok(if truncated {
                Extracted::Truncated(len)
            } else {
                Extracted::Complete(len)
            });
        }

        if let FieldDest::Keep(buf) = &mut dest {
            if buf.push(byte).is_err() {
                truncated = true;
            }
        }
    }

    if let FieldDest::Keep(buf) = &mut dest {
        buf.clear();
    }
    Err(Error::Timeout)
}

/// Read and discard bytes until the stream goes quiet.
///
/// Waits up to `timeouts.comm` for anything to arrive at all, then keeps
/// eating bytes until none shows up for `timeouts.interchar`.
pub fn drain<B: SerialRead>(
    serial: &mut B,
    timeouts: Timeouts,
) -> Result<(), Error<B::SerialError>> {
    let start = serial.now();
    while !serial.data_available() {
        if timed_out(start, serial.now(), timeouts.comm) {
            return Ok(());
        }
    }

    let mut last_byte = serial.now();
    while !timed_out(last_byte, serial.now(), timeouts.interchar) {
        if serial.data_available() {
            let _ = serial.read_byte()?;
            last_byte = serial.now();
        }
    }

    Ok(())
}
