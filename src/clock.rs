//! Decoder for the modem's fixed clock layout, `YY/MM/DD,HH:MM:SS±ZZ`.
//!
//! This is the exact string produced by `AT+CCLK?` and by the timestamp
//! field of a text-mode SMS. It is not a date parser: every separator has
//! a fixed offset and any deviation is a hard failure.

/// Number of characters in a well-formed clock string.
pub const TIMESTAMP_CAPACITY: usize = 20;

/// The input did not match the fixed clock layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MalformedTimestamp;

/// Decode a clock string into Unix seconds.
///
/// The two-digit year is interpreted as `2000 + YY`. The timezone field
/// is validated but its offset is not applied; all deployments are
/// assumed to share one timezone, so the value is already in the only
/// frame the caller cares about.
pub fn decode_timestamp(text: &str) -> Result<i64, MalformedTimestamp> {
    let bytes = text.as_bytes();
    if bytes.len() < TIMESTAMP_CAPACITY {
        return Err(MalformedTimestamp);
    }

    for (at, sep) in [(2, b'/'), (5, b'/'), (8, b','), (11, b':'), (14, b':')] {
        if bytes[at] != sep {
            return Err(MalformedTimestamp);
        }
    }
    if bytes[17] != b'+' && bytes[17] != b'-' {
        return Err(MalformedTimestamp);
    }

    let year = 2000 + digit_pair(bytes, 0)?;
    let month = digit_pair(bytes, 3)?;
    let day = digit_pair(bytes, 6)?;
    let hour = digit_pair(bytes, 9)?;
    let minute = digit_pair(bytes, 12)?;
    let second = digit_pair(bytes, 15)?;
    // Timezone quarter-hours, decoded but unused.
    let _zone = digit_pair(bytes, 18)?;

    Ok(days_from_civil(year, month, day) * 86_400 + hour * 3_600 + minute * 60 + second)
}

fn digit_pair(bytes: &[u8], at: usize) -> Result<i64, MalformedTimestamp> {
    let hi = (bytes[at] as char).to_digit(10).ok_or(MalformedTimestamp)?;
    let lo = (bytes[at + 1] as char)
        .to_digit(10)
        .ok_or(MalformedTimestamp)?;
    Ok(i64::from(hi * 10 + lo))
}

/// Days between 1970-01-01 and the given civil date (proleptic Gregorian).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month_shifted = (month + 9) % 12;
    let day_of_year = (153 * month_shifted + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_modem_clock_string() {
        assert_eq!(decode_timestamp("24/03/15,10:30:00+02"), Ok(1_710_498_600));
    }

    #[test]
    fn decodes_sms_metadata_timestamp() {
        // 2024-01-02 03:04:05 UTC
        assert_eq!(decode_timestamp("24/01/02,03:04:05+00"), Ok(1_704_164_645));
    }

    #[test]
    fn negative_zone_sign_accepted() {
        assert_eq!(decode_timestamp("24/03/15,10:30:00-08"), Ok(1_710_498_600));
    }

    #[test]
    fn short_input_rejected() {
        assert_eq!(decode_timestamp("24/03/15,10:30:00"), Err(MalformedTimestamp));
        assert_eq!(decode_timestamp(""), Err(MalformedTimestamp));
    }

    #[test]
    fn misplaced_separator_rejected() {
        assert_eq!(decode_timestamp("24-03/15,10:30:00+02"), Err(MalformedTimestamp));
        assert_eq!(decode_timestamp("24/03/15 10:30:00+02"), Err(MalformedTimestamp));
        assert_eq!(decode_timestamp("24/03/15,10:30:00 02"), Err(MalformedTimestamp));
    }

    #[test]
    fn non_digit_rejected() {
        assert_eq!(decode_timestamp("2A/03/15,10:30:00+02"), Err(MalformedTimestamp));
    }

    #[test]
    fn century_rollover() {
        // 2000-01-01 00:00:00
        assert_eq!(decode_timestamp("00/01/01,00:00:00+00"), Ok(946_684_800));
    }
}
