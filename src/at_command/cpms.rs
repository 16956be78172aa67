use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// AT+CPMS=...
///
/// Select the preferred message storage for reading, writing and
/// receiving alike. A successful reply starts with `+CPMS:` and lists
/// the slot usage.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectSmsStorage(pub SmsStorage);

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmsStorage {
    /// SIM card storage ("SM").
    Sim,
    /// Modem-internal storage ("ME").
    Modem,
}

impl SmsStorage {
    fn as_str(&self) -> &'static str {
        match self {
            SmsStorage::Sim => "SM",
            SmsStorage::Modem => "ME",
        }
    }
}

impl AtRequest for SelectSmsStorage {
    fn encode(&self) -> String<256> {
        let storage = self.0.as_str();
        let mut buf = String::new();
        write!(buf, "AT+CPMS=\"{0}\",\"{0}\",\"{0}\"\r", storage).unwrap();
        buf
    }
}
