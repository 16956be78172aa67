use core::fmt::Write;
use heapless::String;

use super::AtRequest;

/// AT+CSCS=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetTeCharacterSet(pub CharacterSet);

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CharacterSet {
    Gsm,
    Ucs2,
    Ira,
}

impl AtRequest for SetTeCharacterSet {
    fn encode(&self) -> String<256> {
        let character_set = match self.0 {
            CharacterSet::Gsm => "GSM",
            CharacterSet::Ucs2 => "UCS2",
            CharacterSet::Ira => "IRA",
        };

        let mut buf = String::new();
        write!(buf, "AT+CSCS=\"{}\"\r", character_set).unwrap();
        buf
    }
}
