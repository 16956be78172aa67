use heapless::String;

use super::AtRequest;

/// AT+CMGDA="DEL ALL"
///
/// SIM800 extension that clears the whole message storage in one go.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeleteAllSms;

impl AtRequest for DeleteAllSms {
    fn encode(&self) -> String<256> {
        "AT+CMGDA=\"DEL ALL\"\r".into()
    }
}
