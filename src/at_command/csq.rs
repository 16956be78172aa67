use heapless::String;

use super::AtRequest;

/// AT+CSQ
///
/// Signal quality report, e.g. `+CSQ: 17,0`. The first number is the
/// RSSI index (0-31, or 99 for "not known").
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetSignalQuality;

impl AtRequest for GetSignalQuality {
    fn encode(&self) -> String<256> {
        "AT+CSQ\r".into()
    }
}
