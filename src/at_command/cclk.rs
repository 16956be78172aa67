use heapless::String;

use super::AtRequest;

/// AT+CCLK?
///
/// Query the modem's real-time clock. The reply carries one quoted
/// field, e.g. `+CCLK: "24/03/15,10:30:00+02"`.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetTime;

impl AtRequest for GetTime {
    fn encode(&self) -> String<256> {
        "AT+CCLK?\r".into()
    }
}
