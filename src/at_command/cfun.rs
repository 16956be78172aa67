use heapless::String;

use super::AtRequest;

/// AT+CFUN=1,1
///
/// Full-functionality restart. The modem drops off the network and
/// re-attaches, so the acknowledgement can take a while.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RestartModem;

impl AtRequest for RestartModem {
    fn encode(&self) -> String<256> {
        "AT+CFUN=1,1\r".into()
    }
}
