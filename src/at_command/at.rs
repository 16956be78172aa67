use heapless::String;

use super::AtRequest;

/// AT
///
/// Connectivity probe; an attached modem answers `OK`.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct At;

impl AtRequest for At {
    fn encode(&self) -> String<256> {
        "AT\r".into()
    }
}
