use heapless::String;

use super::AtRequest;

/// AT&F
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FactoryReset;

impl AtRequest for FactoryReset {
    fn encode(&self) -> String<256> {
        "AT&F\r".into()
    }
}
