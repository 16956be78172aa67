use core::fmt::Debug;

pub mod at;
pub mod ate;
pub mod atf;
pub mod cclk;
pub mod cfun;
pub mod cmee;
pub mod cmgd;
pub mod cmgda;
pub mod cmgf;
pub mod cmgl;
pub mod cmgr;
pub mod cmgs;
pub mod cnmi;
pub mod cpms;
pub mod cscs;
pub mod csq;

pub use at::At;
pub use ate::SetEcho;
pub use atf::FactoryReset;
pub use cclk::GetTime;
pub use cfun::RestartModem;
pub use cmee::{CMEErrorMode, ConfigureCMEErrors};
pub use cmgd::DeleteSms;
pub use cmgda::DeleteAllSms;
pub use cmgf::{SetSmsMessageFormat, SmsMessageFormat};
pub use cmgl::{ListFilter, ListSms};
pub use cmgr::{ReadSms, SmsRecord, MESSAGE_CAPACITY, SENDER_CAPACITY};
pub use cmgs::{SendSms, SendSmsBody, END_OF_MESSAGE};
pub use cnmi::{SetSmsIndication, SmsIndicationMode, SmsMtMode};
pub use cpms::{SelectSmsStorage, SmsStorage};
pub use cscs::{CharacterSet, SetTeCharacterSet};
pub use csq::GetSignalQuality;

/// An outbound command the modem understands.
///
/// Requests only know how to put themselves on the wire; what comes back
/// is the response classifier's business, selected per operation by the
/// orchestrator.
#[cfg(feature = "defmt")]
pub trait AtRequest: Debug + defmt::Format {
    fn encode(&self) -> heapless::String<256>;
}

#[cfg(not(feature = "defmt"))]
pub trait AtRequest: Debug {
    fn encode(&self) -> heapless::String<256>;
}
