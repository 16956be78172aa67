//! The command orchestrator: drives the serial channel with outbound
//! commands and interprets classified responses.
//!
//! One [Sim800] instance owns the transport, the link state and the
//! single held [SmsRecord]. Callers must not interleave operations from
//! several logical threads of control; there is exactly one byte stream
//! and a second in-flight command would corrupt both responses.

use crate::at_command::{
    cmgl::ListFilter,
    cmgr::{MESSAGE_CAPACITY, SENDER_CAPACITY},
    At, AtRequest, CMEErrorMode, CharacterSet, ConfigureCMEErrors, DeleteAllSms, DeleteSms,
    FactoryReset, GetSignalQuality, GetTime, ListSms, ReadSms, RestartModem, SelectSmsStorage,
    SendSms, SendSmsBody, SetEcho, SetSmsIndication, SetSmsMessageFormat, SetTeCharacterSet,
    SmsIndicationMode, SmsMessageFormat, SmsMtMode, SmsRecord, SmsStorage,
};
use crate::read::{self, Timeouts};
use crate::response::{classify, Response, ResponseShape, MARKER_CPMS, MARKER_OK, MARKER_PROMPT};
use crate::{log, Error, SerialRead, SerialWrite};

/// Probe attempts before the modem is declared unavailable.
const MAX_INIT_RETRIES: usize = 10;

/// Longest destination number accepted by [Sim800::send_sms].
const DESTINATION_CAPACITY: usize = SENDER_CAPACITY;

const INIT_DRAIN: Timeouts = Timeouts::new(1_000, 1_000);
const POST_PROBE_DRAIN: Timeouts = Timeouts::new(5_000, 5_000);
const PROBE: Timeouts = Timeouts::new(2_000, 50);
const CONFIG: Timeouts = Timeouts::new(1_000, 50);
const LIST: Timeouts = Timeouts::new(10_000, 50);
const READ: Timeouts = Timeouts::new(10_000, 50);
const DELETE: Timeouts = Timeouts::new(25_000, 50);
const CLOCK: Timeouts = Timeouts::new(5_000, 50);
const SIGNAL: Timeouts = Timeouts::new(10_000, 50);
const PROMPT: Timeouts = Timeouts::new(1_000, 500);
const SEND_CONFIRM: Timeouts = Timeouts::new(7_000, 5_000);
// Generous: the modem re-attaches to the network before acknowledging.
const RESET: Timeouts = Timeouts::new(5_000, 5_000);

/// Whether the modem link has been probed and configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Unprobed,
    Ready,
    Unavailable,
}

/// Blocking driver for a SIM800-class modem, text-mode SMS only.
pub struct Sim800<B> {
    serial: B,
    state: LinkState,
    sms: Option<SmsRecord>,
}

impl<B: SerialRead + SerialWrite> Sim800<B> {
    pub fn new(serial: B) -> Self {
        Sim800 {
            serial,
            state: LinkState::Unprobed,
            sms: None,
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.state
    }

    /// The most recently read message, if one is held.
    pub fn last_sms(&self) -> Option<&SmsRecord> {
        self.sms.as_ref()
    }

    /// Probe and configure the modem.
    ///
    /// The probe is retried up to [MAX_INIT_RETRIES] times. Configuration
    /// steps are either mandatory (text mode, message storage) or
    /// advisory; an advisory failure is logged and skipped, a mandatory
    /// failure aborts with the link marked unavailable. On success the
    /// message storage is wiped so polling starts from a clean slate.
    pub fn initialize(&mut self) -> Result<(), Error<B::SerialError>> {
        self.state = LinkState::Unprobed;
        self.sms = None;

        match self.probe_and_configure() {
            Ok(()) => {
                self.state = LinkState::Ready;
                if self.delete_all_sms().is_err() {
                    log::warn!("message storage cleanup failed");
                }
                log::info!("modem ready");
                Ok(())
            }
            Err(err) => {
                self.state = LinkState::Unavailable;
                log::warn!("modem not available");
                Err(err)
            }
        }
    }

    fn probe_and_configure(&mut self) -> Result<(), Error<B::SerialError>> {
        read::drain(&mut self.serial, INIT_DRAIN)?;

        let mut probed = false;
        let mut attempt = 0;
        while !probed && attempt < MAX_INIT_RETRIES {
            attempt += 1;
            log::info!("waiting for the modem, attempt {}/{}", attempt, MAX_INIT_RETRIES);

            self.send(&At)?;
            probed = classify(&mut self.serial, ResponseShape::Plain(MARKER_OK), PROBE).is_ok();
        }
        if !probed {
            return Err(Error::Timeout);
        }
        read::drain(&mut self.serial, POST_PROBE_DRAIN)?;

        self.advisory_step(&FactoryReset, "factory reset")?;
        self.advisory_step(&SetTeCharacterSet(CharacterSet::Gsm), "character set selection")?;
        self.advisory_step(&SetEcho(false), "echo disable")?;
        self.advisory_step(
            &ConfigureCMEErrors(CMEErrorMode::Disable),
            "error code configuration",
        )?;
        self.mandatory_step(
            &SetSmsMessageFormat(SmsMessageFormat::Text),
            MARKER_OK,
            "text mode selection",
        )?;
        self.advisory_step(
            &SetSmsIndication {
                mode: SmsIndicationMode::BufferWhenLinkBusy,
                routing: SmsMtMode::NoRouting,
            },
            "notification suppression",
        )?;
        self.mandatory_step(
            &SelectSmsStorage(SmsStorage::Sim),
            MARKER_CPMS,
            "message storage selection",
        )?;

        Ok(())
    }

    /// Full-functionality restart, forcing the modem to re-attach to the
    /// network.
    pub fn reset(&mut self) -> Result<(), Error<B::SerialError>> {
        self.ensure_ready()?;
        self.send(&RestartModem)?;
        classify(&mut self.serial, ResponseShape::Plain(MARKER_OK), RESET)?;
        Ok(())
    }

    /// Read the modem's real-time clock as Unix seconds.
    pub fn clock(&mut self) -> Result<i64, Error<B::SerialError>> {
        self.ensure_ready()?;
        self.send(&GetTime)?;
        match classify(&mut self.serial, ResponseShape::ClockQuery, CLOCK)? {
            Response::ClockValue(time) => Ok(time),
            _ => Err(Error::MalformedField),
        }
    }

    /// Raw RSSI index (0-31, or 99 when unknown).
    pub fn signal_quality(&mut self) -> Result<u8, Error<B::SerialError>> {
        self.ensure_ready()?;
        self.send(&GetSignalQuality)?;
        match classify(&mut self.serial, ResponseShape::SignalQuery, SIGNAL)? {
            Response::SignalStrength(rssi) => Ok(rssi),
            _ => Err(Error::MalformedField),
        }
    }

    /// Index of the first message in storage, `None` when the mailbox is
    /// empty.
    pub fn new_sms_index(&mut self) -> Result<Option<u8>, Error<B::SerialError>> {
        self.ensure_ready()?;
        self.send(&ListSms(ListFilter::All))?;
        match classify(&mut self.serial, ResponseShape::SmsListing, LIST) {
            Ok(Response::SmsIndex(index)) => Ok(Some(index)),
            Ok(_) => Err(Error::MalformedField),
            // No listing marker within the window means an empty
            // mailbox, not a broken link.
            Err(Error::Timeout) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Read the message at `index`, replacing the held record.
    pub fn read_sms(&mut self, index: u8) -> Result<&SmsRecord, Error<B::SerialError>> {
        self.ensure_ready()?;
        self.send(&ReadSms { index })?;
        match classify(&mut self.serial, ResponseShape::SmsContent, READ)? {
            Response::Sms(record) => Ok(self.sms.insert(record)),
            _ => Err(Error::MalformedField),
        }
    }

    /// Read-then-consume: fetch the first stored message and delete it
    /// from the modem once it is safely held, so it is never redelivered.
    pub fn read_new_sms(&mut self) -> Result<Option<&SmsRecord>, Error<B::SerialError>> {
        self.ensure_ready()?;
        let Some(index) = self.new_sms_index()? else {
            return Ok(None);
        };
        self.read_sms(index)?;
        self.delete_sms(index)?;
        Ok(self.sms.as_ref())
    }

    /// Send a text-mode message.
    ///
    /// No body bytes go on the wire unless the modem first produces its
    /// `>` prompt; a missing prompt fails the whole operation.
    pub fn send_sms(&mut self, destination: &str, text: &str) -> Result<(), Error<B::SerialError>> {
        self.ensure_ready()?;
        if destination.len() > DESTINATION_CAPACITY || text.len() > MESSAGE_CAPACITY {
            return Err(Error::BufferOverflow);
        }

        self.send(&SendSms { destination })?;
        classify(&mut self.serial, ResponseShape::Plain(MARKER_PROMPT), PROMPT)?;

        self.send(&SendSmsBody(text))?;
        classify(&mut self.serial, ResponseShape::Plain(MARKER_OK), SEND_CONFIRM)?;
        Ok(())
    }

    /// Send the held message on to another destination.
    pub fn forward_sms(&mut self, destination: &str) -> Result<(), Error<B::SerialError>> {
        self.ensure_ready()?;
        let message = match &self.sms {
            Some(record) => record.message.clone(),
            None => return Err(Error::NoSmsHeld),
        };
        self.send_sms(destination, &message)
    }

    pub fn delete_sms(&mut self, index: u8) -> Result<(), Error<B::SerialError>> {
        self.ensure_ready()?;
        self.send(&DeleteSms { index })?;
        classify(&mut self.serial, ResponseShape::Plain(MARKER_OK), DELETE)?;
        Ok(())
    }

    pub fn delete_all_sms(&mut self) -> Result<(), Error<B::SerialError>> {
        self.ensure_ready()?;
        self.send(&DeleteAllSms)?;
        classify(&mut self.serial, ResponseShape::Plain(MARKER_OK), DELETE)?;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), Error<B::SerialError>> {
        match self.state {
            LinkState::Ready => Ok(()),
            _ => Err(Error::NotReady),
        }
    }

    fn send(&mut self, request: &impl AtRequest) -> Result<(), Error<B::SerialError>> {
        log::debug!("sending {:?}", request);
        let encoded = request.encode();
        self.serial.write(encoded.as_bytes())?;
        Ok(())
    }

    /// Run one configuration step whose failure is tolerable. The
    /// classification failure is logged and swallowed; transport errors
    /// still propagate.
    fn advisory_step(
        &mut self,
        request: &impl AtRequest,
        label: &str,
    ) -> Result<(), Error<B::SerialError>> {
        self.send(request)?;
        match classify(&mut self.serial, ResponseShape::Plain(MARKER_OK), CONFIG) {
            Ok(_) => Ok(()),
            Err(Error::Serial(err)) => Err(Error::Serial(err)),
            Err(_) => {
                log::warn!("{} failed", label);
                Ok(())
            }
        }
    }

    /// Run one configuration step the link cannot live without.
    fn mandatory_step(
        &mut self,
        request: &impl AtRequest,
        marker: &'static str,
        label: &str,
    ) -> Result<(), Error<B::SerialError>> {
        self.send(request)?;
        match classify(&mut self.serial, ResponseShape::Plain(marker), CONFIG) {
            Ok(_) => Ok(()),
            Err(err) => {
                log::warn!("{} failed", label);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::MockSerial;

    const OK: &[u8] = b"\r\nOK\r\n";

    /// Replies for a full, successful initialization: probe, six
    /// configuration steps, storage confirmation, cleanup.
    fn init_replies(serial: MockSerial) -> MockSerial {
        serial
            .reply(OK) // AT
            .reply(OK) // AT&F
            .reply(OK) // AT+CSCS
            .reply(OK) // ATE0
            .reply(OK) // AT+CMEE
            .reply(OK) // AT+CMGF
            .reply(OK) // AT+CNMI
            .reply(b"\r\n+CPMS: 1,30,1,30,1,30\r\n\r\nOK\r\n") // AT+CPMS
            .reply(OK) // AT+CMGDA
    }

    fn ready_modem(serial: MockSerial) -> Sim800<MockSerial> {
        let mut modem = Sim800::new(serial);
        modem.state = LinkState::Ready;
        modem
    }

    #[test]
    fn init_reaches_ready_and_wipes_storage() {
        let serial = init_replies(MockSerial::build());
        let mut modem = Sim800::new(serial);

        modem.initialize().unwrap();

        assert_eq!(modem.link_state(), LinkState::Ready);
        assert!(modem.serial.wrote(b"AT+CMGF=1\r"));
        assert!(modem.serial.wrote(b"AT+CPMS=\"SM\",\"SM\",\"SM\"\r"));
        assert!(modem.serial.wrote(b"AT+CMGDA=\"DEL ALL\"\r"));
    }

    #[test]
    fn init_gives_up_after_max_probe_attempts() {
        // The modem never answers anything.
        let mut modem = Sim800::new(MockSerial::build());

        assert_eq!(modem.initialize(), Err(Error::Timeout));
        assert_eq!(modem.link_state(), LinkState::Unavailable);

        let probes = modem
            .serial
            .tx
            .windows(3)
            .filter(|window| *window == b"AT\r")
            .count();
        assert_eq!(probes, MAX_INIT_RETRIES);
    }

    #[test]
    fn mandatory_step_failure_aborts_init() {
        // Everything succeeds up to AT+CMGF, which errors out.
        let serial = MockSerial::build()
            .reply(OK) // AT
            .reply(OK) // AT&F
            .reply(OK) // AT+CSCS
            .reply(OK) // ATE0
            .reply(OK) // AT+CMEE
            .reply(b"\r\nERROR\r\n"); // AT+CMGF
        let mut modem = Sim800::new(serial);

        assert_eq!(modem.initialize(), Err(Error::Timeout));
        assert_eq!(modem.link_state(), LinkState::Unavailable);
        // The sequence stopped: storage selection was never attempted.
        assert!(!modem.serial.wrote(b"AT+CPMS"));
    }

    #[test]
    fn advisory_step_failure_is_tolerated() {
        // AT&F fails, the rest succeeds.
        let serial = MockSerial::build()
            .reply(OK) // AT
            .reply(b"\r\nERROR\r\n") // AT&F
            .reply(OK) // AT+CSCS
            .reply(OK) // ATE0
            .reply(OK) // AT+CMEE
            .reply(OK) // AT+CMGF
            .reply(OK) // AT+CNMI
            .reply(b"\r\n+CPMS: 1,30,1,30,1,30\r\n\r\nOK\r\n")
            .reply(OK); // AT+CMGDA
        let mut modem = Sim800::new(serial);

        modem.initialize().unwrap();
        assert_eq!(modem.link_state(), LinkState::Ready);
    }

    #[test]
    fn operations_fail_closed_before_init() {
        let mut modem = Sim800::new(MockSerial::build());

        assert_eq!(modem.delete_all_sms(), Err(Error::NotReady));
        assert_eq!(modem.send_sms("+15551234567", "hi"), Err(Error::NotReady));
        assert_eq!(modem.new_sms_index(), Err(Error::NotReady));
        // Nothing may touch the wire while the link is down.
        assert!(modem.serial.tx.is_empty());
    }

    #[test]
    fn listing_returns_first_index() {
        let serial = MockSerial::build()
            .reply(b"\r\n+CMGL: 3,\"REC UNREAD\",\"+15551234567\",,\"\"\r\nhello\r\n\r\nOK\r\n");
        let mut modem = ready_modem(serial);

        assert_eq!(modem.new_sms_index(), Ok(Some(3)));
    }

    #[test]
    fn empty_mailbox_is_not_an_error() {
        let serial = MockSerial::build().reply(OK);
        let mut modem = ready_modem(serial);

        assert_eq!(modem.new_sms_index(), Ok(None));
    }

    #[test]
    fn read_sms_replaces_held_record() {
        let serial = MockSerial::build().reply(
            b"\r\n+CMGR: \"REC READ\",\"+15551234567\",\"\",\"24/01/02,03:04:05+00\"\r\nHello\r\n\r\nOK\r\n",
        );
        let mut modem = ready_modem(serial);

        let record = modem.read_sms(1).unwrap();
        assert_eq!(record.sender.as_str(), "+15551234567");
        assert_eq!(record.message.as_str(), "Hello");
        assert_eq!(record.timestamp, 1_704_164_645);
        assert!(modem.last_sms().is_some());
    }

    #[test]
    fn failed_read_keeps_previous_record() {
        let serial = MockSerial::build()
            .reply(
                b"\r\n+CMGR: \"REC READ\",\"+15551234567\",\"\",\"24/01/02,03:04:05+00\"\r\nHello\r\n\r\nOK\r\n",
            )
            .reply(b"\r\nERROR\r\n");
        let mut modem = ready_modem(serial);

        modem.read_sms(1).unwrap();
        assert!(modem.read_sms(2).is_err());

        let held = modem.last_sms().unwrap();
        assert_eq!(held.message.as_str(), "Hello");
    }

    #[test]
    fn read_new_sms_consumes_the_message() {
        let serial = MockSerial::build()
            .reply(b"\r\n+CMGL: 5,\"REC UNREAD\",\"+15551234567\",,\"\"\r\nBoop\r\n\r\nOK\r\n")
            .reply(
                b"\r\n+CMGR: \"REC UNREAD\",\"+15551234567\",\"\",\"24/01/02,03:04:05+00\"\r\nBoop\r\n\r\nOK\r\n",
            )
            .reply(OK); // AT+CMGD=5
        let mut modem = ready_modem(serial);

        let record = modem.read_new_sms().unwrap().unwrap();
        assert_eq!(record.message.as_str(), "Boop");
        assert!(modem.serial.wrote(b"AT+CMGD=5\r"));
    }

    #[test]
    fn read_new_sms_on_empty_mailbox() {
        let serial = MockSerial::build().reply(OK);
        let mut modem = ready_modem(serial);

        assert_eq!(modem.read_new_sms(), Ok(None));
        assert!(!modem.serial.wrote(b"AT+CMGR"));
    }

    #[test]
    fn send_sms_waits_for_prompt() {
        let serial = MockSerial::build()
            .reply(b"\r\n> ")
            .reply(b"\r\n+CMGS: 1\r\n\r\nOK\r\n");
        let mut modem = ready_modem(serial);

        modem.send_sms("+15551234567", "Hello").unwrap();

        assert!(modem.serial.wrote(b"AT+CMGS=\"+15551234567\"\r"));
        assert!(modem.serial.wrote(b"Hello\x1a"));
    }

    #[test]
    fn send_sms_without_prompt_sends_no_body() {
        // The modem never produces the `>` prompt.
        let serial = MockSerial::build();
        let mut modem = ready_modem(serial);

        assert_eq!(modem.send_sms("+15551234567", "Hello"), Err(Error::Timeout));
        assert!(!modem.serial.wrote(b"Hello"));
    }

    #[test]
    fn oversized_send_is_rejected_up_front() {
        let mut modem = ready_modem(MockSerial::build());

        let long = core::str::from_utf8(&[b'a'; MESSAGE_CAPACITY + 1]).unwrap();
        assert_eq!(
            modem.send_sms("+15551234567", long),
            Err(Error::BufferOverflow)
        );
        assert!(modem.serial.tx.is_empty());
    }

    #[test]
    fn forward_resends_held_message() {
        let serial = MockSerial::build()
            .reply(
                b"\r\n+CMGR: \"REC READ\",\"+15551234567\",\"\",\"24/01/02,03:04:05+00\"\r\nHello\r\n\r\nOK\r\n",
            )
            .reply(b"\r\n> ")
            .reply(b"\r\n+CMGS: 2\r\n\r\nOK\r\n");
        let mut modem = ready_modem(serial);

        modem.read_sms(1).unwrap();
        modem.forward_sms("+15557654321").unwrap();

        assert!(modem.serial.wrote(b"AT+CMGS=\"+15557654321\"\r"));
        assert!(modem.serial.wrote(b"Hello\x1a"));
    }

    #[test]
    fn forward_without_held_message_fails() {
        let mut modem = ready_modem(MockSerial::build());
        assert_eq!(modem.forward_sms("+15557654321"), Err(Error::NoSmsHeld));
    }

    #[test]
    fn delete_all_is_idempotent() {
        let serial = MockSerial::build().reply(OK).reply(OK);
        let mut modem = ready_modem(serial);

        modem.delete_all_sms().unwrap();
        modem.delete_all_sms().unwrap();
        assert_eq!(modem.link_state(), LinkState::Ready);
    }

    #[test]
    fn reset_waits_for_acknowledgement() {
        let serial = MockSerial::build().reply(OK);
        let mut modem = ready_modem(serial);

        modem.reset().unwrap();
        assert!(modem.serial.wrote(b"AT+CFUN=1,1\r"));
    }

    #[test]
    fn clock_query_decodes() {
        let serial =
            MockSerial::build().reply(b"\r\n+CCLK: \"24/03/15,10:30:00+02\"\r\n\r\nOK\r\n");
        let mut modem = ready_modem(serial);

        assert_eq!(modem.clock(), Ok(1_710_498_600));
    }

    #[test]
    fn signal_quality_reports_rssi() {
        let serial = MockSerial::build().reply(b"\r\n+CSQ: 17,0\r\n\r\nOK\r\n");
        let mut modem = ready_modem(serial);

        assert_eq!(modem.signal_quality(), Ok(17));
    }
}
