#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<S> {
    /// No matching byte sequence arrived within the deadline.
    Timeout,

    /// A delimiter or fixed-format rule was violated.
    MalformedField,

    /// A response field contained bytes that are not valid UTF-8.
    InvalidUtf8,

    /// An outgoing destination or message body exceeds its wire limit.
    BufferOverflow,

    /// Operation attempted while the link is not ready.
    NotReady,

    /// Forwarding was requested but no message is currently held.
    NoSmsHeld,

    /// Transport-level failure.
    Serial(S),
}

impl<S> From<S> for Error<S> {
    fn from(err: S) -> Self {
        Error::Serial(err)
    }
}
