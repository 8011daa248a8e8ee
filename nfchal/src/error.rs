// nfchal/src/error.rs

use thiserror::Error;

/// 共通エラー型
///
/// The set is closed: every public operation reports one of these kinds.
/// Misuse of the API (wrong thread, timer started twice, ...) is not an
/// error value, it is a panic in debug builds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The controller lock could not be taken within the acquire timeout.
    #[error("nfc controller busy")]
    Busy,

    /// The chip did not answer as expected (identity check or bus transfer).
    #[error("chip communication failed")]
    Communication,

    /// The chip oscillator did not report stable within the bring-up bound.
    #[error("oscillator failed to start")]
    Oscillator,

    /// An expected interrupt or response did not arrive in time.
    #[error("communication timed out")]
    CommunicationTimeout,

    /// Received data does not fit the caller's buffer.
    #[error("buffer overflow")]
    BufferOverflow,

    /// Not enough data yet to tell whether a frame is valid.
    #[error("incomplete frame")]
    IncompleteFrame,

    /// Decoded frame violates the expected structure.
    #[error("frame data format error")]
    DataFormat,
}

impl Error {
    /// True for errors that mean "nothing usable in range, try again".
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::CommunicationTimeout | Error::IncompleteFrame)
    }

    /// True for errors that point at the front end itself.
    pub fn is_hardware_fault(&self) -> bool {
        matches!(self, Error::Communication | Error::Oscillator)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
