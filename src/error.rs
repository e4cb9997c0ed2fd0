use core::fmt;

/// Errors returned by the crate's API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The provided count or limit is not an integer.
    InvalidInputType,
    /// The requested generation mode is neither `"lt"` nor `"first"`.
    InvalidMode,
    /// The value is outside of the accepted range: a negative limit or a non-positive count.
    InvalidRange {
        /// The rejected value.
        value: i128,
    },
    /// The requested (or estimated) limit is too large to be addressed by the marker array.
    LimitTooLarge {
        /// The requested limit.
        limit: u64,
        /// The largest limit that can be sieved on this platform.
        max_limit: u64,
    },
    /// The marker array for the requested (or estimated) limit could not be allocated.
    OutOfMemory {
        /// The requested limit.
        limit: u64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Error::InvalidInputType => write!(f, "The value passed to the prime generator must be an integer."),
            Error::InvalidMode => write!(f, r#"Only the modes "lt" and "first" are valid for prime generation."#),
            Error::InvalidRange { value } => write!(
                f,
                concat![
                    "The requested value ({}) is out of range: ",
                    "limits must be non-negative and counts must be positive."
                ],
                value
            ),
            Error::LimitTooLarge { limit, max_limit } => write!(
                f,
                concat![
                    "The requested limit ({}) ",
                    "is larger than the maximum limit the sieve can address ({})."
                ],
                limit, max_limit
            ),
            Error::OutOfMemory { limit } => write!(
                f,
                "Not enough memory to allocate the marker array for the limit {}.",
                limit
            ),
        }
    }
}

impl std::error::Error for Error {}
