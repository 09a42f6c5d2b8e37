//! Error type shared by the core primitives.

/// Errors reported by the core primitives.
///
/// Every condition is deterministic: calling again with the same input
/// reproduces the same error, so none of them are worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input rejected before any work was done (length mismatch,
    /// non-positive rate or duration, empty coefficient set, ...).
    InvalidInput(&'static str),
    /// A window position/size reaches past the end of the buffer.
    OutOfRange {
        /// One past the last index the caller asked for.
        end: usize,
        /// Length of the buffer.
        len: usize,
    },
    /// An intermediate value left the representable range.
    NumericOverflow,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::OutOfRange { end, len } => {
                write!(f, "range ends at {end} but buffer holds {len} samples")
            }
            Self::NumericOverflow => write!(f, "numeric overflow"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Convenience result type for core operations.
pub type Result<T> = core::result::Result<T, Error>;
