//! Error types for the encoding side of the crate
//!
//! Every failure raised while packing bits, references or dictionary
//! entries into cells falls into one of four classes:
//!
//! * [`RangeError`]: a value does not fit the width it was declared with
//! * [`CapacityError`]: a cell would exceed its bit or reference limit
//! * [`DuplicateKeyError`]: a dictionary key was inserted twice
//! * [`LimitExceededError`]: a batch request carries too many entries
//!
//! All of them convert into the umbrella [`EncodeError`], so that the
//! `?` operator composes across builders, dictionaries and serializers.
//! Errors reported while *reading* cells live in [`crate::slice`].

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a value to fit into the bit-width it is stored with.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RangeError {
    /// Unsigned value needs `actual_bits` significant bits but only `bits` were declared
    Overflow { bits: u16, actual_bits: u64 },
    /// Signed value cannot be represented in two's complement with `bits` bits
    SignedOverflow { value: i64, bits: u16 },
    /// Coin amount would need a `byte_len`-byte magnitude, more than the 4-bit prefix allows
    CoinsOverflow { byte_len: usize },
    /// Declared width is outside of what the operation supports
    UnsupportedWidth { bits: u16, max: u16 },
    /// Dictionary was built with a key width other than the one the layout requires
    KeyWidthMismatch { expected: u16, actual: u16 },
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::Overflow { bits, actual_bits } => {
                write!(f, "{actual_bits}-bit value does not fit in {bits} bits")
            }
            RangeError::SignedOverflow { value, bits } => {
                write!(f, "signed value {value} does not fit in {bits} bits")
            }
            RangeError::CoinsOverflow { byte_len } => {
                write!(
                    f,
                    "coin amount needs {byte_len} bytes, exceeding limit of {} bytes",
                    crate::coins::MAX_COINS_BYTES
                )
            }
            RangeError::UnsupportedWidth { bits, max } => {
                write!(f, "width of {bits} bits is not supported (maximum {max})")
            }
            RangeError::KeyWidthMismatch { expected, actual } => {
                write!(
                    f,
                    "dictionary keys are {actual} bits wide, layout requires {expected}"
                )
            }
        }
    }
}

impl Error for RangeError {}

/// Failure of a cell to accommodate more data.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CapacityError {
    /// Appending would bring the cell to `requested` bits, above `limit`
    BitsExceeded { limit: usize, requested: usize },
    /// The cell already holds `limit` references
    RefsExceeded { limit: usize },
}

impl Display for CapacityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityError::BitsExceeded { limit, requested } => {
                write!(f, "{requested}-bit cell exceeded limit of {limit} bits")
            }
            CapacityError::RefsExceeded { limit } => {
                write!(f, "cell cannot hold more than {limit} references")
            }
        }
    }
}

impl Error for CapacityError {}

/// A key was inserted into a dictionary that already holds it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DuplicateKeyError {
    pub key: u64,
}

impl Display for DuplicateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "dictionary key {} is already present", self.key)
    }
}

impl Error for DuplicateKeyError {}

/// Restriction on the number of entries in a request was exceeded.
///
/// Structurally similar to [`CapacityError`], but counts elements of a
/// caller-supplied collection rather than bits or references of a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LimitExceededError {
    pub limit: usize,
    pub actual: usize,
}

impl Display for LimitExceededError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-element request exceeded limit of {} elements",
            self.actual, self.limit
        )
    }
}

impl Error for LimitExceededError {}

/// Enumeration over every error that encoding operations may return.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum EncodeError {
    Range(RangeError),
    Capacity(CapacityError),
    DuplicateKey(DuplicateKeyError),
    LimitExceeded(LimitExceededError),
    /// An empty dictionary has no root cell to store inline
    EmptyDictionary,
}

impl From<std::convert::Infallible> for EncodeError {
    fn from(_void: std::convert::Infallible) -> Self {
        match _void {}
    }
}

impl From<RangeError> for EncodeError {
    fn from(err: RangeError) -> Self {
        Self::Range(err)
    }
}

impl From<CapacityError> for EncodeError {
    fn from(err: CapacityError) -> Self {
        Self::Capacity(err)
    }
}

impl From<DuplicateKeyError> for EncodeError {
    fn from(err: DuplicateKeyError) -> Self {
        Self::DuplicateKey(err)
    }
}

impl From<LimitExceededError> for EncodeError {
    fn from(err: LimitExceededError) -> Self {
        Self::LimitExceeded(err)
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::Range(err) => write!(f, "range error: {}", err),
            EncodeError::Capacity(err) => write!(f, "capacity error: {}", err),
            EncodeError::DuplicateKey(err) => write!(f, "duplicate key: {}", err),
            EncodeError::LimitExceeded(err) => write!(f, "limit exceeded: {}", err),
            EncodeError::EmptyDictionary => {
                write!(f, "cannot store an empty dictionary inline")
            }
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::Range(err) => Some(err),
            EncodeError::Capacity(err) => Some(err),
            EncodeError::DuplicateKey(err) => Some(err),
            EncodeError::LimitExceeded(err) => Some(err),
            EncodeError::EmptyDictionary => None,
        }
    }
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

/// Error returned by the message-sending helpers on
/// [`NftCollection`](crate::collection::NftCollection).
///
/// The body is always encoded before the provider is called, so an
/// `Encode` failure guarantees that nothing was handed to the provider.
#[derive(Debug)]
pub enum SendError<E> {
    Encode(EncodeError),
    Provider(E),
}

impl<E> From<EncodeError> for SendError<E> {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl<E: Display> Display for SendError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Encode(err) => write!(f, "failed to encode message body: {}", err),
            SendError::Provider(err) => write!(f, "provider rejected message: {}", err),
        }
    }
}

impl<E: Error + 'static> Error for SendError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SendError::Encode(err) => Some(err),
            SendError::Provider(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn encode_error_threadsafe() {
        dummy::<EncodeError>()
    }

    #[test]
    fn display_mentions_limits() {
        let err: EncodeError = CapacityError::BitsExceeded {
            limit: 1023,
            requested: 1024,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "capacity error: 1024-bit cell exceeded limit of 1023 bits"
        );

        let err: EncodeError = LimitExceededError {
            limit: 250,
            actual: 251,
        }
        .into();
        assert!(err.to_string().contains("251-element"));
        assert!(err.source().is_some());
    }
}
