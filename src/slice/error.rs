//! Error types used to report failure when reading cells
//!
//! [`ParseError`] covers every way a [`CellSlice`](super::CellSlice) read can
//! fail: running out of bits or references, meeting a tag that the expected
//! layout does not allow, or decoding a byte string that is not UTF-8.

use std::error::Error;
use std::fmt::{Display, Formatter, Result};
use std::string::FromUtf8Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A read of `requested` bits found only `remaining`
    NotEnoughBits { requested: usize, remaining: usize },
    /// A reference was requested but none were left
    NotEnoughRefs,
    /// A discriminator bit-pattern is not valid where it was found
    InvalidTag { context: &'static str, tag: u64 },
    /// A dictionary edge label is longer than the key bits that remain
    InvalidLabel { remaining: u16, len: u16 },
    /// The requested width cannot be returned by this reader
    UnsupportedWidth { bits: u16, max: u16 },
    /// Byte payload that should be text is not UTF-8
    Utf8(FromUtf8Error),
    /// A value was read in full but the cell has unread contents
    Leftover { bits: usize, refs: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ParseError::NotEnoughBits {
                requested,
                remaining,
            } => write!(
                f,
                "cannot read {requested} bits, only {remaining} remain in cell"
            ),
            ParseError::NotEnoughRefs => write!(f, "no references remain in cell"),
            ParseError::InvalidTag { context, tag } => {
                write!(f, "invalid tag {tag:#b} for {context}")
            }
            ParseError::InvalidLabel { remaining, len } => write!(
                f,
                "dictionary label of {len} bits exceeds {remaining} remaining key bits"
            ),
            ParseError::UnsupportedWidth { bits, max } => {
                write!(f, "cannot read {bits}-bit value (maximum {max})")
            }
            ParseError::Utf8(err) => write!(f, "payload is not UTF-8: {}", err),
            ParseError::Leftover { bits, refs } => write!(
                f,
                "cell has {bits} unread bits and {refs} unread references"
            ),
        }
    }
}

impl From<FromUtf8Error> for ParseError {
    fn from(err: FromUtf8Error) -> Self {
        Self::Utf8(err)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Utf8(err) => Some(err),
            _ => None,
        }
    }
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
