//! Account addresses
//!
//! An [`Address`] is a workchain identifier plus a 256-bit account id. On the
//! wire it uses the `addr_std` layout without anycast:
//!
//! ```text
//! 10 0 workchain:int8 hash:bits256      (267 bits)
//! ```
//!
//! and an absent address is the two-bit `addr_none` tag `00`.
//!
//! Addresses are either known in advance (resolved by some outside party and
//! parsed from their raw text form `<workchain>:<hex>`), or derived from a
//! [`StateInit`](crate::state_init::StateInit) with [`Address::derive`].

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use crate::builder::CellBuilder;
use crate::conv::target::Target;
use crate::conv::{Load, Store};
use crate::error::EncodeResult;
use crate::slice::{CellSlice, ParseError, ParseResult};
use crate::state_init::StateInit;

/// Standard internal address
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    workchain: i8,
    hash: [u8; 32],
}

impl Address {
    /// Serialized size of an `addr_std` value
    pub const STD_BITS: usize = 2 + 1 + 8 + 256;

    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    pub const fn workchain(&self) -> i8 {
        self.workchain
    }

    pub const fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Computes the address a contract with the given initial state will
    /// occupy on `workchain`: the representation hash of the state-init cell.
    ///
    /// Pure and offline: identical inputs always yield the identical address.
    pub fn derive(workchain: i8, init: &StateInit) -> EncodeResult<Self> {
        let cell = init.to_cell()?;
        let address = Self::new(workchain, *cell.repr_hash());
        tracing::debug!(%address, "derived contract address");
        Ok(address)
    }

    pub(crate) fn write_std<T: Target>(&self, tgt: &mut T) -> usize {
        tgt.push_uint(0b10, 2)
            + tgt.push_bit(false)
            + tgt.push_uint(self.workchain as u8 as u64, 8)
            + tgt.push_all(&self.hash)
    }
}

impl Store for Address {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        builder.store_address(Some(self))?;
        Ok(())
    }
}

impl Store for Option<Address> {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        builder.store_address(self.as_ref())?;
        Ok(())
    }
}

impl Load for Address {
    fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self> {
        slice.load_address()?.ok_or(ParseError::InvalidTag {
            context: "addr_std",
            tag: 0b00,
        })
    }
}

impl Load for Option<Address> {
    fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self> {
        slice.load_address()
    }
}

/// Raw form, `<workchain>:<64 lowercase hex digits>`
impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Error returned when parsing the raw text form of an address.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AddressParseError {
    /// No `:` separating workchain and account id
    MissingSeparator,
    /// Workchain is not an 8-bit signed integer
    BadWorkchain(String),
    /// Account id is not 32 hex-encoded bytes
    BadHash(String),
}

impl Display for AddressParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "raw address must be `<workchain>:<hex>`"),
            Self::BadWorkchain(s) => write!(f, "invalid workchain `{}`", s),
            Self::BadHash(s) => write!(f, "invalid account id `{}`", s),
        }
    }
}

impl std::error::Error for AddressParseError {}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wc, hash) = s
            .split_once(':')
            .ok_or(AddressParseError::MissingSeparator)?;
        let workchain = wc
            .parse::<i8>()
            .map_err(|_| AddressParseError::BadWorkchain(wc.to_owned()))?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hash, &mut bytes)
            .map_err(|_| AddressParseError::BadHash(hash.to_owned()))?;
        Ok(Self::new(workchain, bytes))
    }
}
