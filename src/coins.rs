//! Variable-length amounts ("coins")
//!
//! A coin amount is serialized as `VarUInteger 16`: a 4-bit prefix holding
//! the number of bytes `l` of the magnitude, followed by the magnitude itself
//! in `8 * l` bits, big-endian. Zero is therefore the single 4-bit value `0`,
//! and the largest representable amount is `2^120 - 1`.

use std::convert::TryFrom;
use std::fmt::Display;
use std::ops::Deref;

use ::num_bigint::BigUint;
use ::num_integer::Integer;
use ::num_traits::Zero;

use crate::builder::CellBuilder;
use crate::conv::{Load, Store};
use crate::error::EncodeResult;
use crate::slice::{CellSlice, ParseResult};

/// Width of the byte-length prefix
pub const COINS_LEN_BITS: u16 = 4;

/// Largest magnitude, in bytes, the prefix can describe
pub const MAX_COINS_BYTES: usize = 15;

/// Non-negative amount in the smallest currency unit
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Default)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Coins(pub BigUint);

impl Coins {
    pub fn into_inner(self) -> BigUint {
        self.0
    }

    pub const fn as_inner(&self) -> &BigUint {
        &self.0
    }

    pub const fn new(amount: BigUint) -> Self {
        Self(amount)
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Number of bytes the magnitude occupies on the wire
    pub fn byte_len(&self) -> usize {
        let n: usize = self.0.bits() as usize;
        Integer::div_ceil(&n, &8)
    }
}

impl std::fmt::Debug for Coins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coins({})", &self.0.to_string())
    }
}

impl Display for Coins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        <BigUint as Display>::fmt(&self.0, f)
    }
}

impl From<Coins> for BigUint {
    fn from(val: Coins) -> Self {
        val.0
    }
}

impl From<BigUint> for Coins {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

macro_rules! impl_coins_from {
    ($src:ty) => {
        impl From<$src> for Coins {
            fn from(val: $src) -> Self {
                Self(BigUint::from(val))
            }
        }

        impl TryFrom<Coins> for $src {
            type Error = <$src as TryFrom<BigUint>>::Error;

            fn try_from(val: Coins) -> Result<$src, Self::Error> {
                <$src as TryFrom<BigUint>>::try_from(val.0)
            }
        }
    };
}

impl_coins_from!(u8);
impl_coins_from!(u16);
impl_coins_from!(u32);
impl_coins_from!(u64);
impl_coins_from!(u128);

impl Deref for Coins {
    type Target = BigUint;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Store for Coins {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        builder.store_coins(self)?;
        Ok(())
    }
}

impl Load for Coins {
    fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self> {
        slice.load_coins()
    }
}
