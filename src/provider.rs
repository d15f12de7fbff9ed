//! Seams to the outside world
//!
//! Encoding stops at a finished body cell. Getting it on chain is the job of
//! a [`ContractProvider`], acting on behalf of some [`Sender`]; neither is
//! implemented here.

use std::fmt::{Debug, Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

use crate::address::Address;
use crate::cell::Cell;
use crate::coins::Coins;
use crate::state_init::StateInit;

/// Flags controlling how the outgoing message pays for itself
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct SendMode(u8);

impl SendMode {
    pub const NONE: Self = Self(0);
    /// Pay forwarding fees separately from the attached value
    pub const PAY_GAS_SEPARATELY: Self = Self(1);
    pub const IGNORE_ERRORS: Self = Self(2);
    pub const DESTROY_ACCOUNT_IF_ZERO: Self = Self(32);
    pub const CARRY_ALL_REMAINING_INCOMING_VALUE: Self = Self(64);
    pub const CARRY_ALL_REMAINING_BALANCE: Self = Self(128);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SendMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SendMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Debug for SendMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SendMode({})", self.0)
    }
}

impl Display for SendMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity a message is sent on behalf of
pub trait Sender {
    /// Address of the sending wallet, when it is known up front
    fn address(&self) -> Option<Address> {
        None
    }
}

/// Outgoing internal message, ready to be signed and submitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InternalMessage {
    pub to: Address,
    pub value: Coins,
    /// `None` leaves the choice to the provider
    pub bounce: Option<bool>,
    pub send_mode: SendMode,
    pub init: Option<StateInit>,
    pub body: Cell,
}

/// Submits messages to a contract at a fixed address
pub trait ContractProvider {
    type Error;

    fn internal(&mut self, via: &dyn Sender, message: InternalMessage) -> Result<(), Self::Error>;
}
