//! Initial contract state
//!
//! A [`StateInit`] pairs the code and data cells a contract is deployed
//! with. Its serialized form is
//!
//! ```text
//! 0 (no split_depth) 0 (no special) 1 ^code 1 ^data 0 (no libraries)
//! ```
//!
//! and the hash of that cell is the contract's address within its workchain.

use crate::address::Address;
use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::conv::{Load, Store};
use crate::error::EncodeResult;
use crate::slice::{CellSlice, ParseError, ParseResult};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StateInit {
    pub code: Cell,
    pub data: Cell,
}

impl StateInit {
    pub fn new(code: Cell, data: Cell) -> Self {
        Self { code, data }
    }

    /// Address this state would be deployed at on `workchain`.
    pub fn address(&self, workchain: i8) -> EncodeResult<Address> {
        Address::derive(workchain, self)
    }
}

impl Store for StateInit {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        builder
            .store_bit(false)?
            .store_bit(false)?
            .store_bit(true)?
            .store_ref(self.code.clone())?
            .store_bit(true)?
            .store_ref(self.data.clone())?
            .store_bit(false)?;
        Ok(())
    }
}

impl Load for StateInit {
    fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self> {
        if slice.load_bit()? || slice.load_bit()? {
            return Err(ParseError::InvalidTag {
                context: "state_init split_depth/special",
                tag: 1,
            });
        }
        let code = load_required_ref(slice, "state_init code")?;
        let data = load_required_ref(slice, "state_init data")?;
        if slice.load_bit()? {
            return Err(ParseError::InvalidTag {
                context: "state_init library",
                tag: 1,
            });
        }
        Ok(Self { code, data })
    }
}

fn load_required_ref(slice: &mut CellSlice<'_>, context: &'static str) -> ParseResult<Cell> {
    if slice.load_bit()? {
        slice.load_ref()
    } else {
        Err(ParseError::InvalidTag { context, tag: 0 })
    }
}
