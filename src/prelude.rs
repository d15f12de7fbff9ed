//! Assorted imports for code that builds collection messages
//!
//! `use cellar::prelude::*;` brings in the cell primitives, the conversion
//! traits with their derive macros, and the collection types.

pub use crate::address::Address;
pub use crate::boc::{boc_to_base64, boc_to_hex, serialize_boc};
pub use crate::builder::CellBuilder;
pub use crate::cell::Cell;
pub use crate::coins::Coins;
pub use crate::collection::{
    BatchMint, CollectionConfig, CollectionContent, MintNft, MintRecord, NftCollection,
    RoyaltyParams, StakingParams,
};
pub use crate::{Load, Store};
pub use crate::dict::Dictionary;
pub use crate::error::{EncodeError, EncodeResult, SendError};
pub use crate::provider::{ContractProvider, InternalMessage, SendMode, Sender};
pub use crate::slice::{CellSlice, ParseError, ParseResult};
pub use crate::state_init::StateInit;
