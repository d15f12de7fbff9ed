//! Deployment data of a lockup NFT collection
//!
//! The collection contract reads its persistent data in this exact order:
//!
//! ```text
//! next_item_index:uint64
//! ^nft_item_code
//! ^collection_content
//! ^royalty_params { tvl_factor:uint32 tvl_base:uint32
//!                   rewards_factor:uint32 rewards_base:uint32
//!                   royalty_address:MsgAddress }
//! staking_params:(HashmapE 16 uint16)
//! reserved:uint2 = 0
//! withdrawal_factor_ton:uint16
//! withdrawal_factor_jetton:uint16
//! reserved:Coins = 0
//! reserved:Coins = 0
//! ```
//!
//! The reserved fields have no meaning at deploy time beyond being zero.

use crate::address::Address;
use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::coins::Coins;
use crate::content::{encode_off_chain_content, encode_text_tail};
use crate::conv::Store;
use crate::dict::Dictionary;
use crate::error::{EncodeResult, RangeError};

/// Key width of the staking-parameter dictionary
pub const STAKING_KEY_BITS: u16 = 16;

/// Width of the reserved field that follows the staking parameters
const RESERVED_BITS: u16 = 2;

/// Staking parameters: 16-bit key to 16-bit value
pub type StakingParams = Dictionary<u16>;

#[derive(crate::Store, crate::Load, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct RoyaltyParams {
    pub tvl_factor: u32,
    pub tvl_base: u32,
    pub rewards_factor: u32,
    pub rewards_base: u32,
    pub royalty_address: Address,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionConfig {
    pub next_item_index: u64,
    pub collection_content: Cell,
    pub nft_item_code: Cell,
    pub royalty_params: RoyaltyParams,
    pub staking_params: StakingParams,
    pub withdrawal_factor_ton: u16,
    pub withdrawal_factor_jetton: u16,
}

impl CollectionConfig {
    /// Serializes the config into the collection's initial data cell.
    pub fn to_data_cell(&self) -> EncodeResult<Cell> {
        let cell = self.to_cell()?;
        tracing::debug!(
            next_item_index = self.next_item_index,
            staking_entries = self.staking_params.len(),
            hash = %cell.hash_hex(),
            "serialized collection data"
        );
        Ok(cell)
    }
}

impl Store for CollectionConfig {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        if self.staking_params.key_bits() != STAKING_KEY_BITS {
            return Err(RangeError::KeyWidthMismatch {
                expected: STAKING_KEY_BITS,
                actual: self.staking_params.key_bits(),
            }
            .into());
        }
        let royalty = self.royalty_params.to_cell()?;
        builder
            .store_uint(self.next_item_index, 64)?
            .store_ref(self.nft_item_code.clone())?
            .store_ref(self.collection_content.clone())?
            .store_ref(royalty)?
            .store_dict(&self.staking_params)?
            .store_uint(0, RESERVED_BITS)?
            .store_uint(self.withdrawal_factor_ton as u64, 16)?
            .store_uint(self.withdrawal_factor_jetton as u64, 16)?
            .store_coins(&Coins::zero())?
            .store_coins(&Coins::zero())?;
        Ok(())
    }
}

/// Collection-level metadata URI and the prefix item contents are appended to
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionContent {
    pub collection_content: String,
    pub common_content: String,
}

impl CollectionContent {
    /// Builds `^(off-chain collection_content) ^(common_content tail)`.
    pub fn to_content_cell(&self) -> EncodeResult<Cell> {
        let collection = encode_off_chain_content(&self.collection_content)?;
        let common = encode_text_tail(&self.common_content)?;
        let mut b = CellBuilder::new();
        b.store_ref(collection)?.store_ref(common)?;
        Ok(b.build())
    }
}
