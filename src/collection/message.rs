//! Bodies of the messages a collection understands
//!
//! Every body other than the deploy one starts with an [`OpHeader`]: a
//! 32-bit opcode followed by a 64-bit query id that the contract echoes back
//! in its replies.

use crate::address::Address;
use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::coins::Coins;
use crate::conv::Store;
use crate::dict::Dictionary;
use crate::error::{EncodeResult, LimitExceededError};

pub mod op {
    pub const MINT: u32 = 1;
    pub const BATCH_MINT: u32 = 2;
}

/// Most items a single batch-mint message may carry
pub const MAX_BATCH_MINT: usize = 250;

/// Key width of the batch-mint dictionary
pub const ITEM_INDEX_BITS: u16 = 64;

#[derive(crate::Store, crate::Load, Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpHeader {
    pub op: u32,
    pub query_id: u64,
}

/// `^{ owner:MsgAddress ^{ content bytes } }`, the part of a mint request
/// forwarded to the new item.
fn item_message(owner: &Address, content: &str) -> EncodeResult<Cell> {
    let mut content_builder = CellBuilder::new();
    content_builder.store_bytes(content.as_bytes())?;

    let mut b = CellBuilder::new();
    b.store_address(Some(owner))?
        .store_ref(content_builder.build())?;
    Ok(b.build())
}

/// Body of the message that deploys an already-funded collection
pub fn deploy_body() -> Cell {
    Cell::empty()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintNft {
    pub query_id: u64,
    pub item_index: u64,
    pub item_owner_address: Address,
    pub item_content: String,
    pub amount: Coins,
}

impl MintNft {
    pub fn to_body(&self) -> EncodeResult<Cell> {
        self.to_cell()
    }
}

impl Store for MintNft {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        let item = item_message(&self.item_owner_address, &self.item_content)?;
        builder
            .store(&OpHeader {
                op: op::MINT,
                query_id: self.query_id,
            })?
            .store_uint(self.item_index, 64)?
            .store_coins(&self.amount)?
            .store_ref(item)?;
        Ok(())
    }
}

/// One entry of a batch mint
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct MintRecord {
    pub index: u64,
    pub owner_address: Address,
    pub content: String,
    pub amount: Coins,
}

impl Store for MintRecord {
    /// Stores the dictionary value; the index is the key and is not repeated.
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        let item = item_message(&self.owner_address, &self.content)?;
        builder.store_coins(&self.amount)?.store_ref(item)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchMint {
    pub query_id: u64,
    pub nfts: Vec<MintRecord>,
}

impl BatchMint {
    /// Encodes the batch body.
    ///
    /// More than [`MAX_BATCH_MINT`] records fail with [`LimitExceededError`]
    /// before any cell is built, and a repeated index fails with
    /// [`DuplicateKeyError`](crate::error::DuplicateKeyError).
    pub fn to_body(&self) -> EncodeResult<Cell> {
        check_batch_len(self.nfts.len())?;
        let dict = Dictionary::from_entries(
            ITEM_INDEX_BITS,
            self.nfts.iter().map(|nft| (nft.index, nft)),
        )?;
        tracing::debug!(
            query_id = self.query_id,
            items = dict.len(),
            "encoding batch mint"
        );
        let mut b = CellBuilder::new();
        b.store(&OpHeader {
            op: op::BATCH_MINT,
            query_id: self.query_id,
        })?
        .store_dict(&dict)?;
        Ok(b.build())
    }
}

fn check_batch_len(len: usize) -> Result<(), LimitExceededError> {
    if len > MAX_BATCH_MINT {
        tracing::warn!(len, limit = MAX_BATCH_MINT, "batch mint rejected");
        Err(LimitExceededError {
            limit: MAX_BATCH_MINT,
            actual: len,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::conv::Load;
    use crate::error::{DuplicateKeyError, EncodeError};
    use crate::slice::CellSlice;

    fn owner() -> Address {
        Address::new(0, [0xab; 32])
    }

    fn record(index: u64) -> MintRecord {
        MintRecord {
            index,
            owner_address: owner(),
            content: format!("{index}.json"),
            amount: Coins::from(50_000_000u64),
        }
    }

    fn check_item(slice: &mut CellSlice<'_>, content: &str) {
        let item = slice.load_ref().unwrap();
        let mut s = item.as_slice();
        assert_eq!(s.load_address().unwrap(), Some(owner()));
        let content_cell = s.load_ref().unwrap();
        assert!(s.end_parse().is_ok());
        assert_eq!(content_cell.data(), content.as_bytes());
    }

    #[test]
    fn deploy_body_is_empty() {
        let body = deploy_body();
        assert_eq!(body.bit_len(), 0);
        assert!(body.refs().is_empty());
    }

    #[test]
    fn mint_layout() {
        let msg = MintNft {
            query_id: 42,
            item_index: 7,
            item_owner_address: owner(),
            item_content: "7.json".into(),
            amount: Coins::from(50_000_000u64),
        };
        let body = msg.to_body().unwrap();
        let mut s = body.as_slice();
        assert_eq!(
            OpHeader::load_from(&mut s).unwrap(),
            OpHeader {
                op: op::MINT,
                query_id: 42
            }
        );
        assert_eq!(s.load_uint(64), Ok(7));
        assert_eq!(s.load_coins().unwrap(), Coins::from(50_000_000u64));
        check_item(&mut s, "7.json");
        assert!(s.end_parse().is_ok());
    }

    #[test]
    fn mint_header_bits() {
        let body = MintNft {
            query_id: 0,
            item_index: 0,
            item_owner_address: owner(),
            item_content: String::new(),
            amount: Coins::zero(),
        }
        .to_body()
        .unwrap();
        assert_eq!(&body.data()[..4], &[0, 0, 0, 1]);
        // header, index, zero coins
        assert_eq!(body.bit_len(), 32 + 64 + 64 + 4);
    }

    #[test]
    fn batch_at_limit() {
        let batch = BatchMint {
            query_id: 1,
            nfts: (0..MAX_BATCH_MINT as u64).map(record).collect(),
        };
        let body = batch.to_body().unwrap();
        let mut s = body.as_slice();
        assert_eq!(
            OpHeader::load_from(&mut s).unwrap(),
            OpHeader {
                op: op::BATCH_MINT,
                query_id: 1
            }
        );
        assert!(s.load_bit().unwrap());
        assert_eq!(s.remaining_refs(), 1);
        assert_eq!(s.remaining_bits(), 0);
        let root = s.load_ref().unwrap();
        let values: Dictionary<RawMintValue> =
            Dictionary::load_root(&root, ITEM_INDEX_BITS).unwrap();
        assert_eq!(values.len(), MAX_BATCH_MINT);
        assert_eq!(values.keys().collect::<Vec<_>>(), (0..250u64).collect::<Vec<_>>());
    }

    #[test]
    fn batch_over_limit() {
        let batch = BatchMint {
            query_id: 1,
            nfts: (0..=MAX_BATCH_MINT as u64).map(record).collect(),
        };
        assert_eq!(
            batch.to_body(),
            Err(EncodeError::LimitExceeded(LimitExceededError {
                limit: 250,
                actual: 251
            }))
        );
    }

    #[test]
    fn batch_limit_checked_before_encoding() {
        // an item with oversized content would fail encoding, the count check wins
        let mut nfts: Vec<MintRecord> = (0..=MAX_BATCH_MINT as u64).map(record).collect();
        nfts[0].content = "x".repeat(500);
        let batch = BatchMint { query_id: 0, nfts };
        assert!(matches!(
            batch.to_body(),
            Err(EncodeError::LimitExceeded(_))
        ));
    }

    #[test]
    fn batch_duplicate_index() {
        let batch = BatchMint {
            query_id: 1,
            nfts: vec![record(3), record(5), record(3)],
        };
        assert_eq!(
            batch.to_body(),
            Err(EncodeError::DuplicateKey(DuplicateKeyError { key: 3 }))
        );
    }

    #[test]
    fn batch_record_value_layout() {
        let batch = BatchMint {
            query_id: 9,
            nfts: vec![record(12)],
        };
        let body = batch.to_body().unwrap();
        let mut s = body.as_slice();
        s.skip_bits(32 + 64 + 1).unwrap();
        let root = s.load_ref().unwrap();
        let mut leaf = root.as_slice();
        // single 64-bit key 12: `10` + 7-bit length 64 + key
        assert_eq!(leaf.load_uint(2), Ok(0b10));
        assert_eq!(leaf.load_uint(7), Ok(64));
        assert_eq!(leaf.load_uint(64), Ok(12));
        assert_eq!(leaf.load_coins().unwrap(), Coins::from(50_000_000u64));
        check_item(&mut leaf, "12.json");
        assert!(leaf.end_parse().is_ok());
    }

    #[test]
    fn empty_batch() {
        let body = BatchMint {
            query_id: 0,
            nfts: Vec::new(),
        }
        .to_body()
        .unwrap();
        assert_eq!(body.bit_len(), 32 + 64 + 1);
        assert!(body.refs().is_empty());
    }

    /// Dictionary value read back as coins plus the item reference
    #[derive(Debug, PartialEq, Eq)]
    struct RawMintValue {
        amount: Coins,
        item: Cell,
    }

    impl Load for RawMintValue {
        fn load_from(slice: &mut CellSlice<'_>) -> crate::slice::ParseResult<Self> {
            Ok(Self {
                amount: slice.load_coins()?,
                item: slice.load_ref()?,
            })
        }
    }
}
