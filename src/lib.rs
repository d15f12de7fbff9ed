//! Off-chain encoder for a lockup NFT collection contract
//!
//! # Overview
//!
//! Contracts on TON-style chains read their persistent data and their
//! incoming messages from *cells*: immutable nodes of at most 1023 bits and
//! four references to other cells. Before a collection can be deployed or
//! asked to mint, someone has to pack the deployment data and the message
//! bodies into such trees, bit for bit in the order the contract reads them.
//! This crate does that packing, and nothing else: it never signs, sends or
//! waits for anything.
//!
//! The library is layered the same way the data is:
//!
//! * [`bits`], [`cell`], [`builder`] and [`slice`] provide the bit buffer,
//!   the finished [`Cell`] with its representation hash, the append-only
//!   [`CellBuilder`] and the [`CellSlice`] reader.
//! * [`coins`], [`address`] and [`state_init`] hold the small fixed layouts
//!   that appear everywhere: variable-length amounts, standard addresses,
//!   and the code/data pair a contract address is derived from.
//! * [`dict`] serializes integer-keyed maps as canonical binary tries;
//!   [`content`] writes metadata URIs as snake-linked chains of cells.
//! * [`collection`] assembles the above into the collection's deployment
//!   data and its deploy, mint and batch-mint message bodies, and [`provider`]
//!   describes the external party that actually delivers a message.
//! * [`boc`] flattens a finished tree into the bag-of-cells bytes that
//!   wallets and RPC endpoints accept.
//!
//! # Conversion traits
//!
//! The traits [`Store`] and [`Load`] are the keystones of the library. A
//! type implementing [`Store`] knows how to append itself to a builder; a
//! type implementing [`Load`] reads itself back from a slice. Plain structs
//! whose fields are laid out back-to-back can derive both:
//!
//! ```
//! use cellar::{Address, Load, Store};
//!
//! #[derive(Store, Load, Debug, PartialEq)]
//! struct Transfer {
//!     query_id: u64,
//!     destination: Address,
//! }
//!
//! let t = Transfer { query_id: 7, destination: Address::new(0, [1; 32]) };
//! let cell = t.to_cell().unwrap();
//! assert_eq!(cell.bit_len(), 64 + 267);
//! assert_eq!(Transfer::from_cell(&cell).unwrap(), t);
//! ```
//!
//! # Errors
//!
//! Every encoding operation returns [`EncodeResult`]. Limits are never
//! clamped: a value that does not fit its width, a cell that would overflow,
//! a repeated dictionary key or an oversized batch each surface as their own
//! variant of [`EncodeError`](error::EncodeError).

extern crate load_derive;
extern crate store_derive;

// Lets the derive macros name `::cellar` from inside this crate as well.
extern crate self as cellar;

pub mod address;
pub mod bits;
pub mod boc;
pub mod builder;
pub mod cell;
pub mod coins;
pub mod collection;
pub mod content;
pub mod conv;
pub mod dict;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod slice;
pub mod state_init;

pub use crate::address::Address;
pub use crate::bits::BitString;
pub use crate::builder::CellBuilder;
pub use crate::cell::{Cell, CellHash, MAX_CELL_BITS, MAX_CELL_REFS};
pub use crate::coins::Coins;
pub use crate::collection::NftCollection;
pub use crate::conv::{target::Target, Load, Store};
pub use crate::dict::Dictionary;
pub use crate::error::{EncodeError, EncodeResult};
pub use crate::slice::{CellSlice, ParseError, ParseResult};
pub use crate::state_init::StateInit;

pub use ::load_derive::Load;
pub use ::store_derive::Store;
pub use ::lazy_static::lazy_static;
