//! Content cells
//!
//! Off-chain content is a URI prefixed with the one-byte tag
//! [`OFF_CHAIN_CONTENT_TAG`], laid out as a *snake*: the bytes are cut into
//! chunks of [`SNAKE_CHUNK_BYTES`], each cell holds one chunk and refers to
//! the cell holding the next.
//!
//! Untagged text (used for the per-item "common content" prefix, which the
//! collection contract interprets on its own) is written with
//! [`CellBuilder::store_string_tail`] instead.

use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::error::EncodeResult;
use crate::slice::{ParseError, ParseResult};

/// Discriminator byte for off-chain content
pub const OFF_CHAIN_CONTENT_TAG: u8 = 0x01;

/// Payload bytes per snake cell
pub const SNAKE_CHUNK_BYTES: usize = 127;

/// Lays `data` out as a chain of cells, first chunk in the returned root.
pub fn make_snake_cell(data: &[u8]) -> EncodeResult<Cell> {
    let mut tail: Option<Cell> = None;
    for chunk in data.chunks(SNAKE_CHUNK_BYTES).rev() {
        let mut b = CellBuilder::new();
        b.store_bytes(chunk)?;
        if let Some(next) = tail.take() {
            b.store_ref(next)?;
        }
        tail = Some(b.build());
    }
    Ok(tail.unwrap_or_else(Cell::empty))
}

/// Concatenates the bytes of a snake starting at `cell`, following the
/// first reference of every cell.
pub fn flatten_snake_cell(cell: &Cell) -> ParseResult<Vec<u8>> {
    cell.as_slice().load_bytes_tail()
}

/// Encodes `uri` as tagged off-chain content.
pub fn encode_off_chain_content(uri: &str) -> EncodeResult<Cell> {
    let mut data = Vec::with_capacity(uri.len() + 1);
    data.push(OFF_CHAIN_CONTENT_TAG);
    data.extend_from_slice(uri.as_bytes());
    make_snake_cell(&data)
}

/// Recovers the URI from a cell produced by [`encode_off_chain_content`].
pub fn decode_off_chain_content(cell: &Cell) -> ParseResult<String> {
    let data = flatten_snake_cell(cell)?;
    match data.split_first() {
        Some((&OFF_CHAIN_CONTENT_TAG, rest)) => Ok(String::from_utf8(rest.to_vec())?),
        Some((&tag, _)) => Err(ParseError::InvalidTag {
            context: "off-chain content",
            tag: tag as u64,
        }),
        None => Err(ParseError::NotEnoughBits {
            requested: 8,
            remaining: 0,
        }),
    }
}

/// Stores `s` as untagged UTF-8 into a fresh cell, spilling into references
/// when it is too long for one cell.
pub fn encode_text_tail(s: &str) -> EncodeResult<Cell> {
    let mut b = CellBuilder::new();
    b.store_string_tail(s)?;
    Ok(b.build())
}
