/// Marker trait for bit-oriented buffers with incremental append operations
///
/// The `push_XXX` methods on `Target` are infallible and total;
/// while they return a `usize` value representing the number of bits written,
/// this is used only for summary book-keeping on the caller side, rather than a
/// feedback mechanism that may indicate failure or partial success. Limits such
/// as the cell capacity are enforced one level up, by
/// [`CellBuilder`](crate::builder::CellBuilder), before anything is pushed.
///
/// All implementors of `Target` must define these methods as infallible and total.
pub trait Target {
    /// Returns a fresh object of the `Self` type with an initially empty buffer.
    fn create() -> Self;

    /// Appends a single bit to a Target object.
    ///
    /// This method should never panic under normal conditions, and the return value must be `1`.
    fn push_bit(&mut self, bit: bool) -> usize;

    /// Appends `count` copies of the same bit.
    ///
    /// The return value must be `count`.
    fn push_repeat(&mut self, bit: bool, count: usize) -> usize {
        for _ in 0..count {
            self.push_bit(bit);
        }
        count
    }

    /// Appends the low `bits` bits of `value`, most significant first.
    ///
    /// Widths above 64 are left-padded with zero bits. Callers are responsible
    /// for checking that `value` fits in `bits`; higher bits are silently ignored here.
    ///
    /// The operational semantics of this method should be indistinguishable
    /// from repeated calls to `push_bit`, and the return value must be `bits`.
    fn push_uint(&mut self, value: u64, bits: u16) -> usize {
        let bits = bits as usize;
        let pad = bits.saturating_sub(64);
        self.push_repeat(false, pad);
        for i in (0..(bits - pad)).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        bits
    }

    /// Appends every byte of `buf`, eight bits each.
    ///
    /// ```ignore
    /// x.push_all(b"Rust") === x.push_uint(b'R' as u64, 8) + ... + x.push_uint(b't' as u64, 8)
    /// ```
    ///
    /// The return value must be the total length of the slice in bits.
    fn push_all(&mut self, buf: &[u8]) -> usize {
        for &b in buf {
            self.push_uint(b as u64, 8);
        }
        buf.len() * 8
    }
}

/// Zero-allocation target that only counts the bits it is given.
///
/// Used to measure the serialized length of a candidate encoding
/// without materializing it.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct BitCounter(usize);

impl BitCounter {
    /// Number of bits pushed so far
    pub const fn count(&self) -> usize {
        self.0
    }
}

impl Target for BitCounter {
    #[inline]
    fn create() -> Self {
        Self(0)
    }

    #[inline(always)]
    fn push_bit(&mut self, _: bool) -> usize {
        self.0 += 1;
        1
    }

    #[inline(always)]
    fn push_repeat(&mut self, _: bool, count: usize) -> usize {
        self.0 += count;
        count
    }

    #[inline(always)]
    fn push_uint(&mut self, _: u64, bits: u16) -> usize {
        self.0 += bits as usize;
        bits as usize
    }

    #[inline(always)]
    fn push_all(&mut self, buf: &[u8]) -> usize {
        self.0 += buf.len() * 8;
        buf.len() * 8
    }
}
