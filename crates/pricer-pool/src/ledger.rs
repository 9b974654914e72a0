//! Per-block occupancy bitmap.
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8`. A set bit means the
//! block is in use. Padding bits past `len` in the last byte are never set.

use crate::error::PoolError;

pub(crate) struct Ledger {
    bits: Vec<u8>,
    /// Number of tracked blocks.
    len: usize,
}

impl Ledger {
    /// Create an all-free ledger for `len` blocks.
    ///
    /// The backing bytes are reserved fallibly so an allocation failure
    /// surfaces as `PoolError::LedgerUnavailable` instead of aborting.
    pub(crate) fn new(len: usize) -> Result<Self, PoolError> {
        let bytes = len.div_ceil(8);
        let mut bits = Vec::new();
        bits.try_reserve_exact(bytes)
            .map_err(|_| PoolError::LedgerUnavailable { bytes })?;
        bits.resize(bytes, 0);
        Ok(Self { bits, len })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_set(&self, index: usize) -> bool {
        self.bits[index / 8] & (1 << (index % 8)) != 0
    }

    pub(crate) fn set_range(&mut self, start: usize, n: usize) {
        for i in start..start + n {
            self.bits[i / 8] |= 1 << (i % 8);
        }
    }

    pub(crate) fn clear_range(&mut self, start: usize, n: usize) {
        for i in start..start + n {
            self.bits[i / 8] &= !(1 << (i % 8));
        }
    }

    /// Whether every block in `start..start + n` is in use.
    pub(crate) fn all_set(&self, start: usize, n: usize) -> bool {
        (start..start + n).all(|i| self.is_set(i))
    }

    /// First-fit search for `n` contiguous free blocks.
    ///
    /// Scans from block 0, counting consecutive free bits; returns the start
    /// of the first run whose length reaches `n`. A zero-length request
    /// never matches.
    pub(crate) fn find_run(&self, n: usize) -> Option<usize> {
        if n == 0 || n > self.len {
            return None;
        }
        let mut run = 0usize;
        let mut i = 0usize;
        while i < self.len {
            // Fully occupied byte: skip all eight blocks at once.
            if i % 8 == 0 && self.bits[i / 8] == u8::MAX {
                run = 0;
                i += 8;
                continue;
            }
            if self.is_set(i) {
                run = 0;
            } else {
                run += 1;
                if run == n {
                    return Some(i + 1 - n);
                }
            }
            i += 1;
        }
        None
    }

    pub(crate) fn used_count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.len - self.used_count()
    }

    /// Length of the longest run of free blocks.
    pub(crate) fn largest_free_run(&self) -> usize {
        let mut best = 0usize;
        let mut run = 0usize;
        for i in 0..self.len {
            if self.is_set(i) {
                run = 0;
            } else {
                run += 1;
                best = best.max(run);
            }
        }
        best
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bits
    }
}
