//! Byte-chunk lookup tables used for member enumeration.
//!
//! [`MaskTables`] maps every 8-bit chunk of a bitmask to the ascending list of
//! its set bit offsets. Sets use it to materialize their members one byte at a
//! time instead of testing every bit.
//!
//! The table is evaluated at compile time into a `static`, so it is written
//! exactly once and is shared read-only by every thread.
//!
//! # Examples
//!
//! ```
//! use deduce_core::table::MASK_TABLES;
//!
//! assert_eq!(MASK_TABLES.offsets(0b1010_0001), &[0, 5, 7]);
//! assert_eq!(MASK_TABLES.count(0xff), 8);
//! ```

/// Member offsets and counts for every possible 8-bit chunk.
#[derive(Debug)]
pub struct MaskTables {
    offsets: [[u8; 8]; 256],
    counts: [u8; 256],
}

/// The process-wide chunk table.
pub static MASK_TABLES: MaskTables = MaskTables::build();

impl MaskTables {
    const fn build() -> Self {
        let mut offsets = [[0; 8]; 256];
        let mut counts = [0; 256];
        let mut chunk = 0;
        #[expect(clippy::cast_possible_truncation)]
        while chunk < 256 {
            let mut count = 0;
            let mut bit = 0;
            while bit < 8 {
                if chunk & (1 << bit) != 0 {
                    offsets[chunk][count] = bit as u8;
                    count += 1;
                }
                bit += 1;
            }
            counts[chunk] = count as u8;
            chunk += 1;
        }
        Self { offsets, counts }
    }

    /// Returns the set bit offsets (0-7) of `chunk` in ascending order.
    #[must_use]
    #[inline]
    pub fn offsets(&self, chunk: u8) -> &[u8] {
        let chunk = usize::from(chunk);
        &self.offsets[chunk][..usize::from(self.counts[chunk])]
    }

    /// Returns the number of set bits in `chunk`.
    #[must_use]
    #[inline]
    pub fn count(&self, chunk: u8) -> u8 {
        self.counts[usize::from(chunk)]
    }

    /// Appends `base + offset` for every set bit of `word` to `out`, lowest bit first.
    ///
    /// Only the lowest `bits` bits of `word` are visited, rounded up to whole bytes.
    #[inline]
    pub(crate) fn extend_members<E>(&self, word: u64, base: u8, bits: u8, out: &mut E)
    where
        E: Extend<u8>,
    {
        let mut word = word;
        let mut chunk_base = base;
        let mut remaining = bits;
        while word != 0 && remaining > 0 {
            let chunk = (word & 0xff) as u8;
            if chunk != 0 {
                out.extend(
                    self.offsets(chunk)
                        .iter()
                        .map(|&offset| chunk_base + offset),
                );
            }
            word >>= 8;
            chunk_base = chunk_base.wrapping_add(8);
            remaining = remaining.saturating_sub(8);
        }
    }
}
