//! Static prefix-code tables.
//!
//! A code is read one bit at a time; the `n`-th bit read is added with weight
//! `1 << n`. After each bit the accumulated value indexes a 32-entry table
//! whose entries pack `(value << 3) | length`. A non-zero entry whose length
//! equals the number of bits read so far terminates the code.

use crate::bit_reader::BitReader;
use crate::source::BufferSource;

/// Longest code in either table.
pub const MAX_CODE_LEN: u8 = 5;

/// Value returned when no code matches within [`MAX_CODE_LEN`] bits.
pub const NO_CODE: u8 = 1;

const fn entry(len: u8, value: u8) -> u8 {
    len + (value << 3)
}

/// A 32-entry canonical prefix-code lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixTable([u8; 32]);

/// In-set character index, or 0 to defer to a horizontal code.
#[rustfmt::skip]
pub const VERTICAL: PrefixTable = PrefixTable([
    entry(2, 0), entry(3, 3), entry(3, 1), entry(4, 6), 0,
    entry(4, 4), entry(3, 2), entry(4, 8), 0, 0, 0,
    entry(4, 7), 0, entry(4, 5), 0, entry(5, 9),
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, entry(5, 10),
]);

/// Character-set selector, count tier, or escape index.
#[rustfmt::skip]
pub const HORIZONTAL: PrefixTable = PrefixTable([
    entry(1, 1), entry(2, 0), 0, entry(3, 2), 0, 0, 0, entry(5, 3),
    0, 0, 0, 0, 0, 0, 0, entry(5, 5),
    0, 0, 0, 0, 0, 0, 0, entry(5, 4),
    0, 0, 0, 0, 0, 0, 0, entry(5, 6),
]);

impl PrefixTable {
    /// Decoded `(value, length)` stored at `code`, if any.
    pub fn entry(&self, code: usize) -> Option<(u8, u8)> {
        match self.0.get(code) {
            Some(&e) if e != 0 => Some((e >> 3, e & 0x07)),
            _ => None,
        }
    }

    /// Resolve the next code from `reader`.
    ///
    /// Returns `None` when the stream ends before a code completes; the
    /// cursor is then left wherever the stream ran out and the caller is
    /// expected to rewind.
    pub fn resolve<S: BufferSource + ?Sized>(&self, reader: &mut BitReader<'_, S>) -> Option<u8> {
        let mut code = 0usize;
        for count in 1..=MAX_CODE_LEN {
            code += (reader.read_bit()? as usize) << (count - 1);
            if let Some((value, len)) = self.entry(code) {
                if len == count {
                    return Some(value);
                }
            }
        }
        Some(NO_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sum of 2^-len over all entries; 1.0 for a complete code.
    fn kraft(table: &PrefixTable) -> f64 {
        (0..32)
            .filter_map(|c| table.entry(c))
            .map(|(_, len)| 1.0 / (1u32 << len) as f64)
            .sum()
    }

    #[test]
    fn both_tables_are_complete() {
        assert_eq!(kraft(&VERTICAL), 1.0);
        assert_eq!(kraft(&HORIZONTAL), 1.0);
    }

    #[test]
    fn vertical_values_cover_all_slots() {
        let mut values: Vec<u8> = (0..32).filter_map(|c| VERTICAL.entry(c)).map(|e| e.0).collect();
        values.sort();
        assert_eq!(values, (0..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn resolve_reads_low_bit_first() {
        // 0b011 leading bits: code index 6, vertical value 2.
        let bufs = [vec![1u8, 0x60]];
        let mut reader = BitReader::open(&bufs[..], 0).unwrap();
        assert_eq!(VERTICAL.resolve(&mut reader), Some(2));
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn horizontal_five_bit_codes() {
        // 11100 -> 3, 11101 -> 4, 11110 -> 5, 11111 -> 6
        let bufs = [vec![3u8, 0b1110_0111, 0b0111_1101, 0b1111_0000]];
        let mut reader = BitReader::open(&bufs[..], 0).unwrap();
        assert_eq!(HORIZONTAL.resolve(&mut reader), Some(3));
        assert_eq!(HORIZONTAL.resolve(&mut reader), Some(4));
        assert_eq!(HORIZONTAL.resolve(&mut reader), Some(5));
        assert_eq!(HORIZONTAL.resolve(&mut reader), Some(6));
    }

    #[test]
    fn end_of_stream_mid_code() {
        let bufs = [vec![1u8, 0xFF]];
        let mut reader = BitReader::open(&bufs[..], 0).unwrap();
        reader.rewind(6);
        assert_eq!(VERTICAL.resolve(&mut reader), None);
    }

    #[test]
    fn unmatched_code_falls_back() {
        let table = PrefixTable([0; 32]);
        let bufs = [vec![1u8, 0x00]];
        let mut reader = BitReader::open(&bufs[..], 0).unwrap();
        assert_eq!(table.resolve(&mut reader), Some(NO_CODE));
        assert_eq!(reader.position(), 5);
    }
}
