use crate::bit_reader::BitReader;
use crate::codes::HORIZONTAL;
use crate::source::BufferSource;

/// Field width per count tier.
pub const COUNT_BITS: [u8; 7] = [5, 2, 7, 9, 12, 16, 17];
/// Value added to the field per count tier.
pub const COUNT_ADDER: [u32; 7] = [4, 0, 36, 164, 676, 4772, 0];

/// Decode a non-negative count: a horizontal code picks the tier, then a
/// fixed-width MSB-first field follows.
///
/// `None` means the stream ended inside the count.
pub fn read_count<S: BufferSource + ?Sized>(reader: &mut BitReader<'_, S>) -> Option<u32> {
    let tier = HORIZONTAL.resolve(reader)? as usize;
    let width = *COUNT_BITS.get(tier)?;
    let field = reader.read_bits(width)?;
    Some(field + COUNT_ADDER[tier])
}
