//! Delta-coded Unicode scalars.
//!
//! A run of leading 1 bits (at most five) picks a tier. Tiers 0 to 4 carry a
//! sign bit and a fixed-width magnitude; five leading 1s escape to a
//! horizontal code that the caller interprets as a control.

use crate::bit_reader::BitReader;
use crate::codes::HORIZONTAL;
use crate::source::BufferSource;

pub const UNI_BITS: [u8; 5] = [6, 12, 14, 16, 21];
pub const UNI_ADDER: [i32; 5] = [0, 64, 4160, 20544, 86080];

/// Escape controls inside a Unicode run.
pub mod escape {
    pub const BACKREF: u8 = 0;
    pub const SPACE: u8 = 1;
    pub const END_RUN: u8 = 2;
    pub const COMMA: u8 = 3;
    pub const FULL_STOP: u8 = 4;
    pub const CR: u8 = 5;
    pub const LF: u8 = 6;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeToken {
    /// Signed difference to the previous scalar.
    Delta(i32),
    /// Control code, see [`escape`].
    Escape(u8),
}

/// Read one delta or escape. `None` when the stream ends inside it.
pub fn read_delta<S: BufferSource + ?Sized>(reader: &mut BitReader<'_, S>) -> Option<UnicodeToken> {
    let mut tier = 0usize;
    while tier < UNI_BITS.len() {
        if reader.read_bit()? == 0 {
            break;
        }
        tier += 1;
    }
    if tier == UNI_BITS.len() {
        return HORIZONTAL.resolve(reader).map(UnicodeToken::Escape);
    }
    let negative = reader.read_bit()? == 1;
    let magnitude = reader.read_bits(UNI_BITS[tier])? as i32 + UNI_ADDER[tier];
    Some(UnicodeToken::Delta(if negative { -magnitude } else { magnitude }))
}
