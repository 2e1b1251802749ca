#![allow(dead_code)]

use unishox_pgm::charset::{lookup, CharSet};
use unishox_pgm::codes::{PrefixTable, HORIZONTAL, VERTICAL};
use unishox_pgm::count::{COUNT_ADDER, COUNT_BITS};
use unishox_pgm::unicode::{UNI_ADDER, UNI_BITS};

pub const SET1: u8 = CharSet::Set1 as u8;
pub const SET1A: u8 = CharSet::Set1A as u8;
pub const SET1B: u8 = CharSet::Set1B as u8;
pub const SET2: u8 = CharSet::Set2 as u8;

/// Builds bitstreams symbol by symbol, in the order the decoder reads them.
#[derive(Default, Clone)]
pub struct Bits {
    bits: Vec<bool>,
}

impl Bits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Literal bits, e.g. `"0110"`. Spaces are ignored.
    pub fn raw(&mut self, pattern: &str) -> &mut Self {
        for c in pattern.chars().filter(|c| !c.is_whitespace()) {
            self.bits.push(c == '1');
        }
        self
    }

    /// Unsigned field, most significant bit first.
    pub fn field(&mut self, value: u32, width: u8) -> &mut Self {
        for i in (0..width).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
        self
    }

    fn code(&mut self, table: &PrefixTable, value: u8) -> &mut Self {
        let (code, len) = (0..32)
            .find_map(|c| match table.entry(c) {
                Some((v, len)) if v == value => Some((c, len)),
                _ => None,
            })
            .expect("value has a code");
        // The decoder adds the n-th bit with weight 1 << n.
        for i in 0..len {
            self.bits.push((code >> i) & 1 == 1);
        }
        self
    }

    pub fn vertical(&mut self, value: u8) -> &mut Self {
        self.code(&VERTICAL, value)
    }

    pub fn horizontal(&mut self, value: u8) -> &mut Self {
        self.code(&HORIZONTAL, value)
    }

    pub fn count(&mut self, n: u32) -> &mut Self {
        let tier = [1usize, 0, 2, 3, 4, 5, 6]
            .into_iter()
            .find(|&t| n >= COUNT_ADDER[t] && n - COUNT_ADDER[t] < 1 << COUNT_BITS[t])
            .expect("count in range");
        self.horizontal(tier as u8)
            .field(n - COUNT_ADDER[tier], COUNT_BITS[tier])
    }

    pub fn delta(&mut self, d: i32) -> &mut Self {
        let m = d.unsigned_abs() as i32;
        let tier = (0..5)
            .find(|&t| m >= UNI_ADDER[t] && m - UNI_ADDER[t] < 1 << UNI_BITS[t])
            .expect("delta in range");
        for _ in 0..tier {
            self.bits.push(true);
        }
        self.bits.push(false);
        self.bits.push(d < 0);
        self.field((m - UNI_ADDER[tier]) as u32, UNI_BITS[tier])
    }

    pub fn escape(&mut self, k: u8) -> &mut Self {
        self.raw("11111").horizontal(k)
    }

    /// Upper-case shift prefix, valid while the active set is SET1.
    pub fn upper(&mut self) -> &mut Self {
        self.vertical(0).horizontal(SET1)
    }

    /// Double shift: latch all-upper.
    pub fn latch(&mut self) -> &mut Self {
        self.upper().upper()
    }

    /// Character `idx` of a set other than SET1 or SET2.
    pub fn in_set(&mut self, set: u8, idx: u8) -> &mut Self {
        self.vertical(0).horizontal(set).vertical(idx)
    }

    pub fn backref(&mut self, len: u32, dist: u32, ctx: u32) -> &mut Self {
        self.vertical(0)
            .horizontal(SET1A)
            .vertical(0)
            .count(len - 5)
            .count(dist)
            .count(ctx)
    }

    /// Open a single Unicode code (or a run, when preceded by [`Bits::upper`]).
    pub fn unicode(&mut self) -> &mut Self {
        self.vertical(3)
    }

    /// Encode ASCII text reachable from SET1 without the all-upper latch.
    pub fn text(&mut self, s: &str) -> &mut Self {
        for c in s.bytes() {
            let lower = c.to_ascii_lowercase();
            let (set, idx) = find_literal(lower).expect("encodable character");
            if c.is_ascii_uppercase() {
                self.upper();
                if set == CharSet::Set1 {
                    self.vertical(idx);
                } else {
                    self.vertical(0).horizontal(set as u8).vertical(idx);
                }
            } else {
                match set {
                    CharSet::Set1 => {
                        self.vertical(idx);
                    }
                    CharSet::Set2 => {
                        self.vertical(0)
                            .horizontal(SET2)
                            .vertical(idx)
                            .vertical(0)
                            .horizontal(SET1);
                    }
                    _ => {
                        self.in_set(set as u8, idx);
                    }
                }
            }
        }
        self
    }

    /// Pack into bytes, zero padded.
    pub fn payload(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |b, (i, &bit)| b | ((bit as u8) << (7 - i)))
            })
            .collect()
    }

    /// Length-prefixed buffer.
    pub fn buffer(&self) -> Vec<u8> {
        let payload = self.payload();
        let mut out = vec![payload.len() as u8];
        out.extend(payload);
        out
    }
}

fn find_literal(c: u8) -> Option<(CharSet, u8)> {
    // Space is slot 1 of SET1; SET3 holds a second one.
    CharSet::ALL
        .into_iter()
        .flat_map(|set| (0..11).map(move |idx| (set, idx)))
        .find(|&(set, idx)| lookup(set, idx) == Some(c))
}
