//! Character sets and literal lookup.

/// The seven character sets. The discriminant is the horizontal code value
/// that selects the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharSet {
    Set1 = 0,
    Set1A = 1,
    Set1B = 2,
    Set2 = 3,
    Set3 = 4,
    Set4 = 5,
    Set4A = 6,
}

impl CharSet {
    pub const ALL: [CharSet; 7] = [
        CharSet::Set1,
        CharSet::Set1A,
        CharSet::Set1B,
        CharSet::Set2,
        CharSet::Set3,
        CharSet::Set4,
        CharSet::Set4A,
    ];

    pub fn from_code(code: u8) -> Option<CharSet> {
        Self::ALL.get(code as usize).copied()
    }
}

/// In-set indices of SET1B that are controls rather than literals.
pub mod set1b {
    pub const REPEAT_OR_LF: u8 = 8;
    pub const CRLF: u8 = 9;
    pub const NOP: u8 = 10;
}

/// In-set index of SET1 that opens a Unicode run.
pub const SET1_UNICODE: u8 = 3;

/// In-set index whose non-letter literal becomes a tab when upper-shifted in SET1.
pub const TAB_SLOT: u8 = 1;

pub const SLOTS: usize = 11;

#[rustfmt::skip]
static SETS: [[u8; SLOTS]; 7] = [
    [   0, b' ', b'e',    0, b't', b'a', b'o', b'i', b'n', b's', b'r'],
    [   0, b'l', b'c', b'd', b'h', b'u', b'p', b'm', b'b', b'g', b'w'],
    [b'f', b'y', b'v', b'k', b'q', b'j', b'x', b'z',    0,    0,    0],
    [   0, b'9', b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8'],
    [b'.', b',', b'-', b'/', b'=', b'+', b' ', b'(', b')', b'$', b'%'],
    [b'&', b';', b':', b'<', b'>', b'*', b'"', b'{', b'}', b'[', b']'],
    [b'@', b'?', b'\'', b'^', b'#', b'_', b'!', b'\\', b'|', b'~', b'`'],
];

/// Literal at `index` of `set`, or `None` for an unpopulated slot.
pub fn lookup(set: CharSet, index: u8) -> Option<u8> {
    match SETS[set as usize].get(index as usize) {
        Some(&c) if c != 0 => Some(c),
        _ => None,
    }
}

/// Apply case folding to a looked-up literal.
///
/// Lowercase letters are upper-cased when `upper` is set. A non-letter at
/// [`TAB_SLOT`] becomes a tab when upper-shifted while the active set is SET1.
pub fn fold(literal: Option<u8>, upper: bool, active: CharSet, index: u8) -> Option<u8> {
    match literal {
        Some(c) if c.is_ascii_lowercase() => Some(if upper { c.to_ascii_uppercase() } else { c }),
        _ if upper && active == CharSet::Set1 && index == TAB_SLOT => Some(b'\t'),
        other => other,
    }
}
