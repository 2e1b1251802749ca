//! Decoder for Unishox1 compressed short strings.
//!
//! Strings are stored as tables of length-prefixed bitstreams, typically in
//! read-only memory. Each buffer decodes to UTF-8 text; back-references may
//! reuse text from earlier output or from other buffers of the same table.
//!
//! ```
//! use unishox_pgm::decompress_to_string;
//!
//! let table = [[0x01u8, 0x60]];
//! assert_eq!(decompress_to_string(&table, 0).unwrap(), "e");
//! ```

pub mod backref;
pub mod bit_reader;
pub mod charset;
pub mod codes;
pub mod config;
pub mod count;
pub mod decoder;
pub mod error;
pub mod source;
pub mod unicode;
pub mod utf8;

pub use bit_reader::BitReader;
pub use charset::CharSet;
pub use config::{Config, UnmappedSlots};
pub use decoder::Decoder;
pub use error::{Result, UnishoxError};
pub use source::{BufferSource, BufferTable};

/// Decode buffer `index` of `source` until its bitstream is exhausted.
pub fn decompress<S: BufferSource + ?Sized>(source: &S, index: usize) -> Result<Vec<u8>> {
    Decoder::new(source).decode(index, 0)
}

/// Decode buffer `index`, stopping once `limit` bytes were produced.
/// A `limit` of 0 means no limit.
pub fn decompress_with_limit<S: BufferSource + ?Sized>(
    source: &S,
    index: usize,
    limit: usize,
) -> Result<Vec<u8>> {
    Decoder::new(source).decode(index, limit)
}

/// Decode buffer `index` and check that the result is UTF-8.
pub fn decompress_to_string<S: BufferSource + ?Sized>(source: &S, index: usize) -> Result<String> {
    Ok(String::from_utf8(decompress(source, index)?)?)
}
