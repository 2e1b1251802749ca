//! Dictionary back-references.
//!
//! A back-reference is three counts: length (plus [`MIN_LEN`]), distance and
//! context. Context 0 copies from this buffer's own output; a non-zero
//! context decodes another buffer of the table and copies from that.

use tracing::debug;

use crate::bit_reader::BitReader;
use crate::count::read_count;
use crate::decoder::Decoder;
use crate::source::BufferSource;
use crate::{Result, UnishoxError};

/// Shortest possible back-reference.
pub const MIN_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backref {
    pub len: usize,
    pub dist: usize,
    pub ctx: usize,
}

/// Read the length, distance and context counts. `None` if the stream ends.
pub fn read_backref<S: BufferSource + ?Sized>(reader: &mut BitReader<'_, S>) -> Option<Backref> {
    let len = read_count(reader)? as usize + MIN_LEN;
    let dist = read_count(reader)? as usize;
    let ctx = read_count(reader)? as usize;
    Some(Backref { len, dist, ctx })
}

/// Copy `len` bytes starting at `dist` onto the end of `out`.
///
/// Bytes are copied in increasing order, so a source range that overlaps the
/// bytes being appended repeats them.
pub fn copy_within(out: &mut Vec<u8>, dist: usize, len: usize) -> Result<()> {
    let written = out.len();
    if dist >= written {
        return Err(UnishoxError::InvalidBackref { dist, len, written });
    }
    out.reserve(len);
    for i in 0..len {
        let b = out[dist + i];
        out.push(b);
    }
    Ok(())
}

/// Append `dict[dist..dist + len]` to `out`.
pub fn copy_from(out: &mut Vec<u8>, dict: &[u8], dist: usize, len: usize) -> Result<()> {
    let src = dict
        .get(dist..dist + len)
        .ok_or(UnishoxError::InvalidBackref {
            dist,
            len,
            written: dict.len(),
        })?;
    out.extend_from_slice(src);
    Ok(())
}

/// Read a back-reference from `reader` and expand it onto `out`.
///
/// Returns the number of bytes appended, or `None` when the stream ended
/// inside the back-reference. `stack` holds the buffers currently being
/// decoded, innermost last.
pub fn expand<S: BufferSource + ?Sized>(
    decoder: &Decoder<'_, S>,
    reader: &mut BitReader<'_, S>,
    out: &mut Vec<u8>,
    stack: &mut Vec<usize>,
) -> Result<Option<usize>> {
    let Some(backref) = read_backref(reader) else {
        return Ok(None);
    };
    if backref.ctx == 0 {
        copy_within(out, backref.dist, backref.len)?;
    } else {
        let current = reader.buffer();
        let target = decoder
            .source()
            .resolve_context(current, backref.ctx)
            .ok_or(UnishoxError::ContextOutOfRange {
                buffer: current,
                ctx: backref.ctx,
            })?;
        debug!(
            from = current,
            target,
            dist = backref.dist,
            len = backref.len,
            "expanding cross-buffer back-reference"
        );
        let dict = decoder.decode_nested(target, backref.dist + backref.len + 1, stack)?;
        copy_from(out, &dict, backref.dist, backref.len)?;
    }
    Ok(Some(backref.len))
}
