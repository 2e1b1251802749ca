//! MSB-first bit access over one compressed buffer.

use crate::source::BufferSource;
use crate::{Result, UnishoxError};

/// Return bit `index` of the payload of `buffer`, most significant bit first.
///
/// The payload starts after the length byte. Bytes the source cannot supply
/// read as zero; callers keep `index` below the declared bit count.
pub fn bit<S: BufferSource + ?Sized>(source: &S, buffer: usize, index: usize) -> u8 {
    let byte = source.read_byte(buffer, 1 + (index >> 3)).unwrap_or(0);
    (byte >> (7 - (index & 7))) & 1
}

/// Bit level reader bounded by a buffer's declared length.
#[derive(Debug, Clone)]
pub struct BitReader<'a, S: ?Sized> {
    source: &'a S,
    buffer: usize,
    total_bits: usize,
    pos: usize,
}

impl<'a, S: BufferSource + ?Sized> BitReader<'a, S> {
    /// Open `buffer` for reading. The usable length is the length byte,
    /// clamped to the bytes the source actually holds.
    pub fn open(source: &'a S, buffer: usize) -> Result<Self> {
        let stored = source
            .buffer_len(buffer)
            .ok_or(UnishoxError::UnknownBuffer(buffer))?;
        let declared = source.read_byte(buffer, 0).unwrap_or(0) as usize;
        let payload = declared.min(stored.saturating_sub(1));
        Ok(Self {
            source,
            buffer,
            total_bits: payload * 8,
            pos: 0,
        })
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.total_bits
    }

    /// Move the cursor back to a position returned by [`BitReader::position`].
    pub fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.total_bits);
        self.pos = pos;
    }

    pub fn read_bit(&mut self) -> Option<u8> {
        if self.is_exhausted() {
            return None;
        }
        let b = bit(self.source, self.buffer, self.pos);
        self.pos += 1;
        Some(b)
    }

    /// Read a `width`-bit unsigned field, first bit most significant.
    /// Returns `None` without moving if the field runs past the end.
    pub fn read_bits(&mut self, width: u8) -> Option<u32> {
        debug_assert!(width <= 32);
        if self.pos + width as usize > self.total_bits {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..width {
            value = (value << 1) | bit(self.source, self.buffer, self.pos) as u32;
            self.pos += 1;
        }
        Some(value)
    }
}
