//! Storage abstraction for compressed buffers.
//!
//! Every compressed buffer is laid out as `[length][payload ...]` where the
//! leading byte counts payload bytes. The decoder only ever asks for single
//! bytes through [`BufferSource`], so tables can live on the heap, in a
//! memory map, or in a flash image.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Result, UnishoxError};

/// Byte-level access to an indexed table of compressed buffers.
pub trait BufferSource {
    /// Number of buffers in the table.
    fn buffer_count(&self) -> usize;

    /// Number of stored bytes of `buffer`, including the length byte.
    fn buffer_len(&self, buffer: usize) -> Option<usize>;

    /// Read byte `offset` of `buffer`. Offset 0 is the length byte.
    fn read_byte(&self, buffer: usize, offset: usize) -> Option<u8>;

    /// Map a back-reference context seen while decoding `current` to the
    /// index of the buffer it names.
    fn resolve_context(&self, current: usize, ctx: usize) -> Option<usize> {
        current
            .checked_sub(ctx)
            .filter(|&idx| idx < self.buffer_count())
    }
}

impl<B: AsRef<[u8]>> BufferSource for [B] {
    fn buffer_count(&self) -> usize {
        self.len()
    }

    fn buffer_len(&self, buffer: usize) -> Option<usize> {
        self.get(buffer).map(|b| b.as_ref().len())
    }

    fn read_byte(&self, buffer: usize, offset: usize) -> Option<u8> {
        self.get(buffer)?.as_ref().get(offset).copied()
    }
}

impl<B: AsRef<[u8]>> BufferSource for Vec<B> {
    fn buffer_count(&self) -> usize {
        self.as_slice().buffer_count()
    }

    fn buffer_len(&self, buffer: usize) -> Option<usize> {
        self.as_slice().buffer_len(buffer)
    }

    fn read_byte(&self, buffer: usize, offset: usize) -> Option<u8> {
        self.as_slice().read_byte(buffer, offset)
    }
}

impl<B: AsRef<[u8]>, const N: usize> BufferSource for [B; N] {
    fn buffer_count(&self) -> usize {
        N
    }

    fn buffer_len(&self, buffer: usize) -> Option<usize> {
        self.as_slice().buffer_len(buffer)
    }

    fn read_byte(&self, buffer: usize, offset: usize) -> Option<u8> {
        self.as_slice().read_byte(buffer, offset)
    }
}

/// Owned table of length-prefixed compressed buffers.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct BufferTable {
    pub buffers: Vec<Vec<u8>>,
}

impl BufferTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already length-prefixed buffer and return its index.
    pub fn push(&mut self, buffer: Vec<u8>) -> usize {
        self.buffers.push(buffer);
        self.buffers.len() - 1
    }

    /// Append a raw bitstream payload, prefixing it with its length byte.
    pub fn push_payload(&mut self, payload: &[u8]) -> Result<usize> {
        let len = u8::try_from(payload.len())
            .map_err(|_| UnishoxError::PayloadTooLong(payload.len()))?;
        let mut buffer = Vec::with_capacity(payload.len() + 1);
        buffer.push(len);
        buffer.extend_from_slice(payload);
        Ok(self.push(buffer))
    }

    /// Build a table from raw payloads in order.
    pub fn from_payloads<I, P>(payloads: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut table = Self::new();
        for payload in payloads {
            table.push_payload(payload.as_ref())?;
        }
        Ok(table)
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.buffers.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Load a table serialized with [`BufferTable::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(bincode::deserialize(&data)?)
    }

    /// Serialize this table to disk with bincode.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = bincode::serialize(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

impl BufferSource for BufferTable {
    fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    fn buffer_len(&self, buffer: usize) -> Option<usize> {
        self.buffers.buffer_len(buffer)
    }

    fn read_byte(&self, buffer: usize, offset: usize) -> Option<u8> {
        self.buffers.read_byte(buffer, offset)
    }
}
