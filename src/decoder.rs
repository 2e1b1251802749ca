//! Main decode loop.
//!
//! Each iteration decodes one symbol: a literal, a set switch or case
//! control, a Unicode run, a raw byte, or a back-reference. The stream has no
//! terminator; decoding ends when a code cannot be completed within the
//! buffer's declared length, or when an output limit is reached.

use tracing::{debug, trace, warn};

use crate::backref;
use crate::bit_reader::BitReader;
use crate::charset::{self, set1b, CharSet, SET1_UNICODE};
use crate::codes::{HORIZONTAL, VERTICAL};
use crate::config::{Config, UnmappedSlots};
use crate::count::read_count;
use crate::source::BufferSource;
use crate::unicode::{escape, read_delta, UnicodeToken};
use crate::utf8::write_utf8;
use crate::{Result, UnishoxError};

/// Unwrap a decoded value or report that the stream ended.
macro_rules! next {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => return Ok(Step::End),
        }
    };
}

/// Unicode scalar above which a full stop escape becomes U+3002.
const IDEOGRAPHIC_THRESHOLD: i32 = 0x3000;
const IDEOGRAPHIC_FULL_STOP: i32 = 0x3002;

/// Outcome of one symbol.
enum Step {
    /// Keep decoding; the symbol may or may not have produced output.
    Next,
    /// The stream ran out inside the symbol.
    End,
}

/// Per-call decode state.
#[derive(Debug)]
struct DecodeState {
    set: CharSet,
    all_upper: bool,
    prev_unicode: i32,
}

impl Default for DecodeState {
    fn default() -> Self {
        Self {
            set: CharSet::Set1,
            all_upper: false,
            prev_unicode: 0,
        }
    }
}

fn read_set<S: BufferSource + ?Sized>(reader: &mut BitReader<'_, S>) -> Option<CharSet> {
    // Horizontal values are 0..=6, one per set.
    HORIZONTAL.resolve(reader).and_then(CharSet::from_code)
}

/// Decoder bound to one buffer table.
pub struct Decoder<'a, S: ?Sized> {
    source: &'a S,
    config: Config,
}

impl<'a, S: BufferSource + ?Sized> Decoder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: &'a S, config: Config) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Decode buffer `index`.
    ///
    /// With `limit == 0` the whole bitstream is decoded. Otherwise decoding
    /// stops once at least `limit` bytes were produced and the result is cut
    /// to `limit` bytes.
    pub fn decode(&self, index: usize, limit: usize) -> Result<Vec<u8>> {
        let mut stack = Vec::new();
        let mut out = self.decode_nested(index, limit, &mut stack)?;
        if limit > 0 {
            out.truncate(limit);
        }
        Ok(out)
    }

    /// Decode buffer `index` and append it to `out`, returning the number of
    /// bytes appended. `out` is left untouched on error.
    pub fn decode_into(&self, index: usize, out: &mut Vec<u8>, limit: usize) -> Result<usize> {
        let decoded = self.decode(index, limit)?;
        out.extend_from_slice(&decoded);
        Ok(decoded.len())
    }

    /// Decode `index` while the buffers in `stack` are still in progress.
    #[tracing::instrument(level = "debug", skip(self, stack))]
    pub(crate) fn decode_nested(
        &self,
        index: usize,
        limit: usize,
        stack: &mut Vec<usize>,
    ) -> Result<Vec<u8>> {
        if stack.contains(&index) {
            warn!(index, ?stack, "rejecting cyclic back-reference");
            return Err(UnishoxError::CyclicReference(index));
        }
        if let Some(max) = self.config.max_nesting {
            if stack.len() > max {
                warn!(index, depth = stack.len(), "back-reference nesting too deep");
                return Err(UnishoxError::NestingTooDeep(max));
            }
        }
        stack.push(index);
        let result = self.run(index, limit, stack);
        stack.pop();
        result
    }

    fn run(&self, index: usize, limit: usize, stack: &mut Vec<usize>) -> Result<Vec<u8>> {
        let mut reader = BitReader::open(self.source, index)?;
        let mut state = DecodeState::default();
        let mut out = Vec::new();
        while !reader.is_exhausted() {
            if limit > 0 && out.len() >= limit {
                break;
            }
            let start = reader.position();
            if let Step::End = self.step(&mut reader, &mut state, &mut out, stack)? {
                trace!(index, bit = start, "stream ended inside a symbol");
                reader.rewind(start);
                break;
            }
        }
        debug!(index, bytes = out.len(), "decoded buffer");
        Ok(out)
    }

    fn step(
        &self,
        reader: &mut BitReader<'_, S>,
        state: &mut DecodeState,
        out: &mut Vec<u8>,
        stack: &mut Vec<usize>,
    ) -> Result<Step> {
        let mut upper = state.all_upper;
        let mut v = next!(VERTICAL.resolve(reader));
        let mut h = state.set;
        if v == 0 {
            h = next!(read_set(reader));
            match h {
                CharSet::Set1 if state.set == CharSet::Set1 => {
                    if state.all_upper {
                        trace!("all-upper latch cleared");
                        state.all_upper = false;
                        return Ok(Step::Next);
                    }
                    v = next!(VERTICAL.resolve(reader));
                    if v == 0 {
                        h = next!(read_set(reader));
                        if h == CharSet::Set1 {
                            trace!("all-upper latch set");
                            state.all_upper = true;
                            return Ok(Step::Next);
                        }
                    }
                    upper = true;
                }
                CharSet::Set1 => {
                    state.set = CharSet::Set1;
                    return Ok(Step::Next);
                }
                CharSet::Set2 => {
                    if state.set == CharSet::Set1 {
                        state.set = CharSet::Set2;
                    }
                    return Ok(Step::Next);
                }
                _ => {}
            }
            if h != CharSet::Set1 {
                v = next!(VERTICAL.resolve(reader));
            }
        }

        if v == 0 && h == CharSet::Set1A {
            if upper {
                let value = next!(read_count(reader));
                out.push(value as u8);
            } else {
                next!(backref::expand(self, reader, out, stack)?);
            }
            return Ok(Step::Next);
        }

        if h == CharSet::Set1 && v == SET1_UNICODE {
            return self.unicode_run(reader, state, upper, out, stack);
        }

        if h == CharSet::Set1B {
            match v {
                set1b::CRLF => {
                    out.extend_from_slice(b"\r\n");
                    return Ok(Step::Next);
                }
                set1b::REPEAT_OR_LF => {
                    if upper {
                        let count = next!(read_count(reader)) as usize + 4;
                        let last = *out.last().ok_or(UnishoxError::EmptyRepeat)?;
                        out.resize(out.len() + count, last);
                    } else {
                        out.push(b'\n');
                    }
                    return Ok(Step::Next);
                }
                set1b::NOP => return Ok(Step::Next),
                _ => {}
            }
        }

        match charset::fold(charset::lookup(h, v), upper, state.set, v) {
            Some(c) => out.push(c),
            None => match self.config.unmapped_slots {
                UnmappedSlots::Skip => debug!(set = ?h, index = v, "skipping unmapped slot"),
                UnmappedSlots::Reject => {
                    return Err(UnishoxError::UnmappedSlot { set: h, index: v })
                }
            },
        }
        Ok(Step::Next)
    }

    /// Decode Unicode deltas until an end escape, or after one token unless
    /// the run was opened upper-shifted.
    fn unicode_run(
        &self,
        reader: &mut BitReader<'_, S>,
        state: &mut DecodeState,
        upper: bool,
        out: &mut Vec<u8>,
        stack: &mut Vec<usize>,
    ) -> Result<Step> {
        loop {
            match next!(read_delta(reader)) {
                UnicodeToken::Escape(escape::END_RUN) => break,
                UnicodeToken::Escape(escape::BACKREF) => {
                    next!(backref::expand(self, reader, out, stack)?);
                }
                UnicodeToken::Escape(escape::SPACE) => out.push(b' '),
                UnicodeToken::Escape(escape::COMMA) => out.push(b','),
                UnicodeToken::Escape(escape::FULL_STOP) => {
                    if state.prev_unicode > IDEOGRAPHIC_THRESHOLD {
                        write_utf8(out, IDEOGRAPHIC_FULL_STOP);
                    } else {
                        out.push(b'.');
                    }
                }
                UnicodeToken::Escape(escape::CR) => out.push(b'\r'),
                UnicodeToken::Escape(escape::LF) => out.push(b'\n'),
                UnicodeToken::Escape(_) => {}
                UnicodeToken::Delta(delta) => {
                    state.prev_unicode = state.prev_unicode.wrapping_add(delta);
                    write_utf8(out, state.prev_unicode);
                }
            }
            if !upper {
                break;
            }
        }
        Ok(Step::Next)
    }
}
