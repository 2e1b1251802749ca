use thiserror::Error;

use crate::charset::CharSet;

#[derive(Error, Debug)]
pub enum UnishoxError {
    /// The requested buffer index is not present in the source.
    #[error("buffer {0} does not exist")]
    UnknownBuffer(usize),

    /// A back-reference context points outside the buffer table.
    #[error("context {ctx} from buffer {buffer} does not name a buffer")]
    ContextOutOfRange { buffer: usize, ctx: usize },

    /// A cross-buffer back-reference re-entered a buffer that is still being decoded.
    #[error("cyclic back-reference into buffer {0}")]
    CyclicReference(usize),

    /// Cross-buffer back-references nested deeper than the configured limit.
    #[error("back-references nested deeper than {0} buffers")]
    NestingTooDeep(usize),

    /// A back-reference names bytes that have not been produced.
    #[error("back-reference of {len} bytes at distance {dist} exceeds {written} decoded bytes")]
    InvalidBackref { dist: usize, len: usize, written: usize },

    /// A run-length repeat appeared before any byte was decoded.
    #[error("repeat code with no preceding byte")]
    EmptyRepeat,

    /// An unpopulated character slot was decoded while gaps are rejected.
    #[error("unmapped slot {index} in character set {set:?}")]
    UnmappedSlot { set: CharSet, index: u8 },

    /// A payload does not fit behind a one-byte length prefix.
    #[error("payload of {0} bytes exceeds 255")]
    PayloadTooLong(usize),

    /// Decoded bytes were requested as a string but are not valid UTF-8.
    #[error("decoded bytes are not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A configuration value failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// A configuration file is not valid JSON for [`crate::Config`].
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A buffer table file could not be encoded or decoded.
    #[error("buffer table encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UnishoxError>;
