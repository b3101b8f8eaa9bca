//! Error type shared by the key schedule, block engine and CBC layer.

use thiserror::Error;

/// Failures reported by the AES core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The key is not 16, 24 or 32 bytes long.
    #[error("invalid AES key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),
    /// A block or IV is not exactly 16 bytes long.
    #[error("invalid block size: {0} bytes (expected 16)")]
    InvalidBlockSize(usize),
    /// Input ended with bytes that never filled a whole block.
    #[error("incomplete block: {0} trailing bytes do not fill a 16-byte block")]
    IncompleteBlock(usize),
}

/// Result alias for AES core operations.
pub type Result<T> = core::result::Result<T, Error>;
