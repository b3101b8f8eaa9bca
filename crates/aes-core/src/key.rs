//! Key types for AES-128, AES-192 and AES-256.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::Block;
use crate::error::{Error, Result};

/// Largest round count (AES-256).
pub const MAX_ROUNDS: usize = 14;

/// The three AES key sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 128-bit key, 10 rounds.
    Aes128,
    /// 192-bit key, 12 rounds.
    Aes192,
    /// 256-bit key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Maps a key length in bytes to its key size.
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            other => Err(Error::InvalidKeyLength(other)),
        }
    }

    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Key length in 32-bit words (`Nk`).
    pub const fn words(self) -> usize {
        self.key_len() / 4
    }

    /// Number of rounds (`Nr`).
    pub const fn rounds(self) -> usize {
        self.words() + 6
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aes128 => "AES-128",
            Self::Aes192 => "AES-192",
            Self::Aes256 => "AES-256",
        };
        f.write_str(name)
    }
}

/// A validated AES key. The bytes are wiped when the key is dropped.
#[derive(Clone)]
pub struct AesKey {
    bytes: [u8; 32],
    size: KeySize,
}

impl AesKey {
    /// Key bytes, exactly `size().key_len()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.size.key_len()]
    }

    /// Which AES variant this key selects.
    pub fn size(&self) -> KeySize {
        self.size
    }

    fn from_valid(bytes: &[u8], size: KeySize) -> Self {
        let mut key = Self {
            bytes: [0u8; 32],
            size,
        };
        key.bytes[..bytes.len()].copy_from_slice(bytes);
        key
    }
}

impl TryFrom<&[u8]> for AesKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let size = KeySize::from_len(bytes.len())?;
        Ok(Self::from_valid(bytes, size))
    }
}

impl From<[u8; 16]> for AesKey {
    fn from(value: [u8; 16]) -> Self {
        Self::from_valid(&value, KeySize::Aes128)
    }
}

impl From<[u8; 24]> for AesKey {
    fn from(value: [u8; 24]) -> Self {
        Self::from_valid(&value, KeySize::Aes192)
    }
}

impl From<[u8; 32]> for AesKey {
    fn from(value: [u8; 32]) -> Self {
        Self::from_valid(&value, KeySize::Aes256)
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl Drop for AesKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl ZeroizeOnDrop for AesKey {}

/// Expanded round keys: `rounds() + 1` blocks, immutable once derived.
#[derive(Clone)]
pub struct RoundKeys {
    pub(crate) keys: [Block; MAX_ROUNDS + 1],
    pub(crate) size: KeySize,
}

impl RoundKeys {
    pub(crate) fn empty(size: KeySize) -> Self {
        Self {
            keys: [[0u8; 16]; MAX_ROUNDS + 1],
            size,
        }
    }

    /// Returns the round key at the requested index (`0..=rounds()`).
    ///
    /// # Panics
    ///
    /// Panics if `round > rounds()`. Use [`as_slice`](Self::as_slice) for
    /// checked access.
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.keys[..=self.size.rounds()][round]
    }

    /// Number of cipher rounds this schedule drives.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.size.rounds()
    }

    /// Key size the schedule was derived from.
    pub fn key_size(&self) -> KeySize {
        self.size
    }

    /// All round keys in order, initial key first.
    pub fn as_slice(&self) -> &[Block] {
        &self.keys[..=self.size.rounds()]
    }
}

impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundKeys")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl Drop for RoundKeys {
    fn drop(&mut self) {
        self.keys.zeroize();
    }
}

impl ZeroizeOnDrop for RoundKeys {}
