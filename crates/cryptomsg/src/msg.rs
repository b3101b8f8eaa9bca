//! Message-level AES-CBC context.

use core::fmt;

use aes_core::{
    expand_key, AesKey, Block, CbcDecryptor, CbcEncryptor, KeySize, Result, RoundKeys, BLOCK_SIZE,
};
use log::debug;
use zeroize::Zeroize;

use crate::config::{Config, DEFAULT_KEY};
use crate::normalize::{normalize_iv, normalize_key, pad_tail, padded_len, PAD_BYTE};

/// Encrypts and decrypts whole messages with a fixed key and IV.
///
/// The key schedule is derived once when the context is built. Every call
/// starts a fresh chain from the IV, so calls are independent of each other
/// and a context can be shared between threads.
#[derive(Clone)]
pub struct CryptoMsg {
    round_keys: RoundKeys,
    iv: Block,
}

impl CryptoMsg {
    /// Builds a context with the default [`Config`].
    ///
    /// When `iv` is `None` the IV is derived from the key bytes as given,
    /// before key normalization.
    pub fn new(key: &[u8], iv: Option<&[u8]>) -> Result<Self> {
        Self::with_config(key, iv, Config::default())
    }

    /// Builds a context with an explicit [`Config`].
    pub fn with_config(key: &[u8], iv: Option<&[u8]>, config: Config) -> Result<Self> {
        let aes_key = normalize_key(key, config.key_policy)?;
        let ctx = Self::from_parts(&aes_key, normalize_iv(iv.unwrap_or(key)));
        debug!(
            "cipher context ready: {} key ({:?} policy, {} IV)",
            aes_key.size(),
            config.key_policy,
            if iv.is_some() { "explicit" } else { "key-derived" }
        );
        Ok(ctx)
    }

    fn from_parts(key: &AesKey, iv: Block) -> Self {
        Self {
            round_keys: expand_key(key),
            iv,
        }
    }

    /// AES variant selected by the normalized key.
    pub fn key_size(&self) -> KeySize {
        self.round_keys.key_size()
    }

    /// Encrypts `msg`, space-padding it to whole blocks.
    ///
    /// The ciphertext is `ceil(len / 16) * 16` bytes, and one block for an
    /// empty message.
    pub fn encrypt_msg(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let mut encryptor = CbcEncryptor::new(&self.round_keys, &self.iv)?;
        let (body, tail) = msg.split_at(msg.len() - msg.len() % BLOCK_SIZE);

        let mut out = Vec::with_capacity(padded_len(msg.len()));
        encryptor.update_into(body, &mut out);
        if !tail.is_empty() || msg.is_empty() {
            let mut last = pad_tail(tail);
            encryptor.update_into(&last, &mut out);
            last.zeroize();
        }
        encryptor.finish()?;

        debug!("encrypted {} byte message into {} bytes", msg.len(), out.len());
        Ok(out)
    }

    /// Decrypts `ciphertext`, which must be a whole number of blocks.
    ///
    /// Padding is not removed: the result is as long as the input and ends
    /// with whatever pad spaces the sender added.
    pub fn decrypt_msg(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut decryptor = CbcDecryptor::new(&self.round_keys, &self.iv)?;
        let mut out = decryptor.update(ciphertext);
        if let Err(err) = decryptor.finish() {
            debug!("rejecting {} byte ciphertext: {err}", ciphertext.len());
            out.zeroize();
            return Err(err);
        }

        debug!("decrypted {} bytes", out.len());
        Ok(out)
    }
}

impl Default for CryptoMsg {
    /// A context keyed with [`DEFAULT_KEY`]. Not secure.
    fn default() -> Self {
        let mut key = [PAD_BYTE; 16];
        key[..DEFAULT_KEY.len()].copy_from_slice(DEFAULT_KEY);
        Self::from_parts(&AesKey::from(key), normalize_iv(DEFAULT_KEY))
    }
}

impl fmt::Debug for CryptoMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoMsg")
            .field("key_size", &self.key_size())
            .finish_non_exhaustive()
    }
}

impl Drop for CryptoMsg {
    fn drop(&mut self) {
        self.iv.zeroize();
    }
}
