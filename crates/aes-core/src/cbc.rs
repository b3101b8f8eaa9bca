//! Cipher Block Chaining over the block engine.
//!
//! [`CbcEncryptor`] and [`CbcDecryptor`] accept input in arbitrary chunks and
//! emit only whole blocks, carrying both the chaining block and any partial
//! trailing input between calls. [`cbc_encrypt`] and [`cbc_decrypt`] are the
//! one-shot forms.

use core::iter;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::{block_from_slice, xor_in_place, Block, BLOCK_SIZE};
use crate::cipher::{decrypt_block, encrypt_block};
use crate::error::{Error, Result};
use crate::key::RoundKeys;

/// Holds input that has not yet filled a block.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
struct BlockBuffer {
    pending: Block,
    len: usize,
}

impl BlockBuffer {
    /// Appends `input`, calling `emit` for every block it completes.
    fn feed(&mut self, mut input: &[u8], mut emit: impl FnMut(&Block)) {
        if self.len > 0 {
            let take = (BLOCK_SIZE - self.len).min(input.len());
            self.pending[self.len..self.len + take].copy_from_slice(&input[..take]);
            self.len += take;
            input = &input[take..];
            if self.len < BLOCK_SIZE {
                return;
            }
            emit(&self.pending);
            self.len = 0;
        }

        let mut chunks = input.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            emit(&block);
            block.zeroize();
        }
        let rest = chunks.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.len = rest.len();
    }

    fn check_empty(&self) -> Result<()> {
        match self.len {
            0 => Ok(()),
            n => Err(Error::IncompleteBlock(n)),
        }
    }
}

/// Streaming CBC encryption context.
pub struct CbcEncryptor<'k> {
    round_keys: &'k RoundKeys,
    chain: Block,
    buffer: BlockBuffer,
}

impl<'k> CbcEncryptor<'k> {
    /// Starts a chain from `iv`, which must be exactly 16 bytes.
    pub fn new(round_keys: &'k RoundKeys, iv: &[u8]) -> Result<Self> {
        Ok(Self {
            round_keys,
            chain: block_from_slice(iv)?,
            buffer: BlockBuffer::default(),
        })
    }

    /// Feeds plaintext and returns the ciphertext of every completed block.
    pub fn update(&mut self, input: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len() + BLOCK_SIZE);
        self.update_into(input, &mut out);
        out
    }

    /// Like [`update`](Self::update), appending to `out`.
    pub fn update_into(&mut self, input: &[u8], out: &mut Vec<u8>) {
        let round_keys = self.round_keys;
        let chain = &mut self.chain;
        self.buffer.feed(input, |block| {
            let mut state = *block;
            xor_in_place(&mut state, chain);
            *chain = encrypt_block(&state, round_keys);
            out.extend_from_slice(chain);
        });
    }

    /// Bytes held back waiting for a full block.
    pub fn buffered(&self) -> usize {
        self.buffer.len
    }

    /// Ends the stream, failing if a partial block is still buffered.
    pub fn finish(self) -> Result<()> {
        self.buffer.check_empty()
    }
}

impl Drop for CbcEncryptor<'_> {
    fn drop(&mut self) {
        self.chain.zeroize();
    }
}

/// Streaming CBC decryption context.
pub struct CbcDecryptor<'k> {
    round_keys: &'k RoundKeys,
    chain: Block,
    buffer: BlockBuffer,
}

impl<'k> CbcDecryptor<'k> {
    /// Starts a chain from `iv`, which must be exactly 16 bytes.
    pub fn new(round_keys: &'k RoundKeys, iv: &[u8]) -> Result<Self> {
        Ok(Self {
            round_keys,
            chain: block_from_slice(iv)?,
            buffer: BlockBuffer::default(),
        })
    }

    /// Feeds ciphertext and returns the plaintext of every completed block.
    pub fn update(&mut self, input: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len() + BLOCK_SIZE);
        self.update_into(input, &mut out);
        out
    }

    /// Like [`update`](Self::update), appending to `out`.
    pub fn update_into(&mut self, input: &[u8], out: &mut Vec<u8>) {
        let round_keys = self.round_keys;
        let chain = &mut self.chain;
        self.buffer.feed(input, |block| {
            let mut plain = decrypt_block(block, round_keys);
            xor_in_place(&mut plain, chain);
            // Chain on the ciphertext that came in, not on the plaintext.
            *chain = *block;
            out.extend_from_slice(&plain);
            plain.zeroize();
        });
    }

    /// Bytes held back waiting for a full block.
    pub fn buffered(&self) -> usize {
        self.buffer.len
    }

    /// Ends the stream, failing if a partial block is still buffered.
    pub fn finish(self) -> Result<()> {
        self.buffer.check_empty()
    }
}

impl Drop for CbcDecryptor<'_> {
    fn drop(&mut self) {
        self.chain.zeroize();
    }
}

fn check_aligned(data: &[u8]) -> Result<()> {
    match data.len() % BLOCK_SIZE {
        0 => Ok(()),
        rest => Err(Error::IncompleteBlock(rest)),
    }
}

/// Encrypts block-aligned `data` in one call.
pub fn cbc_encrypt(data: &[u8], iv: &[u8], round_keys: &RoundKeys) -> Result<Vec<u8>> {
    let mut encryptor = CbcEncryptor::new(round_keys, iv)?;
    check_aligned(data)?;
    let out = encryptor.update(data);
    encryptor.finish()?;
    Ok(out)
}

/// Decrypts block-aligned `data` in one call.
///
/// Each plaintext block depends only on its own ciphertext block and the one
/// before it, so the blocks are independent of each other here.
pub fn cbc_decrypt(data: &[u8], iv: &[u8], round_keys: &RoundKeys) -> Result<Vec<u8>> {
    let iv = block_from_slice(iv)?;
    check_aligned(data)?;

    let previous = iter::once(&iv[..]).chain(data.chunks_exact(BLOCK_SIZE));
    let mut out = Vec::with_capacity(data.len());
    for (current, previous) in data.chunks_exact(BLOCK_SIZE).zip(previous) {
        let mut plain = decrypt_block(&block_from_slice(current)?, round_keys);
        xor_in_place(&mut plain, &block_from_slice(previous)?);
        out.extend_from_slice(&plain);
    }
    Ok(out)
}
