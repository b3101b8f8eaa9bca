//! From-scratch AES block cipher with CBC chaining.
//!
//! This crate mirrors FIPS-197 and NIST SP 800-38A and provides:
//! - GF(2^8) arithmetic and S-box tables derived from it at compile time.
//! - Key schedules for AES-128, AES-192 and AES-256.
//! - Single-block encryption and decryption.
//! - CBC mode, one-shot and streaming.
//!
//! Round keys are immutable once expanded and can be shared between threads.
//! S-box lookups are table based, so the block engine is not hardened against
//! cache-timing attacks. CBC provides no integrity protection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cbc;
mod cipher;
mod error;
mod gf;
mod key;
mod round;
mod sbox;

pub use crate::block::{block_from_slice, xor_in_place, Block, BLOCK_SIZE};
pub use crate::cbc::{cbc_decrypt, cbc_encrypt, CbcDecryptor, CbcEncryptor};
pub use crate::cipher::{
    decrypt_block, decrypt_block_in_place, encrypt_block, encrypt_block_in_place, expand_key,
    expand_key_bytes,
};
pub use crate::error::{Error, Result};
pub use crate::gf::{gf_inverse, gf_mul, xtime};
pub use crate::key::{AesKey, KeySize, RoundKeys, MAX_ROUNDS};
