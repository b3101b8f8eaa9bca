//! Encrypt and decrypt byte messages with AES in CBC mode.
//!
//! Keys and IVs of any length are normalized to the widths AES needs, and
//! messages are right-padded with spaces to whole blocks. Decryption keeps
//! the padding; use [`trim_padding`] when the message is known not to end in
//! spaces.
//!
//! ```
//! use cryptomsg::{trim_padding, CryptoMsg};
//!
//! let ctx = CryptoMsg::new(b"YOUR KEY", Some(b"YOUR IV")).unwrap();
//! let ciphertext = ctx.encrypt_msg(b"YOUR MESSAGE").unwrap();
//! assert_eq!(ciphertext.len(), 16);
//! let plaintext = ctx.decrypt_msg(&ciphertext).unwrap();
//! assert_eq!(trim_padding(&plaintext), b"YOUR MESSAGE");
//! ```
//!
//! CBC gives confidentiality only; a modified ciphertext decrypts to garbage
//! rather than failing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod msg;
mod normalize;

pub use aes_core::{Error, KeySize, Result};

pub use crate::config::{Config, KeyPolicy, DEFAULT_KEY};
pub use crate::msg::CryptoMsg;
pub use crate::normalize::{
    normalize_iv, normalize_key, pad_to_block, padded_len, trim_padding, PAD_BYTE,
};
