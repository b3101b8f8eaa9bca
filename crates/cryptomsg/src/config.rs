//! Context configuration.

/// The library's built-in key, used only by [`CryptoMsg::default`].
///
/// It is public knowledge, so anything encrypted with it is effectively
/// plaintext.
///
/// [`CryptoMsg::default`]: crate::CryptoMsg
pub const DEFAULT_KEY: &[u8] = b"aes_cbc_key";

/// How an arbitrary-length key is turned into an AES key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyPolicy {
    /// Pad with spaces to the next multiple of 16 bytes, then truncate to 32.
    ///
    /// Keys always come out as 16 or 32 bytes, so AES-192 is never selected.
    /// A key of exactly 16 bytes stays AES-128; 17 to 31 bytes pad to 32.
    #[default]
    SpacePad,
    /// Pad with spaces to the smallest of 16, 24 or 32 bytes that fits,
    /// truncating anything longer than 32.
    NearestSize,
    /// Use the key as given; it must already be 16, 24 or 32 bytes.
    Strict,
}

/// Options for building a [`CryptoMsg`](crate::CryptoMsg).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Key normalization rule.
    pub key_policy: KeyPolicy,
}

impl Config {
    /// Returns the config with `key_policy` replaced.
    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }
}
