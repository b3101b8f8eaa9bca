//! Fixed-width key/IV derivation and space padding of messages.

use aes_core::{AesKey, Block, Result, BLOCK_SIZE};

use crate::config::KeyPolicy;

/// Byte used for every kind of padding.
pub const PAD_BYTE: u8 = b' ';

/// Length of `len` bytes after padding to whole blocks (at least one block).
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE).max(1) * BLOCK_SIZE
}

/// Right-pads `msg` with spaces to a multiple of 16 bytes.
///
/// An empty message becomes one block of spaces; a non-empty aligned message
/// is returned unchanged.
pub fn pad_to_block(msg: &[u8]) -> Vec<u8> {
    let mut padded = Vec::with_capacity(padded_len(msg.len()));
    padded.extend_from_slice(msg);
    padded.resize(padded_len(msg.len()), PAD_BYTE);
    padded
}

/// Strips trailing pad bytes. Never applied by decryption itself, since a
/// message may legitimately end in spaces.
pub fn trim_padding(msg: &[u8]) -> &[u8] {
    let end = msg
        .iter()
        .rposition(|&b| b != PAD_BYTE)
        .map_or(0, |i| i + 1);
    &msg[..end]
}

/// Space-pads or truncates `iv` to exactly one block.
pub fn normalize_iv(iv: &[u8]) -> Block {
    let mut block = [PAD_BYTE; BLOCK_SIZE];
    let n = iv.len().min(BLOCK_SIZE);
    block[..n].copy_from_slice(&iv[..n]);
    block
}

/// Turns `key` into an AES key according to `policy`.
pub fn normalize_key(key: &[u8], policy: KeyPolicy) -> Result<AesKey> {
    let target = match policy {
        KeyPolicy::SpacePad => {
            if key.len() <= 16 {
                16
            } else {
                32
            }
        }
        KeyPolicy::NearestSize => match key.len() {
            0..=16 => 16,
            17..=24 => 24,
            _ => 32,
        },
        KeyPolicy::Strict => return AesKey::try_from(key),
    };

    let mut buf = [PAD_BYTE; 32];
    let n = key.len().min(target);
    buf[..n].copy_from_slice(&key[..n]);
    let normalized = AesKey::try_from(&buf[..target]);
    buf.fill(0);
    normalized
}

/// Space-pads a partial trailing chunk (shorter than a block) into a block.
pub(crate) fn pad_tail(tail: &[u8]) -> Block {
    debug_assert!(tail.len() < BLOCK_SIZE);
    let mut block = [PAD_BYTE; BLOCK_SIZE];
    block[..tail.len()].copy_from_slice(tail);
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_core::{Error, KeySize};

    #[test]
    fn pads_to_next_block() {
        assert_eq!(pad_to_block(b"YOUR MESSAGE"), b"YOUR MESSAGE    ");
        assert_eq!(pad_to_block(&[1u8; 17]).len(), 32);
        assert_eq!(&pad_to_block(&[1u8; 17])[17..], &[b' '; 15]);
    }

    #[test]
    fn aligned_message_is_unchanged() {
        let msg = [7u8; 48];
        assert_eq!(pad_to_block(&msg), msg);
    }

    #[test]
    fn empty_message_pads_to_one_block() {
        assert_eq!(pad_to_block(b""), [b' '; 16]);
        assert_eq!(padded_len(0), 16);
        assert_eq!(padded_len(16), 16);
        assert_eq!(padded_len(33), 48);
    }

    #[test]
    fn trims_only_trailing_spaces() {
        assert_eq!(trim_padding(b" a b   "), b" a b");
        assert_eq!(trim_padding(b"    "), b"");
        assert_eq!(trim_padding(b"plain"), b"plain");
    }

    #[test]
    fn iv_is_padded_or_truncated() {
        assert_eq!(&normalize_iv(b"YOUR IV"), b"YOUR IV         ");
        assert_eq!(&normalize_iv(b"0123456789abcdefXYZ"), b"0123456789abcdef");
        assert_eq!(normalize_iv(b""), [b' '; 16]);
    }

    #[test]
    fn space_pad_policy_yields_16_or_32_bytes() {
        let cases: [(usize, KeySize); 7] = [
            (0, KeySize::Aes128),
            (8, KeySize::Aes128),
            (16, KeySize::Aes128),
            (17, KeySize::Aes256),
            (24, KeySize::Aes256),
            (32, KeySize::Aes256),
            (40, KeySize::Aes256),
        ];
        for (len, size) in cases {
            let key = normalize_key(&vec![b'k'; len], KeyPolicy::SpacePad).unwrap();
            assert_eq!(key.size(), size, "key of {len} bytes");
        }

        let key = normalize_key(b"YOUR KEY", KeyPolicy::SpacePad).unwrap();
        assert_eq!(key.as_bytes(), b"YOUR KEY        ");
        let long: Vec<u8> = (0u8..40).collect();
        let key = normalize_key(&long, KeyPolicy::SpacePad).unwrap();
        assert_eq!(key.as_bytes(), &long[..32]);
    }

    #[test]
    fn nearest_size_policy_reaches_aes192() {
        let key = normalize_key(&[b'k'; 20], KeyPolicy::NearestSize).unwrap();
        assert_eq!(key.size(), KeySize::Aes192);
        assert_eq!(&key.as_bytes()[20..], b"    ");
        let key = normalize_key(&[b'k'; 25], KeyPolicy::NearestSize).unwrap();
        assert_eq!(key.size(), KeySize::Aes256);
        let key = normalize_key(b"", KeyPolicy::NearestSize).unwrap();
        assert_eq!(key.as_bytes(), &[b' '; 16]);
    }

    #[test]
    fn strict_policy_rejects_odd_lengths() {
        assert_eq!(
            normalize_key(&[0u8; 20], KeyPolicy::Strict).unwrap_err(),
            Error::InvalidKeyLength(20)
        );
        let key = normalize_key(&[0u8; 24], KeyPolicy::Strict).unwrap();
        assert_eq!(key.size(), KeySize::Aes192);
    }

    #[test]
    fn tail_is_space_padded() {
        assert_eq!(&pad_tail(b"abc"), b"abc             ");
        assert_eq!(pad_tail(b""), [b' '; 16]);
    }
}
