//! AES key schedule and block encryption/decryption for all three key sizes.

use zeroize::Zeroize;

use crate::block::{block_from_slice, Block};
use crate::error::Result;
use crate::key::{AesKey, RoundKeys, MAX_ROUNDS};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::sbox::sbox;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a key into `Nr + 1` round keys (11, 13 or 15).
pub fn expand_key(key: &AesKey) -> RoundKeys {
    let size = key.size();
    let nk = size.words();
    let total = 4 * (size.rounds() + 1);

    let mut w = [0u32; 4 * (MAX_ROUNDS + 1)];
    for (word, chunk) in w.iter_mut().zip(key.as_bytes().chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in nk..total {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = w[i - nk] ^ temp;
    }

    let mut schedule = RoundKeys::empty(size);
    for (round_key, words) in schedule.keys.iter_mut().zip(w[..total].chunks_exact(4)) {
        for (dst, word) in round_key.chunks_exact_mut(4).zip(words) {
            dst.copy_from_slice(&word.to_be_bytes());
        }
    }
    w.zeroize();

    schedule
}

/// Validates raw key bytes and expands them.
pub fn expand_key_bytes(key: &[u8]) -> Result<RoundKeys> {
    let key = AesKey::try_from(key)?;
    Ok(expand_key(&key))
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(0));

    for round in 1..rounds {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, round_keys.get(round));
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, round_keys.get(rounds));

    state
}

/// Decrypts a single 16-byte block with pre-expanded round keys.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(rounds));
    for round in (1..rounds).rev() {
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        add_round_key(&mut state, round_keys.get(round));
        inv_mix_columns(&mut state);
    }
    inv_shift_rows(&mut state);
    inv_sub_bytes(&mut state);
    add_round_key(&mut state, round_keys.get(0));

    state
}

/// Encrypts `buf` in place; it must be exactly one block long.
pub fn encrypt_block_in_place(buf: &mut [u8], round_keys: &RoundKeys) -> Result<()> {
    let block = block_from_slice(buf)?;
    buf.copy_from_slice(&encrypt_block(&block, round_keys));
    Ok(())
}

/// Decrypts `buf` in place; it must be exactly one block long.
pub fn decrypt_block_in_place(buf: &mut [u8], round_keys: &RoundKeys) -> Result<()> {
    let block = block_from_slice(buf)?;
    buf.copy_from_slice(&decrypt_block(&block, round_keys));
    Ok(())
}
