//! AES substitution tables, derived at compile time from the field inverse.
//!
//! Lookups index memory with secret data, so they are not cache-timing
//! resistant.

use crate::gf::gf_inverse;

/// FIPS-197 affine transform applied after inversion.
const fn affine(b: u8) -> u8 {
    b ^ b.rotate_left(1) ^ b.rotate_left(2) ^ b.rotate_left(3) ^ b.rotate_left(4) ^ 0x63
}

const fn build_sbox() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = affine(gf_inverse(i as u8));
        i += 1;
    }
    table
}

const fn invert(forward: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[forward[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static SBOX: [u8; 256] = build_sbox();
static INV_SBOX: [u8; 256] = invert(&build_sbox());

/// Forward S-box lookup.
#[inline]
pub fn sbox(byte: u8) -> u8 {
    SBOX[byte as usize]
}

/// Inverse S-box lookup.
#[inline]
pub fn inv_sbox(byte: u8) -> u8 {
    INV_SBOX[byte as usize]
}
