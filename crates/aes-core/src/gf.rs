//! Arithmetic in GF(2^8) modulo the AES polynomial x^8 + x^4 + x^3 + x + 1.
//!
//! Everything here is `const fn` so the S-box tables can be derived at compile
//! time. The arithmetic masks instead of branching on operand values.

/// Low byte of the reduction polynomial (the x^8 term is implicit).
const REDUCTION: u8 = 0x1b;

/// Multiplies `a` by `x` (the element `{02}`).
#[inline]
pub const fn xtime(a: u8) -> u8 {
    let mask = (a >> 7).wrapping_neg();
    (a << 1) ^ (mask & REDUCTION)
}

/// Multiplies two field elements.
#[inline]
pub const fn gf_mul(a: u8, b: u8) -> u8 {
    let mut a = a;
    let mut b = b;
    let mut product = 0u8;
    let mut i = 0;
    while i < 8 {
        product ^= a & (b & 1).wrapping_neg();
        a = xtime(a);
        b >>= 1;
        i += 1;
    }
    product
}

/// Returns the multiplicative inverse of `a`, with `0` mapping to `0`.
///
/// Computed as `a^254`; the exponent is public so the square-and-multiply
/// ladder never branches on `a`.
pub const fn gf_inverse(a: u8) -> u8 {
    let mut result = 1u8;
    let mut base = a;
    let mut exp = 254u8;
    while exp != 0 {
        if exp & 1 == 1 {
            result = gf_mul(result, base);
        }
        base = gf_mul(base, base);
        exp >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_matches_fips197_examples() {
        assert_eq!(gf_mul(0x57, 0x83), 0xc1);
        assert_eq!(gf_mul(0x57, 0x13), 0xfe);
        assert_eq!(xtime(0x57), 0xae);
        assert_eq!(xtime(0xae), 0x47);
    }

    #[test]
    fn multiplication_is_commutative_with_identity() {
        for a in 0..=255u8 {
            assert_eq!(gf_mul(a, 1), a);
            assert_eq!(gf_mul(a, 0), 0);
            assert_eq!(gf_mul(a, 2), xtime(a));
            assert_eq!(gf_mul(a, 0x35), gf_mul(0x35, a));
        }
    }

    #[test]
    fn inverse_of_every_nonzero_element() {
        assert_eq!(gf_inverse(0), 0);
        assert_eq!(gf_inverse(1), 1);
        assert_eq!(gf_inverse(0x53), 0xca);
        for a in 1..=255u8 {
            assert_eq!(gf_mul(a, gf_inverse(a)), 1, "inverse of {a:#04x}");
        }
    }
}
