//! Deterministic CPython-compatible hashing.
//!
//! Member hashes and value-cache keys both go through these helpers so that
//! hashes are stable for the whole process and across runs. The algorithms
//! match CPython running with `PYTHONHASHSEED=0`:
//!
//! - text and bytes use SipHash-1-3 with a zeroed key
//! - integers reduce modulo the Mersenne prime `2^61 - 1`
//! - integral floats hash exactly like the equal integer
//! - tuples mix element hashes with the xxHash-derived lane mixing
//!
//! `-1` is never returned; CPython reserves it as an error sentinel and maps it
//! to `-2`.

use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};

/// Mersenne prime `2^61 - 1` used for numeric hashing.
const MODULUS: i64 = (1 << 61) - 1;

/// Hash of `float('inf')`.
const INF_HASH: i64 = 314_159;

/// Hashes a string the way CPython hashes `str` under seed 0.
///
/// Exact parity holds for ASCII text, which covers member names in practice.
#[must_use]
pub fn hash_str(value: &str) -> i64 {
    hash_bytes(value.as_bytes())
}

/// Hashes raw bytes the way CPython hashes `bytes` under seed 0.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> i64 {
    if bytes.is_empty() {
        return 0;
    }
    let raw = i64::from_ne_bytes(siphash13_seed0(bytes).to_ne_bytes());
    remap_sentinel(raw)
}

/// Hashes a machine integer.
#[must_use]
pub fn hash_int(value: i64) -> i64 {
    if value == 0 {
        return 0;
    }
    // `i64::MIN` has no positive counterpart, so reduce the magnitude as u64.
    let magnitude = value.unsigned_abs() % MODULUS as u64;
    #[expect(clippy::cast_possible_wrap, reason = "magnitude is below 2^61")]
    let reduced = magnitude as i64;
    remap_sentinel(if value < 0 { -reduced } else { reduced })
}

/// Hashes an arbitrary-precision integer.
///
/// Values that fit in `i64` take the machine-integer path so that an `Int`
/// and a `BigInt` holding the same number hash identically.
#[must_use]
pub fn hash_bigint(value: &BigInt) -> i64 {
    if let Some(small) = value.to_i64() {
        return hash_int(small);
    }
    let modulus = BigInt::from(MODULUS);
    let magnitude = (value.magnitude() % modulus.magnitude())
        .to_i64()
        .unwrap_or_default();
    let signed = if value.sign() == Sign::Minus { -magnitude } else { magnitude };
    remap_sentinel(signed)
}

/// Hashes a float, agreeing with [`hash_int`] for integral values.
#[must_use]
pub fn hash_float(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    if value.is_infinite() {
        return if value > 0.0 { INF_HASH } else { -INF_HASH };
    }
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        #[expect(clippy::cast_possible_truncation, reason = "integral and range checked")]
        let integral = value as i64;
        return hash_int(integral);
    }

    let (mut mantissa, mut exponent) = frexp(value);
    let sign = if mantissa < 0.0 {
        mantissa = -mantissa;
        -1
    } else {
        1
    };

    // Consume the mantissa 28 bits at a time, rotating within 61 bits.
    let modulus = MODULUS as u64;
    let mut acc: u64 = 0;
    while mantissa > 0.0 {
        acc = ((acc << 28) & modulus) | (acc >> 33);
        mantissa *= 268_435_456.0;
        exponent -= 28;
        #[expect(clippy::cast_possible_truncation, reason = "mantissa chunk is below 2^28")]
        let chunk = mantissa as u64;
        mantissa -= chunk as f64;
        acc += chunk;
        if acc >= modulus {
            acc -= modulus;
        }
    }

    let shift = exponent.rem_euclid(61).unsigned_abs();
    acc = ((acc << shift) & modulus) | (acc >> (61 - shift));

    #[expect(clippy::cast_possible_wrap, reason = "acc is reduced below 2^61")]
    let signed = sign * acc as i64;
    remap_sentinel(signed)
}

/// Mixes already-computed element hashes the way CPython hashes a tuple.
#[must_use]
pub fn hash_tuple(lanes: impl ExactSizeIterator<Item = i64>) -> i64 {
    const PRIME_1: u64 = 11_400_714_785_074_694_791;
    const PRIME_2: u64 = 14_029_467_366_897_019_727;
    const PRIME_5: u64 = 2_870_177_450_012_600_261;

    let len = lanes.len() as u64;
    let mut acc = PRIME_5;
    for lane in lanes {
        let lane = u64::from_ne_bytes(lane.to_ne_bytes());
        acc = acc.wrapping_add(lane.wrapping_mul(PRIME_2));
        acc = acc.rotate_left(31);
        acc = acc.wrapping_mul(PRIME_1);
    }
    acc = acc.wrapping_add(len ^ (PRIME_5 ^ 3_527_539));

    if acc == u64::MAX {
        return 1_546_275_796;
    }
    i64::from_ne_bytes(acc.to_ne_bytes())
}

fn remap_sentinel(hash: i64) -> i64 {
    if hash == -1 { -2 } else { hash }
}

/// Splits `value` into `(frac, exp)` with `value == frac * 2^exp` and `0.5 <= |frac| < 1`.
fn frexp(value: f64) -> (f64, i32) {
    if value.is_zero() || !value.is_finite() {
        return (value, 0);
    }
    let bits = value.to_bits();
    #[expect(clippy::cast_possible_truncation, reason = "exponent field is 11 bits")]
    let biased = ((bits >> 52) & 0x7ff) as i32;
    if biased == 0 {
        // Subnormal: scale into the normal range first.
        let (frac, exp) = frexp(value * 18_446_744_073_709_551_616.0);
        return (frac, exp - 64);
    }
    let frac = f64::from_bits((bits & 0x800F_FFFF_FFFF_FFFF) | 0x3FE0_0000_0000_0000);
    (frac, biased - 1022)
}

/// SipHash-1-3 with both key halves zero.
fn siphash13_seed0(bytes: &[u8]) -> u64 {
    let mut state = [
        0x736f_6d65_7073_6575_u64,
        0x646f_7261_6e64_6f6d,
        0x6c79_6765_6e65_7261,
        0x7465_6462_7974_6573,
    ];

    let mut blocks = bytes.chunks_exact(8);
    for block in &mut blocks {
        let mut word = [0_u8; 8];
        word.copy_from_slice(block);
        let message = u64::from_le_bytes(word);
        state[3] ^= message;
        sip_round(&mut state);
        state[0] ^= message;
    }

    let mut tail = (bytes.len() as u64) << 56;
    for (offset, byte) in blocks.remainder().iter().enumerate() {
        tail |= u64::from(*byte) << (offset * 8);
    }
    state[3] ^= tail;
    sip_round(&mut state);
    state[0] ^= tail;

    state[2] ^= 0xff;
    for _ in 0..3 {
        sip_round(&mut state);
    }
    state[0] ^ state[1] ^ state[2] ^ state[3]
}

fn sip_round(v: &mut [u64; 4]) {
    v[0] = v[0].wrapping_add(v[1]);
    v[1] = v[1].rotate_left(13) ^ v[0];
    v[0] = v[0].rotate_left(32);
    v[2] = v[2].wrapping_add(v[3]);
    v[3] = v[3].rotate_left(16) ^ v[2];
    v[0] = v[0].wrapping_add(v[3]);
    v[3] = v[3].rotate_left(21) ^ v[0];
    v[2] = v[2].wrapping_add(v[1]);
    v[1] = v[1].rotate_left(17) ^ v[2];
    v[2] = v[2].rotate_left(32);
}
