//! Deterministic PRNG used to derive per-file IVs
//!
//! The game draws its IVs from a Park-Miller style generator whose state lives
//! in a `double`. Every draw truncates that double to a 32-bit integer with
//! `cvttsd2si`, runs a Schrage-factored `16807 * x mod (2^31 - 1)` step in
//! wrapping 32-bit arithmetic, and stores the result back as a double.
//!
//! All of this must be reproduced bit for bit: a single rounding difference
//! yields a wrong IV and the payload silently decrypts to noise.

/// Multiplier applied to a raw draw to produce the float output
pub const OUTPUT_SCALE: f64 = 4.656612875e-10;

/// Multiplier applied to each float draw when packing IV words
pub const IV_WORD_SCALE: f64 = -2.147483648e9;

/// Modulus of the generator (2^31 - 1)
const MODULUS: i32 = 0x7FFF_FFFF;

/// Multiplier of the generator
const MULTIPLIER: i32 = 16807;

/// Fixed-point reciprocal used by the compiled division-by-127773
const RECIPROCAL: i64 = -2_092_037_281;

/// Truncate a double to `i32` the way `cvttsd2si` does.
///
/// Rounds toward zero. NaN and values outside the `i32` range produce the
/// "integer indefinite" value `i32::MIN` rather than saturating.
#[inline]
pub fn truncate_i32(value: f64) -> i32 {
    if value > -2_147_483_649.0 && value < 2_147_483_648.0 {
        value as i32
    } else {
        i32::MIN
    }
}

/// Run the integer half of one draw on an already truncated seed.
///
/// The seed is widened through `u32 -> f64` and truncated again before use.
/// For the positive seeds the generator produces this is a no-op; negative
/// inputs collapse to `i32::MIN`.
pub fn step(seed: i32) -> i32 {
    let v2 = truncate_i32(f64::from(seed as u32));

    let high = (RECIPROCAL * i64::from(v2)) >> 32;
    let v3 = ((i64::from(v2 as u32) + high) as i32) >> 16;
    let carry = ((v3 as u32) >> 31) as i32;

    let mut v4 = MULTIPLIER
        .wrapping_mul(v2)
        .wrapping_sub(MODULUS.wrapping_mul(v3.wrapping_add(carry)));

    if v4 <= 0 {
        v4 = v4.wrapping_add(MODULUS);
    }
    v4
}

/// Convert a raw draw into the generator's float output
#[inline]
pub fn to_float(raw: i32) -> f64 {
    f64::from(raw) * OUTPUT_SCALE
}

/// Advance a generator state by one draw.
///
/// Returns the new state and the raw 32-bit draw.
pub fn advance(state: f64) -> (f64, u32) {
    let raw = step(truncate_i32(state));
    (f64::from(raw), raw as u32)
}

/// Generator state: a single double, mutated on every draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prng {
    state: f64,
}

impl Prng {
    /// Create a generator seeded with an integer value
    pub fn new(seed: u32) -> Self {
        Self {
            state: f64::from(seed),
        }
    }

    /// Current state register
    pub fn state(&self) -> f64 {
        self.state
    }

    /// Draw the next raw value
    pub fn next_raw(&mut self) -> u32 {
        let (state, raw) = advance(self.state);
        self.state = state;
        raw
    }

    /// Draw the next float value
    pub fn next_f64(&mut self) -> f64 {
        to_float(self.next_raw() as i32)
    }
}

/// Derive the 16-byte IV for a seed.
///
/// One warm-up draw is discarded, then four draws are scaled by
/// [`IV_WORD_SCALE`], truncated through `i64` to `u32` and packed
/// little-endian.
pub fn get16(seed: u32) -> [u8; 16] {
    let mut prng = Prng::new(seed);
    prng.next_f64();

    let mut iv = [0u8; 16];
    for chunk in iv.chunks_exact_mut(4) {
        let word = (prng.next_f64() * IV_WORD_SCALE) as i64 as u32;
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    iv
}
