//! Deterministic pseudo-random numbers.
//!
//! A multiplicative linear congruential generator (multiplier 16807,
//! modulus 2^32). Floats are built by placing the top 23 state bits in
//! the mantissa of a float in [1, 2) and subtracting 1, so a given seed
//! and call sequence yields bit-identical output on every platform.

use rand::{RngCore, SeedableRng};
use tracer_core::DEFAULT_SEED;
use tracer_math::Vec3;

const MULTIPLIER: u32 = 16807;

/// Exponent bits of 1.0f32.
const ONE_BITS: u32 = 0x3f80_0000;

/// Seeded generator carried explicitly through every call that draws.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Create a generator. Zero is a fixed point of the recurrence and is
    /// replaced by [`DEFAULT_SEED`].
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Self { state }
    }

    /// Current state, usable as a seed to resume the sequence.
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER);
        self.state
    }

    /// Next float in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        f32::from_bits((self.step() >> 9) | ONE_BITS) - 1.0
    }

    /// Uniform point inside the unit sphere, by rejection from the [-1, 1] cube.
    pub fn in_unit_sphere(&mut self) -> Vec3 {
        let mut p = Vec3::ONE;
        while p.length_squared() > 1.0 {
            p = Vec3::new(
                2.0 * self.next_f32() - 1.0,
                2.0 * self.next_f32() - 1.0,
                2.0 * self.next_f32() - 1.0,
            );
        }
        p
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.step());
        let lo = u64::from(self.step());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
