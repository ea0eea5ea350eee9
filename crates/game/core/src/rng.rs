//! Deterministic random streams for level generation.
//!
//! Macro layout (which slot becomes which room, with which textures and builder)
//! must be reproducible from the level seed, so every draw the planner makes comes
//! from a caller-supplied [`RngStream`]. The stream is consumed strictly in
//! registration order; any extra or missing draw desynchronizes the layout.
//!
//! # Determinism
//!
//! [`PcgStream`] is deterministic: given the same seed it produces the same sequence
//! on every platform. Any `rand::RngCore` is also an [`RngStream`], which is how the
//! pure-random sampling mode plugs in the thread RNG.

use rand::{RngCore, SeedableRng};

use crate::floor::FloorId;

/// A stream of random numbers consumed by the sampler and the room planner.
pub trait RngStream {
    /// Next raw 32-bit value.
    fn next_value(&mut self) -> u32;

    /// Uniform value in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_value() % bound
    }

    /// Uniform value in `[min, max]` inclusive. Returns `min` when `min >= max`.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        // The span of `[0, u32::MAX]` does not fit in u32.
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_value()) % span) as u32
    }
}

impl<R: RngCore + ?Sized> RngStream for R {
    #[inline]
    fn next_value(&mut self) -> u32 {
        self.next_u32()
    }
}

/// PCG random number generator (Permuted Congruential Generator), as a stream.
///
/// PCG-XSH-RR: 64-bit LCG state, 32-bit output permuted by an xorshift and a
/// state-dependent rotation.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcgStream {
    state: u64,
}

impl PcgStream {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a stream from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        let mut stream = Self { state: 0 };
        stream.step();
        stream.state = stream.state.wrapping_add(seed);
        stream.step();
        stream
    }

    /// Creates the stream for one generated level.
    ///
    /// Mixes the run seed, the floor and the level number so every level of a run
    /// gets an independent but reproducible stream.
    pub fn for_level(game_seed: u64, floor: FloorId, level_index: u32) -> Self {
        let floor_tag = floor.index().map_or(0, |index| index as u32 + 1);
        Self::new(level_seed(game_seed, floor_tag, level_index))
    }

    /// Advance the LCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output function.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngCore for PcgStream {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for PcgStream {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }
}

/// Compute a deterministic level seed from run components.
///
/// Uses SplitMix64/FxHash style multipliers and a final avalanche step.
pub fn level_seed(game_seed: u64, floor_tag: u32, level_index: u32) -> u64 {
    let mut hash = game_seed;

    hash ^= (floor_tag as u64).wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (level_index as u64).wrapping_mul(0x517cc1b727220a95);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
