//! Random sources for the simulation
//!
//! Sessions own a seeded [`Pcg32`]. Every random decision in the step takes
//! the source as a parameter, so scripted runs can swap in [`ConstRng`] and get
//! the same routing and damage every time.

use rand::RngCore;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Session random source
pub type SimRng = Pcg32;

/// Seed a session source
pub fn seeded(seed: u64) -> SimRng {
    Pcg32::seed_from_u64(seed)
}

/// A source that yields the same word forever.
///
/// `ConstRng(0)` passes every `% n == 0` gate and every `< p` chance roll;
/// `ConstRng(u64::MAX)` fails every chance roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstRng(pub u64);

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let bytes = self.0.to_le_bytes();
        for (i, byte) in dst.iter_mut().enumerate() {
            *byte = bytes[i % bytes.len()];
        }
    }
}
