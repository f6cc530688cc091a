use rand::{RngCore, SeedableRng};

/// xorshift64* generator backing every random draw the solver makes (slot shuffle, corner
/// jitter, float seeds).
///
/// The solver only asks for `rand::RngCore`, so any generator can be injected; this one exists
/// so a `u64` seed reproduces a layout exactly across platforms and `rand` releases.
#[derive(Debug, Clone)]
pub struct LayoutRng {
    state: u64,
}

impl LayoutRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Non-reproducible generator for production use.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    #[cfg(test)]
    fn next_f64_unit(&mut self) -> f64 {
        let u = self.step() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }
}

impl RngCore for LayoutRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for LayoutRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
