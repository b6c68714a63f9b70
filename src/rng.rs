//! Uniform random draws for the effect.
//!
//! Wraps a seeded `fastrand::Rng` so the animation core can be replayed
//! deterministically in tests while the browser build seeds from entropy.

pub struct FxRng(fastrand::Rng);

impl FxRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    /// Seed from browser entropy (`rng` feature) or the performance clock.
    pub fn from_entropy() -> Self {
        Self::with_seed(entropy_seed())
    }

    /// Uniform in `[lo, hi)`. A collapsed or inverted range yields its midpoint,
    /// which keeps spawn positions sane on very small viewports.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return (lo + hi) / 2.0;
        }
        lo + self.0.f64() * (hi - lo)
    }

    /// Uniform integer in `[lo, hi)`.
    pub fn int(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        self.0.usize(lo..hi)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.0.usize(..items.len())]
    }
}

#[cfg(feature = "rng")]
fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            log::warn!("getrandom failed ({err}), seeding from clock");
            clock_seed()
        }
    }
}

#[cfg(not(feature = "rng"))]
fn entropy_seed() -> u64 {
    clock_seed()
}

fn clock_seed() -> u64 {
    let now = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    // performance.now() has sub-ms precision; mix the raw bits so nearby loads differ.
    now.to_bits()
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}
