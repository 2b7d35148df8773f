//! Deterministic random sources for field realisations.
//!
//! [`Xorshift64`] is a small seedable generator that implements
//! [`rand::RngCore`], so every `rand` / `rand_distr` distribution can draw
//! from it. [`RandomSource`] bundles one independent stream per draw site
//! (Fourier magnitudes, Fourier phases, Poisson counts, in-cell jitter) so
//! that each site is reproducible on its own and the whole state can be
//! serialised mid-run.

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed of 0 is replaced with
/// a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Fallback seed used when the caller provides 0.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RngCore for Xorshift64 {
    fn next_u32(&mut self) -> u32 {
        // High bits of xorshift output are the better-mixed ones.
        (Xorshift64::next_u64(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Xorshift64::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// The places in the pipeline that consume randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSite {
    /// Standard-normal magnitudes of the Hermitian draw.
    Magnitude,
    /// Uniform `[0, 2π)` phases of the Hermitian draw.
    Phase,
    /// Per-cell Poisson occupancy counts.
    Counts,
    /// Uniform in-cell tracer offsets.
    Jitter,
}

impl DrawSite {
    /// Every draw site, in stream-derivation order.
    pub const ALL: [DrawSite; 4] = [
        DrawSite::Magnitude,
        DrawSite::Phase,
        DrawSite::Counts,
        DrawSite::Jitter,
    ];

    fn tag(self) -> u64 {
        match self {
            DrawSite::Magnitude => 1,
            DrawSite::Phase => 2,
            DrawSite::Counts => 3,
            DrawSite::Jitter => 4,
        }
    }
}

/// One independent [`Xorshift64`] stream per [`DrawSite`].
///
/// Pass `&mut RandomSource` into every field-producing operation; the source
/// comes back advanced, so successive calls yield fresh realisations while a
/// clone taken beforehand replays them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSource {
    magnitude: Xorshift64,
    phase: Xorshift64,
    counts: Xorshift64,
    jitter: Xorshift64,
}

impl RandomSource {
    /// Derives all four site streams from a single master seed.
    pub fn new(seed: u64) -> Self {
        let derive = |site: DrawSite| Xorshift64::new(splitmix64(seed ^ site.tag().rotate_left(32)));
        Self {
            magnitude: derive(DrawSite::Magnitude),
            phase: derive(DrawSite::Phase),
            counts: derive(DrawSite::Counts),
            jitter: derive(DrawSite::Jitter),
        }
    }

    /// Seeds every site explicitly.
    pub fn from_site_seeds(magnitude: u64, phase: u64, counts: u64, jitter: u64) -> Self {
        Self {
            magnitude: Xorshift64::new(magnitude),
            phase: Xorshift64::new(phase),
            counts: Xorshift64::new(counts),
            jitter: Xorshift64::new(jitter),
        }
    }

    /// Mutable access to the stream feeding `site`.
    pub fn stream(&mut self, site: DrawSite) -> &mut Xorshift64 {
        match site {
            DrawSite::Magnitude => &mut self.magnitude,
            DrawSite::Phase => &mut self.phase,
            DrawSite::Counts => &mut self.counts,
            DrawSite::Jitter => &mut self.jitter,
        }
    }
}

/// SplitMix64 finaliser, used to decorrelate per-site seeds.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, every recipe replay using this seed is invalidated.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0, "seed=0 guard failed");
        }
    }

    #[test]
    fn two_instances_with_same_seed_produce_identical_sequences() {
        let mut rng_a = Xorshift64::new(42);
        let mut rng_b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(
                rng_a.next_u64(),
                rng_b.next_u64(),
                "sequences diverged at index {i}"
            );
        }
    }

    #[test]
    fn rng_core_next_u64_matches_inherent_sequence() {
        let mut inherent = Xorshift64::new(7);
        let mut via_trait = Xorshift64::new(7);
        for _ in 0..100 {
            assert_eq!(inherent.next_u64(), RngCore::next_u64(&mut via_trait));
        }
    }

    #[test]
    fn fill_bytes_is_deterministic() {
        let mut a = Xorshift64::new(99);
        let mut b = Xorshift64::new(99);
        let mut buf_a = [0u8; 37];
        let mut buf_b = [0u8; 37];
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);
        assert_eq!(buf_a, buf_b);
        assert!(buf_a.iter().any(|&x| x != 0));
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(
                rng.next_u64(),
                restored.next_u64(),
                "sequences diverged after deserialization at index {i}"
            );
        }
    }

    // -- RandomSource --

    #[test]
    fn site_streams_are_distinct() {
        let mut source = RandomSource::new(42);
        let firsts: Vec<u64> = DrawSite::ALL
            .iter()
            .map(|&site| source.stream(site).next_u64())
            .collect();
        for i in 0..firsts.len() {
            for j in (i + 1)..firsts.len() {
                assert_ne!(firsts[i], firsts[j], "sites {i} and {j} share a stream");
            }
        }
    }

    #[test]
    fn drawing_from_one_site_leaves_others_untouched() {
        let mut a = RandomSource::new(5);
        let mut b = RandomSource::new(5);
        for _ in 0..10 {
            a.stream(DrawSite::Magnitude).next_u64();
        }
        assert_eq!(
            a.stream(DrawSite::Phase).next_u64(),
            b.stream(DrawSite::Phase).next_u64()
        );
        assert_ne!(
            a.stream(DrawSite::Magnitude).next_u64(),
            b.stream(DrawSite::Magnitude).next_u64()
        );
    }

    #[test]
    fn from_site_seeds_uses_each_seed() {
        let mut source = RandomSource::from_site_seeds(1, 2, 3, 4);
        assert_eq!(
            source.stream(DrawSite::Counts).next_u64(),
            Xorshift64::new(3).next_u64()
        );
        assert_eq!(
            source.stream(DrawSite::Jitter).next_u64(),
            Xorshift64::new(4).next_u64()
        );
    }

    #[test]
    fn random_source_serialization_roundtrip() {
        let mut source = RandomSource::new(11);
        source.stream(DrawSite::Phase).next_u64();
        let json = serde_json::to_string(&source).unwrap();
        let restored: RandomSource = serde_json::from_str(&json).unwrap();
        assert_eq!(source, restored);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use rand::Rng;

        proptest! {
            #[test]
            fn gen_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v: f64 = rng.gen();
                    prop_assert!((0.0..1.0).contains(&v), "gen() = {v} for seed {seed}");
                }
            }

            #[test]
            fn gen_range_in_bounds_for_any_seed_and_range(
                seed: u64,
                min in -1e6_f64..1e6,
                max in -1e6_f64..1e6,
            ) {
                prop_assume!(min < max);
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.gen_range(min..max);
                    prop_assert!(v >= min && v < max, "gen_range({min}, {max}) = {v}");
                }
            }

            #[test]
            fn gen_f64_approximate_uniformity(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                let mut buckets = [0u32; 10];
                for _ in 0..10_000 {
                    let v: f64 = rng.gen();
                    let idx = (v * 10.0).min(9.0) as usize;
                    buckets[idx] += 1;
                }
                // Expected ~1000 per bucket; loose bound to avoid flakes.
                for (i, &count) in buckets.iter().enumerate() {
                    prop_assert!(count >= 500, "bucket {i} has only {count} values for seed {seed}");
                }
            }
        }
    }
}
