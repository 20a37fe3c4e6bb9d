//! Request stream generation.
//!
//! Produces `u64` key streams following a named distribution, YCSB-style,
//! for driving the cache with realistic access patterns. Streams are seeded
//! and deterministic, which keeps experiments reproducible.
//!
//! | Name      | Behavior                                                   |
//! |-----------|------------------------------------------------------------|
//! | `uniform` | uniform over `[0, universe)`                               |
//! | `zipfian` | scrambled Zipfian: skewed ranks hashed to break locality   |
//! | `latest`  | Zipfian offset behind the most recent insertion            |

use std::str::FromStr;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Zipf};
use rustc_hash::FxHashMap;

use crate::error::ConfigError;

/// Named key distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyDistribution {
    /// Uniform random keys.
    Uniform,
    /// Scrambled Zipfian: Zipf-distributed rank hashed with FNV-1a so that
    /// popular keys are spread across the key space.
    Zipfian {
        /// Skew parameter; 0.99 is the YCSB default.
        exponent: f64,
    },
    /// Recently inserted keys are the most likely targets, with Zipfian
    /// falloff behind the insertion counter.
    Latest {
        /// Skew parameter; 0.99 is the YCSB default.
        exponent: f64,
    },
}

impl KeyDistribution {
    /// Default skew used when a distribution is selected by name.
    pub const DEFAULT_EXPONENT: f64 = 0.99;
}

impl FromStr for KeyDistribution {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "zipfian" => Ok(Self::Zipfian {
                exponent: Self::DEFAULT_EXPONENT,
            }),
            "latest" => Ok(Self::Latest {
                exponent: Self::DEFAULT_EXPONENT,
            }),
            other => Err(ConfigError::new(format!("unknown distribution: {other}"))),
        }
    }
}

/// Deterministic key stream over a bounded key universe.
#[derive(Debug, Clone)]
pub struct KeyStream {
    universe: u64,
    distribution: KeyDistribution,
    rng: SmallRng,
    insert_counter: u64,
    zipf: Option<Zipf<f64>>,
}

impl KeyStream {
    /// Creates a stream of keys in `[0, universe)` drawn from
    /// `distribution`, seeded for reproducibility.
    pub fn new(
        universe: u64,
        distribution: KeyDistribution,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let universe = universe.max(1);
        let zipf = match distribution {
            KeyDistribution::Zipfian { exponent } | KeyDistribution::Latest { exponent } => {
                let zipf = Zipf::new(universe as f64, exponent).map_err(|err| {
                    ConfigError::new(format!("invalid zipfian exponent {exponent}: {err}"))
                })?;
                Some(zipf)
            },
            KeyDistribution::Uniform => None,
        };
        Ok(Self {
            universe,
            distribution,
            rng: SmallRng::seed_from_u64(seed),
            insert_counter: 0,
            zipf,
        })
    }

    /// Size of the key universe.
    pub fn universe(&self) -> u64 {
        self.universe
    }

    /// Notifies the stream that a key was inserted; the `latest`
    /// distribution clusters around this counter.
    pub fn record_insert(&mut self) {
        self.insert_counter = self.insert_counter.wrapping_add(1);
    }

    /// Draws the next key.
    pub fn next_key(&mut self) -> u64 {
        match self.distribution {
            KeyDistribution::Uniform => self.rng.random::<u64>() % self.universe,

            KeyDistribution::Zipfian { .. } => {
                let rank = self.sample_rank();
                fnv_hash(rank) % self.universe
            },

            KeyDistribution::Latest { .. } => {
                let offset = self.sample_rank();
                self.insert_counter.wrapping_sub(offset) % self.universe
            },
        }
    }

    /// Draws a full sequence of `count` keys.
    pub fn generate(&mut self, count: usize) -> Vec<u64> {
        let sequence: Vec<u64> = (0..count).map(|_| self.next_key()).collect();
        debug!(
            "generated {} keys over universe {} ({:?})",
            count, self.universe, self.distribution
        );
        sequence
    }

    fn sample_rank(&mut self) -> u64 {
        let zipf = self.zipf.as_ref().expect("zipf sampler not configured");
        let sample: f64 = zipf.sample(&mut self.rng);
        (sample as u64).saturating_sub(1).min(self.universe - 1)
    }
}

/// Per-key occurrence counts of a sequence, most frequent first.
///
/// Ties break toward the smaller key so the ordering is deterministic.
pub fn frequency_histogram(sequence: &[u64]) -> Vec<(u64, usize)> {
    let mut counts: FxHashMap<u64, usize> = FxHashMap::default();
    for &key in sequence {
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut histogram: Vec<(u64, usize)> = counts.into_iter().collect();
    histogram.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    histogram
}

/// FNV-1a hash for scrambling Zipfian ranks.
#[inline]
fn fnv_hash(key: u64) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for byte in key.to_le_bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
