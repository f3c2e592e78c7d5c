//! Reading generator: one uniformly-noised sample per metric per call.
//!
//! Each value is `baseline + (u - 0.5) * noise_width` with `u` drawn from
//! `[0, 1)`. Samples are independent across metrics and across calls.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{MetricProfile, MetricProfiles};
use crate::types::{Reading, ReadingSet};

pub struct ReadingGenerator {
    profiles: MetricProfiles,
    rng: StdRng,
}

impl ReadingGenerator {
    /// Generator seeded from OS entropy
    pub fn new(profiles: MetricProfiles) -> Self {
        Self {
            profiles,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs and tests
    pub fn with_seed(profiles: MetricProfiles, seed: u64) -> Self {
        Self {
            profiles,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn profiles(&self) -> &MetricProfiles {
        &self.profiles
    }

    /// Produce one reading per metric, timestamped now.
    pub fn generate(&mut self) -> ReadingSet {
        self.generate_at(Utc::now())
    }

    /// Produce one reading per metric with an explicit timestamp.
    pub fn generate_at(&mut self, timestamp: DateTime<Utc>) -> ReadingSet {
        ReadingSet {
            flow: sample(&mut self.rng, &self.profiles.flow, timestamp),
            pressure: sample(&mut self.rng, &self.profiles.pressure, timestamp),
            temperature: sample(&mut self.rng, &self.profiles.temperature, timestamp),
            leak_probability: sample(&mut self.rng, &self.profiles.leak_probability, timestamp),
        }
    }
}

impl std::fmt::Debug for ReadingGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingGenerator")
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}

fn sample(rng: &mut StdRng, profile: &MetricProfile, timestamp: DateTime<Utc>) -> Reading {
    let u: f64 = rng.gen();
    Reading::new(
        timestamp,
        profile.baseline + (u - 0.5) * profile.noise_width,
        profile.unit.as_str(),
    )
}
