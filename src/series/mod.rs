//! Daily fixture series.
//!
//! Two generators run back to back:
//! - [`solar`]: sunlight from a linear seasonal decline plus cloud noise
//! - [`bio`]: mood, sleep and activity driven by the previous day's sunlight
//!
//! [`Dataset`] wires them to a seeded [`SimRng`] and stops the line through
//! the [`JidokaGuard`] before anything reaches the caller.

pub mod bio;
pub mod solar;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::engine::jidoka::JidokaGuard;
use crate::engine::rng::{RandomSource, SimRng};
use crate::error::{SimError, SimResult};

pub use bio::{generate_bio_series, BioRecord, MoodState, MoodTransition, SleepBand};
pub use solar::{base_sunlight, generate_solar_series, SolarRecord};

/// Closed interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl Band {
    /// Create a band from its bounds.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Uniform draw inside the band.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.uniform(self.low, self.high)
    }

    /// Whether `value` lies inside the band (bounds included).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

/// Round to two decimal places, the precision every real field is reported at.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A generated pair of aligned series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Master seed the dataset was generated from.
    pub seed: u64,
    /// Environmental series, one record per day.
    pub solar: Vec<SolarRecord>,
    /// Biometric series aligned index-for-index with `solar`.
    pub bio: Vec<BioRecord>,
}

impl Dataset {
    /// Generate a dataset from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero-length run or empty user id, and
    /// `InvariantViolation` if the guard rejects a generated record.
    pub fn generate(config: &GeneratorConfig) -> SimResult<Self> {
        Self::from_seed(
            config.reproducibility.seed,
            config.series.days,
            config.series.resolved_end_date(),
            &config.series.user_id,
        )
    }

    /// Generate a dataset from explicit parameters.
    ///
    /// The master seed is partitioned into one stream per generator so the
    /// solar series for a seed is the same however the bio logic draws.
    ///
    /// # Errors
    ///
    /// See [`Dataset::generate`].
    pub fn from_seed(
        seed: u64,
        days: usize,
        end_date: NaiveDate,
        user_id: &str,
    ) -> SimResult<Self> {
        debug!(seed, days, %end_date, user_id, "generating dataset");

        let mut rng = SimRng::new(seed);
        let mut streams = rng.partition(2);

        let solar = generate_solar_series(days, end_date, &mut streams[0])?;
        let bio = generate_bio_series(&solar, user_id, &mut streams[1])?;

        JidokaGuard::new().enforce(&solar, &bio)?;

        info!(days = solar.len(), seed, "dataset generated");
        Ok(Self { seed, solar, bio })
    }

    /// Number of simulated days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solar.len()
    }

    /// Whether the dataset holds no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solar.is_empty()
    }

    /// Hex BLAKE3 digest of both series.
    ///
    /// The seed is not part of the digest: two seeds that happen to produce
    /// the same records fingerprint identically.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the records cannot be encoded.
    pub fn fingerprint(&self) -> SimResult<String> {
        let bytes = bincode::serialize(&(&self.solar, &self.bio))
            .map_err(|e| SimError::serialization(format!("Fingerprint: {e}")))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
