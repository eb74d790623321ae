//! Biometric series driven by lagged sunlight.
//!
//! A single mood scalar is threaded through the run as a fold. Each day the
//! previous day's sunlight selects a transition:
//!
//! | Prior sunlight | Transition | Mood delta |
//! |----------------|------------|------------|
//! | `< 5 h`        | Slide      | `-U(0.5, 1.5)` |
//! | `> 8 h`        | Recover    | `+U(0.1, 0.8)` |
//! | otherwise      | Hold       | none |
//!
//! The result is clamped to `[1, 10]` before sleep, steps and energy are
//! derived from it. Day 0 has no prior day and always holds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::solar::{ensure_contiguous, SolarRecord};
use super::{round2, Band};
use crate::engine::rng::RandomSource;
use crate::error::{SimError, SimResult};

/// Mood before day 0.
pub const INITIAL_MOOD: f64 = 8.0;

/// Lowest mood score.
pub const MIN_MOOD: f64 = 1.0;

/// Highest mood score.
pub const MAX_MOOD: f64 = 10.0;

/// Prior-day sunlight below which mood slides (hours).
pub const SLIDE_BELOW_HOURS: f64 = 5.0;

/// Prior-day sunlight above which mood recovers (hours).
pub const RECOVER_ABOVE_HOURS: f64 = 8.0;

/// Magnitude of a depressive slide.
pub const SLIDE_DELTA: Band = Band::new(0.5, 1.5);

/// Magnitude of a recovery.
pub const RECOVER_DELTA: Band = Band::new(0.1, 0.8);

/// Mood above which sleep stays in the good band.
pub const GOOD_MOOD_ABOVE: f64 = 6.0;

/// Restful sleep (hours).
pub const GOOD_SLEEP: Band = Band::new(6.5, 8.5);

/// Poor sleep, short mode (hours).
pub const SHORT_SLEEP: Band = Band::new(4.0, 5.5);

/// Poor sleep, oversleeping mode (hours).
pub const LONG_SLEEP: Band = Band::new(9.0, 11.0);

/// Step count at full mood, before mood scaling.
pub const BASE_STEPS: Band = Band::new(3000.0, 12000.0);

/// One day of wearable readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioRecord {
    /// Calendar day, equal to the aligned solar record's date.
    pub date: NaiveDate,
    /// Fixed subject identifier.
    pub user_id: String,
    /// Hours slept.
    pub sleep_hours: f64,
    /// Steps walked.
    pub step_count: u32,
    /// Self-reported mood, `[1, 10]`.
    pub mood_score: f64,
    /// Truncated mood, `[1, 10]`.
    pub energy_level: u8,
}

/// Direction of the daily mood update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodTransition {
    /// Dark prior day: mood drops.
    Slide,
    /// Bright prior day: mood rises.
    Recover,
    /// Neither, or no prior day.
    Hold,
}

impl MoodTransition {
    /// Select the transition for the prior day's sunlight.
    ///
    /// `None` (day 0) always holds.
    #[must_use]
    pub fn for_prior_sunlight(prior_sunlight_hours: Option<f64>) -> Self {
        match prior_sunlight_hours {
            Some(hours) if hours < SLIDE_BELOW_HOURS => Self::Slide,
            Some(hours) if hours > RECOVER_ABOVE_HOURS => Self::Recover,
            _ => Self::Hold,
        }
    }

    /// Signed mood delta. `Hold` consumes no draw.
    pub fn delta<R: RandomSource + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            Self::Slide => -SLIDE_DELTA.sample(rng),
            Self::Recover => RECOVER_DELTA.sample(rng),
            Self::Hold => 0.0,
        }
    }
}

/// Running mood, always within `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodState(f64);

impl MoodState {
    /// Mood before day 0.
    #[must_use]
    pub fn initial() -> Self {
        Self::clamped(INITIAL_MOOD)
    }

    /// Clamp an arbitrary value into the mood range.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(MIN_MOOD, MAX_MOOD))
    }

    /// Current mood value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Apply one day's transition and clamp.
    #[must_use]
    pub fn advance<R: RandomSource + ?Sized>(
        self,
        prior_sunlight_hours: Option<f64>,
        rng: &mut R,
    ) -> Self {
        let transition = MoodTransition::for_prior_sunlight(prior_sunlight_hours);
        Self::clamped(self.0 + transition.delta(rng))
    }

    /// Sleep band this mood samples from, before the poor-sleep coin flip.
    #[must_use]
    pub fn sleeps_well(self) -> bool {
        self.0 > GOOD_MOOD_ABOVE
    }
}

/// Which band a sleep duration fell in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepBand {
    /// 6.5–8.5 h.
    Good,
    /// 4–5.5 h.
    Short,
    /// 9–11 h.
    Long,
}

impl SleepBand {
    /// Classify a sleep duration, `None` if it fits no band.
    #[must_use]
    pub fn classify(sleep_hours: f64) -> Option<Self> {
        [
            (Self::Good, GOOD_SLEEP),
            (Self::Short, SHORT_SLEEP),
            (Self::Long, LONG_SLEEP),
        ]
        .into_iter()
        .find(|(_, band)| band.contains(sleep_hours))
        .map(|(kind, _)| kind)
    }

    /// The interval this band samples from.
    #[must_use]
    pub const fn band(self) -> Band {
        match self {
            Self::Good => GOOD_SLEEP,
            Self::Short => SHORT_SLEEP,
            Self::Long => LONG_SLEEP,
        }
    }

    /// Pick the band for `mood`. Poor moods split evenly between short and
    /// long sleep.
    pub fn for_mood<R: RandomSource + ?Sized>(mood: MoodState, rng: &mut R) -> Self {
        if mood.sleeps_well() {
            Self::Good
        } else if rng.coin_flip() {
            Self::Short
        } else {
            Self::Long
        }
    }
}

/// Generate the bio series aligned with `solar`.
///
/// Must run in day order: each day's mood depends on the previous day's mood
/// and sunlight.
///
/// # Errors
///
/// Returns `InvalidArgument` if `solar` is empty, its dates are not
/// consecutive, or `user_id` is empty or holds control characters.
pub fn generate_bio_series<R: RandomSource + ?Sized>(
    solar: &[SolarRecord],
    user_id: &str,
    rng: &mut R,
) -> SimResult<Vec<BioRecord>> {
    if solar.is_empty() {
        return Err(SimError::invalid_argument("solar series is empty"));
    }
    if user_id.is_empty() {
        return Err(SimError::invalid_argument("user_id must not be empty"));
    }
    if user_id.chars().any(char::is_control) {
        return Err(SimError::invalid_argument(format!(
            "user_id must not contain control characters, got {user_id:?}"
        )));
    }
    ensure_contiguous(solar)?;

    let (_final_mood, records) = solar.iter().enumerate().fold(
        (MoodState::initial(), Vec::with_capacity(solar.len())),
        |(mood, mut records), (day_index, day)| {
            let prior = day_index
                .checked_sub(1)
                .map(|prev| solar[prev].sunlight_hours);
            let mood = mood.advance(prior, &mut *rng);
            records.push(observe_day(mood, day.date, user_id, &mut *rng));
            (mood, records)
        },
    );

    Ok(records)
}

/// Derive one day's readings from the already-clamped mood.
fn observe_day<R: RandomSource + ?Sized>(
    mood: MoodState,
    date: NaiveDate,
    user_id: &str,
    rng: &mut R,
) -> BioRecord {
    let sleep_hours = SleepBand::for_mood(mood, rng).band().sample(rng);
    let step_count = (BASE_STEPS.sample(rng) * (mood.value() / 10.0)) as u32;
    let mood_score = round2(mood.value());

    BioRecord {
        date,
        user_id: user_id.to_string(),
        sleep_hours: round2(sleep_hours),
        step_count,
        mood_score,
        // Truncated from the reported score so the two never disagree
        energy_level: mood_score.trunc() as u8,
    }
}
