//! Jidoka (自働化) - stop-the-line checks on generated fixtures.
//!
//! Every dataset passes through the guard before it is handed to the caller.
//! A fixture that breaks its own documented ranges would poison the
//! downstream analysis silently, so the first violation aborts generation.
//!
//! # Checks
//!
//! 1. **Non-finite values**: NaN or Inf in any real field
//! 2. **Range violations**: cloud cover, UV index, sunlight, mood, sleep
//! 3. **Derived fields**: `energy_level == floor(mood_score)`, sleep band
//!    consistent with mood
//! 4. **Alignment**: contiguous solar dates, bio dates matching solar

use chrono::NaiveDate;
use std::fmt;
use tracing::warn;

use crate::error::{SimError, SimResult};
use crate::series::bio::{SleepBand, GOOD_MOOD_ABOVE, MAX_MOOD, MIN_MOOD};
use crate::series::solar::{MAX_SUNLIGHT_HOURS, MAX_UV_INDEX};
use crate::series::{BioRecord, SolarRecord};

/// Jidoka violation types.
#[derive(Debug, Clone, PartialEq)]
pub enum JidokaViolation {
    /// NaN or Inf in a real field.
    NonFiniteValue {
        /// Day index.
        day: usize,
        /// Field name.
        field: String,
    },
    /// Value outside its documented range.
    OutOfRange {
        /// Day index.
        day: usize,
        /// Field name.
        field: String,
        /// Offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Sleep duration in none of the good/short/long bands.
    SleepOutsideBands {
        /// Day index.
        day: usize,
        /// Offending value.
        sleep_hours: f64,
    },
    /// Sleep band does not fit the day's mood.
    SleepBandMismatch {
        /// Day index.
        day: usize,
        /// Reported mood.
        mood_score: f64,
        /// Offending value.
        sleep_hours: f64,
        /// Band the value fell in.
        band: SleepBand,
    },
    /// `energy_level` is not the truncated mood score.
    EnergyMismatch {
        /// Day index.
        day: usize,
        /// Reported mood.
        mood_score: f64,
        /// Reported energy.
        energy_level: u8,
    },
    /// Solar date is not the day after its predecessor.
    DateGap {
        /// Day index.
        day: usize,
        /// Date that was expected.
        expected: Option<NaiveDate>,
        /// Date that was found.
        found: NaiveDate,
    },
    /// Bio record date differs from the solar record at the same index.
    DateMisaligned {
        /// Day index.
        day: usize,
        /// Solar date.
        solar: NaiveDate,
        /// Bio date.
        bio: NaiveDate,
    },
    /// Series lengths differ.
    LengthMismatch {
        /// Solar series length.
        solar: usize,
        /// Bio series length.
        bio: usize,
    },
}

impl JidokaViolation {
    /// Day index the violation refers to.
    #[must_use]
    pub const fn day(&self) -> usize {
        match self {
            Self::NonFiniteValue { day, .. }
            | Self::OutOfRange { day, .. }
            | Self::SleepOutsideBands { day, .. }
            | Self::SleepBandMismatch { day, .. }
            | Self::EnergyMismatch { day, .. }
            | Self::DateGap { day, .. }
            | Self::DateMisaligned { day, .. } => *day,
            Self::LengthMismatch { solar, bio } => {
                if *solar < *bio {
                    *solar
                } else {
                    *bio
                }
            }
        }
    }

    /// Convert into the error that stops generation.
    #[must_use]
    pub fn into_error(self) -> SimError {
        SimError::InvariantViolation {
            day: self.day(),
            detail: self.to_string(),
        }
    }
}

impl fmt::Display for JidokaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteValue { field, .. } => write!(f, "{field} is not finite"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
                ..
            } => write!(f, "{field} {value} outside [{min}, {max}]"),
            Self::SleepOutsideBands { sleep_hours, .. } => {
                write!(f, "sleep_hours {sleep_hours} outside every sleep band")
            }
            Self::SleepBandMismatch {
                mood_score,
                sleep_hours,
                band,
                ..
            } => write!(
                f,
                "sleep_hours {sleep_hours} in {band:?} band does not fit mood_score {mood_score}"
            ),
            Self::EnergyMismatch {
                mood_score,
                energy_level,
                ..
            } => write!(
                f,
                "energy_level {energy_level} is not floor(mood_score {mood_score})"
            ),
            Self::DateGap {
                expected, found, ..
            } => match expected {
                Some(date) => write!(f, "expected date {date}, found {found}"),
                None => write!(f, "no calendar day follows the previous date, found {found}"),
            },
            Self::DateMisaligned { solar, bio, .. } => {
                write!(f, "bio date {bio} does not match solar date {solar}")
            }
            Self::LengthMismatch { solar, bio } => {
                write!(f, "solar series has {solar} records, bio series has {bio}")
            }
        }
    }
}

/// Guard that inspects generated series.
#[derive(Debug, Clone, Copy, Default)]
pub struct JidokaGuard;

impl JidokaGuard {
    /// Create a guard.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Collect every violation in the solar series.
    #[must_use]
    pub fn check_solar(&self, solar: &[SolarRecord]) -> Vec<JidokaViolation> {
        let mut violations = Vec::new();

        for (day, record) in solar.iter().enumerate() {
            check_real(
                &mut violations,
                day,
                "cloud_cover_pct",
                record.cloud_cover_pct,
                0.0,
                100.0,
            );
            check_real(
                &mut violations,
                day,
                "sunlight_hours",
                record.sunlight_hours,
                f64::MIN_POSITIVE,
                MAX_SUNLIGHT_HOURS,
            );
            if record.uv_index > MAX_UV_INDEX {
                violations.push(JidokaViolation::OutOfRange {
                    day,
                    field: "uv_index".to_string(),
                    value: f64::from(record.uv_index),
                    min: 0.0,
                    max: f64::from(MAX_UV_INDEX),
                });
            }
        }

        for (offset, pair) in solar.windows(2).enumerate() {
            let expected = pair[0].date.succ_opt();
            if expected != Some(pair[1].date) {
                violations.push(JidokaViolation::DateGap {
                    day: offset + 1,
                    expected,
                    found: pair[1].date,
                });
            }
        }

        violations
    }

    /// Collect every violation in the bio series and its alignment.
    #[must_use]
    pub fn check_bio(&self, solar: &[SolarRecord], bio: &[BioRecord]) -> Vec<JidokaViolation> {
        let mut violations = Vec::new();

        if solar.len() != bio.len() {
            violations.push(JidokaViolation::LengthMismatch {
                solar: solar.len(),
                bio: bio.len(),
            });
        }

        for (day, (sun, record)) in solar.iter().zip(bio).enumerate() {
            if sun.date != record.date {
                violations.push(JidokaViolation::DateMisaligned {
                    day,
                    solar: sun.date,
                    bio: record.date,
                });
            }

            let mood_ok = check_real(
                &mut violations,
                day,
                "mood_score",
                record.mood_score,
                MIN_MOOD,
                MAX_MOOD,
            );
            if mood_ok && f64::from(record.energy_level) != record.mood_score.floor() {
                violations.push(JidokaViolation::EnergyMismatch {
                    day,
                    mood_score: record.mood_score,
                    energy_level: record.energy_level,
                });
            }

            if !record.sleep_hours.is_finite() {
                violations.push(JidokaViolation::NonFiniteValue {
                    day,
                    field: "sleep_hours".to_string(),
                });
            } else {
                match SleepBand::classify(record.sleep_hours) {
                    None => violations.push(JidokaViolation::SleepOutsideBands {
                        day,
                        sleep_hours: record.sleep_hours,
                    }),
                    Some(band) if !band_fits_mood(band, record.mood_score) => {
                        violations.push(JidokaViolation::SleepBandMismatch {
                            day,
                            mood_score: record.mood_score,
                            sleep_hours: record.sleep_hours,
                            band,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        violations
    }

    /// Collect violations across both series.
    #[must_use]
    pub fn check(&self, solar: &[SolarRecord], bio: &[BioRecord]) -> Vec<JidokaViolation> {
        let mut violations = self.check_solar(solar);
        violations.extend(self.check_bio(solar, bio));
        violations
    }

    /// Stop the line on the first violation.
    ///
    /// Every violation found is logged before the first is returned.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` describing the earliest violation.
    pub fn enforce(&self, solar: &[SolarRecord], bio: &[BioRecord]) -> SimResult<()> {
        let violations = self.check(solar, bio);
        for violation in &violations {
            warn!(day = violation.day(), %violation, "jidoka violation");
        }
        match violations.into_iter().min_by_key(JidokaViolation::day) {
            Some(first) => Err(first.into_error()),
            None => Ok(()),
        }
    }
}

/// Good sleep above the mood threshold, short or long sleep below it.
///
/// A reported score equal to the threshold may have been rounded from
/// either side, so it accepts any band.
fn band_fits_mood(band: SleepBand, mood_score: f64) -> bool {
    if mood_score > GOOD_MOOD_ABOVE {
        band == SleepBand::Good
    } else if mood_score < GOOD_MOOD_ABOVE {
        band != SleepBand::Good
    } else {
        true
    }
}

/// Push a violation if `value` is non-finite or outside `[min, max]`.
/// Returns whether the value passed.
fn check_real(
    violations: &mut Vec<JidokaViolation>,
    day: usize,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) -> bool {
    if !value.is_finite() {
        violations.push(JidokaViolation::NonFiniteValue {
            day,
            field: field.to_string(),
        });
        return false;
    }
    if !(min..=max).contains(&value) {
        violations.push(JidokaViolation::OutOfRange {
            day,
            field: field.to_string(),
            value,
            min,
            max,
        });
        return false;
    }
    true
}
