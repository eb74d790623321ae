//! Solar exposure series.
//!
//! Models a slide into winter: baseline daylight falls linearly from 12 h
//! toward 8 h across the run, and each day is independently cloudy (30%) or
//! clear. Cloud cover attenuates the baseline by up to 70%.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{round2, Band};
use crate::engine::rng::RandomSource;
use crate::error::{SimError, SimResult};

/// Location reported on every record.
pub const LOCATION: &str = "New York, USA";

/// Placeholder sunrise time.
pub const SUNRISE_TIME: &str = "06:30";

/// Placeholder sunset time.
pub const SUNSET_TIME: &str = "18:00";

/// Baseline sunlight on day 0 (hours).
pub const MAX_SUNLIGHT_HOURS: f64 = 12.0;

/// Total baseline decline over a full run (hours).
pub const SEASONAL_DECLINE_HOURS: f64 = 4.0;

/// Probability that a day is cloudy.
pub const CLOUDY_PROBABILITY: f64 = 0.3;

/// Cloud cover on cloudy days (percent).
pub const CLOUDY_COVER_PCT: Band = Band::new(60.0, 100.0);

/// Cloud cover on clear days (percent).
pub const CLEAR_COVER_PCT: Band = Band::new(0.0, 30.0);

/// Fraction of sunlight blocked by full cloud cover.
pub const CLOUD_ATTENUATION: f64 = 0.7;

/// Highest reportable UV index.
pub const MAX_UV_INDEX: u8 = 10;

/// One day of environmental readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarRecord {
    /// Calendar day.
    pub date: NaiveDate,
    /// Fixed descriptive location.
    pub location: String,
    /// Placeholder clock time.
    pub sunrise_time: String,
    /// Placeholder clock time.
    pub sunset_time: String,
    /// Cloud cover in percent, `[0, 100]`.
    pub cloud_cover_pct: f64,
    /// UV index, `[0, 10]`.
    pub uv_index: u8,
    /// Effective sunlight in hours, `(0, 12]`.
    pub sunlight_hours: f64,
}

/// Seasonal baseline sunlight for `day_index` of a `days`-long run.
///
/// `12 - (i / N) * 4`: strictly decreasing in `day_index`, never reaching 8.
#[must_use]
pub fn base_sunlight(day_index: usize, days: usize) -> f64 {
    let fraction = day_index as f64 / days as f64;
    MAX_SUNLIGHT_HOURS - fraction * SEASONAL_DECLINE_HOURS
}

/// Sunlight left after `cloud_cover_pct` percent cloud cover.
#[must_use]
pub fn attenuate(base_hours: f64, cloud_cover_pct: f64) -> f64 {
    base_hours * (1.0 - cloud_cover_pct / 100.0 * CLOUD_ATTENUATION)
}

/// UV index for the given sunlight, truncated rather than rounded.
#[must_use]
pub fn uv_index(sunlight_hours: f64) -> u8 {
    let index = (sunlight_hours / MAX_SUNLIGHT_HOURS * 10.0).trunc();
    index.clamp(0.0, f64::from(MAX_UV_INDEX)) as u8
}

/// Generate `days` consecutive solar records ending on `end_date`.
///
/// Draws two values per day from `rng`: the cloudy test, then the cover.
///
/// # Errors
///
/// Returns `InvalidArgument` if `days` is zero or the run would start before
/// the earliest representable date.
pub fn generate_solar_series<R: RandomSource + ?Sized>(
    days: usize,
    end_date: NaiveDate,
    rng: &mut R,
) -> SimResult<Vec<SolarRecord>> {
    if days == 0 {
        return Err(SimError::invalid_argument(
            "days must be a positive integer, got 0",
        ));
    }

    let start_date = end_date
        .checked_sub_days(Days::new(days as u64 - 1))
        .ok_or_else(|| {
            SimError::invalid_argument(format!(
                "{days} days before {end_date} is out of the calendar range"
            ))
        })?;

    let records = start_date
        .iter_days()
        .take(days)
        .enumerate()
        .map(|(day_index, date)| simulate_day(day_index, days, date, &mut *rng))
        .collect();

    Ok(records)
}

fn simulate_day<R: RandomSource + ?Sized>(
    day_index: usize,
    days: usize,
    date: NaiveDate,
    rng: &mut R,
) -> SolarRecord {
    let cover_band = if rng.chance(CLOUDY_PROBABILITY) {
        CLOUDY_COVER_PCT
    } else {
        CLEAR_COVER_PCT
    };
    let cloud_cover_pct = cover_band.sample(rng);
    let sunlight = attenuate(base_sunlight(day_index, days), cloud_cover_pct);

    SolarRecord {
        date,
        location: LOCATION.to_string(),
        sunrise_time: SUNRISE_TIME.to_string(),
        sunset_time: SUNSET_TIME.to_string(),
        cloud_cover_pct: round2(cloud_cover_pct),
        uv_index: uv_index(sunlight),
        sunlight_hours: round2(sunlight),
    }
}

/// Check that `records` cover consecutive calendar days.
///
/// # Errors
///
/// Returns `InvalidArgument` naming the first gap or repeat.
pub fn ensure_contiguous(records: &[SolarRecord]) -> SimResult<()> {
    for (offset, pair) in records.windows(2).enumerate() {
        let expected = pair[0].date.succ_opt();
        if expected != Some(pair[1].date) {
            return Err(SimError::invalid_argument(format!(
                "solar dates not contiguous at index {}: {} follows {}",
                offset + 1,
                pair[1].date,
                pair[0].date
            )));
        }
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::engine::rng::SimRng;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_series_shape(seed in 0u64..u64::MAX, days in 1usize..400) {
            let end = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
            let records = generate_solar_series(days, end, &mut SimRng::new(seed)).unwrap();

            prop_assert_eq!(records.len(), days);
            prop_assert_eq!(records.last().map(|r| r.date), Some(end));
            prop_assert!(ensure_contiguous(&records).is_ok());
            for r in &records {
                prop_assert!((0.0..=100.0).contains(&r.cloud_cover_pct));
                prop_assert!(r.uv_index <= MAX_UV_INDEX);
                prop_assert!(r.sunlight_hours > 0.0);
            }
        }
    }
}
