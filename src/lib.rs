//! # biosolar
//!
//! Deterministic synthetic fixtures pairing daily solar exposure with a
//! subject's wellness metrics.
//!
//! - Solar series: cloud cover, sunlight hours and UV index per day
//! - Bio series: sleep, steps, mood and energy driven by the solar series
//! - Jidoka guard: every generated record is checked before it leaves the engine
//! - Seeded `Pcg64` streams: same seed, same bytes
//!
//! ## Example
//!
//! ```rust
//! use biosolar::prelude::*;
//! use chrono::NaiveDate;
//!
//! let end = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
//! let config = GeneratorConfig::builder()
//!     .seed(42)
//!     .days(60)
//!     .end_date(end)
//!     .build();
//!
//! let dataset = Dataset::generate(&config).unwrap();
//! assert_eq!(dataset.len(), 60);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod series;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{GeneratorConfig, GeneratorConfigBuilder};
    pub use crate::engine::jidoka::{JidokaGuard, JidokaViolation};
    pub use crate::engine::rng::{RandomSource, SimRng};
    pub use crate::error::{SimError, SimResult};
    pub use crate::persistence::{read_dataset, write_dataset, WriteReport};
    pub use crate::series::bio::{generate_bio_series, BioRecord};
    pub use crate::series::solar::{generate_solar_series, SolarRecord};
    pub use crate::series::Dataset;
}

/// Re-export for public API
pub use error::{SimError, SimResult};
