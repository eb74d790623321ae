//! Generation engine primitives.
//!
//! - Deterministic RNG (PCG with partitioned seeds) behind the
//!   [`RandomSource`] capability
//! - Jidoka guard that stops the line on invalid fixtures

pub mod jidoka;
pub mod rng;

pub use jidoka::{JidokaGuard, JidokaViolation};
pub use rng::{RandomSource, ScriptedSource, SimRng};
