//! # Evaluation
//!
//! Moving-load analysis of a whole bridge.
//!
//! - [`evaluator`] - [`Evaluator`]: train sweep, maximum load, force envelopes
//! - [`dead_zones`](mod@dead_zones) - Interval scan over safety-factor series

pub mod dead_zones;
pub mod evaluator;

pub use dead_zones::{dead_zones, DeadZone};
pub use evaluator::{Evaluator, ForceEnvelope, MaximumLoad, SafetySeries, MAXIMUM_LOAD_BRACKET};
