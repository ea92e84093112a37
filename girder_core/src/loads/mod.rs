//! Loads applied to a simply supported span
//!
//! Everything reaching the beam is reduced to point loads. A [`Train`] is a
//! rigid pattern of wheels that produces one set of point loads per position.
//!
//! # Overview
//!
//! - [`PointLoad`] - A downward force at a position along the span
//! - [`Train`] - Wheel offsets, weight fractions and total load
//!
//! # Example
//!
//! ```
//! use girder_core::loads::Train;
//!
//! let train = Train::default().placed_at(172.0);
//! let loads = train.loads_on(1200.0);
//! assert_eq!(loads.len(), 6);
//! assert_eq!(loads[0].position_mm, 172.0);
//! ```

pub mod train;

pub use train::{Train, DEFAULT_TRAIN_LOAD_N, DEFAULT_WHEEL_OFFSETS_MM, DEFAULT_WHEEL_WEIGHTS};

use serde::{Deserialize, Serialize};

/// Point load (N) at a position (mm from the left support). Positive acts
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    pub position_mm: f64,
    pub magnitude_n: f64,
}

impl PointLoad {
    /// Create a point load
    pub const fn new(position_mm: f64, magnitude_n: f64) -> Self {
        PointLoad {
            position_mm,
            magnitude_n,
        }
    }

    /// Left reaction (R1) for this load alone
    pub fn reaction_left(&self, span_mm: f64) -> f64 {
        // R1 = P(L-a)/L
        self.magnitude_n * (span_mm - self.position_mm) / span_mm
    }

    /// Right reaction (R2) for this load alone
    pub fn reaction_right(&self, span_mm: f64) -> f64 {
        // R2 = Pa/L
        self.magnitude_n * self.position_mm / span_mm
    }

    /// Whether the load sits on the span (supports included)
    pub fn is_on_span(&self, span_mm: f64) -> bool {
        self.position_mm >= 0.0 && self.position_mm <= span_mm
    }
}
