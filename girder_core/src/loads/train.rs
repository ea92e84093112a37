//! Multi-wheel train
//!
//! A train is a rigid row of wheels. Wheel offsets are measured from the
//! leading wheel, which sits at `leading_position_mm` on the span. Each wheel
//! carries a fixed fraction of the total load; fractions are normalised to
//! sum to one on construction, so rescaling the total load scales every
//! wheel proportionally.
//!
//! ```text
//!   leading wheel
//!   ↓
//!   ●────●───────●────●───────●────●      wheels at x₀ + offset_i
//!   0   176     340  516     680  856     (default offsets, mm)
//! ```

use serde::{Deserialize, Serialize};

use super::PointLoad;
use crate::errors::{require_positive, CalcError, CalcResult};

/// Wheel offsets of the default three-car train (mm)
pub const DEFAULT_WHEEL_OFFSETS_MM: [f64; 6] = [0.0, 176.0, 340.0, 516.0, 680.0, 856.0];

/// Relative wheel weights of the default train; the locomotive is heavier
pub const DEFAULT_WHEEL_WEIGHTS: [f64; 6] = [1.35, 1.35, 1.0, 1.0, 1.0, 1.0];

/// Default total train load (N)
pub const DEFAULT_TRAIN_LOAD_N: f64 = 452.0;

/// Serialized form: raw offsets and weights, normalised on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainSpec {
    wheel_offsets_mm: Vec<f64>,
    wheel_weights: Vec<f64>,
    total_load_n: f64,
    #[serde(default)]
    leading_position_mm: f64,
}

/// A train of point loads with a fixed wheel pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrainSpec", into = "TrainSpec")]
pub struct Train {
    wheel_offsets_mm: Vec<f64>,
    wheel_weights: Vec<f64>,
    total_load_n: f64,
    leading_position_mm: f64,
}

impl Default for Train {
    fn default() -> Self {
        let total: f64 = DEFAULT_WHEEL_WEIGHTS.iter().sum();
        Train {
            wheel_offsets_mm: DEFAULT_WHEEL_OFFSETS_MM.to_vec(),
            wheel_weights: DEFAULT_WHEEL_WEIGHTS.iter().map(|w| w / total).collect(),
            total_load_n: DEFAULT_TRAIN_LOAD_N,
            leading_position_mm: 0.0,
        }
    }
}

impl Train {
    /// Create a train from wheel offsets, relative weights and total load.
    ///
    /// Offsets are shifted so the first wheel sits at offset zero.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] when there are no wheels, the two
    /// lists differ in length, offsets are not ascending, a weight is
    /// negative, all weights are zero or the load is negative.
    pub fn new(
        wheel_offsets_mm: Vec<f64>,
        wheel_weights: Vec<f64>,
        total_load_n: f64,
    ) -> CalcResult<Self> {
        if wheel_offsets_mm.is_empty() {
            return Err(CalcError::invalid_input(
                "wheel_offsets_mm",
                "[]",
                "A train needs at least one wheel",
            ));
        }
        if wheel_offsets_mm.len() != wheel_weights.len() {
            return Err(CalcError::invalid_input(
                "wheel_weights",
                format!("{} weights", wheel_weights.len()),
                format!("Expected one weight per wheel ({})", wheel_offsets_mm.len()),
            ));
        }
        if wheel_offsets_mm.iter().any(|o| !o.is_finite())
            || wheel_offsets_mm.windows(2).any(|w| w[1] < w[0])
        {
            return Err(CalcError::invalid_input(
                "wheel_offsets_mm",
                format!("{:?}", wheel_offsets_mm),
                "Offsets must be finite and ascending",
            ));
        }
        if wheel_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CalcError::invalid_input(
                "wheel_weights",
                format!("{:?}", wheel_weights),
                "Weights cannot be negative",
            ));
        }
        let weight_sum: f64 = wheel_weights.iter().sum();
        require_positive("wheel_weights", weight_sum)?;
        validate_load(total_load_n)?;

        let first = wheel_offsets_mm[0];
        Ok(Train {
            wheel_offsets_mm: wheel_offsets_mm.iter().map(|o| o - first).collect(),
            wheel_weights: wheel_weights.iter().map(|w| w / weight_sum).collect(),
            total_load_n,
            leading_position_mm: 0.0,
        })
    }

    /// Train whose wheels all carry the same share
    pub fn uniform(wheel_offsets_mm: Vec<f64>, total_load_n: f64) -> CalcResult<Self> {
        let weights = vec![1.0; wheel_offsets_mm.len()];
        Train::new(wheel_offsets_mm, weights, total_load_n)
    }

    /// Wheel offsets from the leading wheel (mm)
    pub fn wheel_offsets(&self) -> &[f64] {
        &self.wheel_offsets_mm
    }

    /// Normalised wheel weights (sum to one)
    pub fn wheel_weights(&self) -> &[f64] {
        &self.wheel_weights
    }

    /// Total train load (N)
    pub fn total_load(&self) -> f64 {
        self.total_load_n
    }

    /// Distance from the leading to the last wheel (mm)
    pub fn wheelbase(&self) -> f64 {
        self.wheel_offsets_mm.last().copied().unwrap_or(0.0)
    }

    /// Position of the leading wheel on the span (mm)
    pub fn leading_position(&self) -> f64 {
        self.leading_position_mm
    }

    /// Same train with its total load rescaled
    pub fn with_total_load(&self, total_load_n: f64) -> CalcResult<Self> {
        validate_load(total_load_n)?;
        Ok(Train {
            total_load_n,
            ..self.clone()
        })
    }

    /// Same train with its leading wheel at `position_mm`
    pub fn placed_at(&self, position_mm: f64) -> Self {
        Train {
            leading_position_mm: position_mm,
            ..self.clone()
        }
    }

    /// Same train moved along the span by `step_mm`
    pub fn moved_by(&self, step_mm: f64) -> Self {
        self.placed_at(self.leading_position_mm + step_mm)
    }

    /// Absolute wheel positions (mm)
    pub fn wheel_positions(&self) -> Vec<f64> {
        self.wheel_offsets_mm
            .iter()
            .map(|o| self.leading_position_mm + o)
            .collect()
    }

    /// Load carried by each wheel (N)
    pub fn wheel_loads(&self) -> Vec<f64> {
        self.wheel_weights
            .iter()
            .map(|w| w * self.total_load_n)
            .collect()
    }

    /// Point loads of the wheels currently on a span of length `span_mm`.
    ///
    /// Wheels that have run off either end carry nothing and are dropped.
    pub fn loads_on(&self, span_mm: f64) -> Vec<PointLoad> {
        self.wheel_positions()
            .into_iter()
            .zip(self.wheel_loads())
            .map(|(x, p)| PointLoad::new(x, p))
            .filter(|load| load.is_on_span(span_mm))
            .collect()
    }

    /// Leading-wheel positions that keep every wheel on the span, from zero
    /// in steps of `step_mm`.
    ///
    /// # Errors
    ///
    /// [`CalcError::InfeasibleTrain`] when the wheelbase is longer than the
    /// span, [`CalcError::InvalidInput`] for a non-positive step.
    pub fn admissible_positions(&self, span_mm: f64, step_mm: f64) -> CalcResult<Vec<f64>> {
        require_positive("span_mm", span_mm)?;
        require_positive("position_step_mm", step_mm)?;
        let travel = span_mm - self.wheelbase();
        if travel < 0.0 {
            return Err(CalcError::InfeasibleTrain {
                wheelbase_mm: self.wheelbase(),
                span_mm,
            });
        }
        let count = (travel / step_mm + 1e-9).floor() as usize;
        Ok((0..=count).map(|i| i as f64 * step_mm).collect())
    }
}

fn validate_load(total_load_n: f64) -> CalcResult<()> {
    if total_load_n.is_finite() && total_load_n >= 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(
            "total_load_n",
            total_load_n.to_string(),
            "Train load must be finite and non-negative",
        ))
    }
}

impl TryFrom<TrainSpec> for Train {
    type Error = CalcError;

    fn try_from(spec: TrainSpec) -> Result<Self, Self::Error> {
        Ok(Train::new(spec.wheel_offsets_mm, spec.wheel_weights, spec.total_load_n)?
            .placed_at(spec.leading_position_mm))
    }
}

impl From<Train> for TrainSpec {
    fn from(train: Train) -> Self {
        TrainSpec {
            wheel_offsets_mm: train.wheel_offsets_mm,
            wheel_weights: train.wheel_weights,
            total_load_n: train.total_load_n,
            leading_position_mm: train.leading_position_mm,
        }
    }
}
