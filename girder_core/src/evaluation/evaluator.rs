//! # Train Sweep
//!
//! The [`Evaluator`] rolls the train across the bridge one step at a time,
//! checks every position, and derives what a designer wants from the sweep:
//! the six safety-factor series, the dead zones and the largest train load
//! the bridge carries at every position.
//!
//! ## Maximum Load
//!
//! Every stress is linear in the train load, so the safety factors of a 1 N
//! train are exactly the loads at which each mode fails. The smallest of them
//! is the candidate maximum load. The candidate is then confirmed by sweeping
//! just below and just above it; if the bridge does not respond linearly (a
//! section that changes with load, say) the search falls back to bisection.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::calculations::BeamBridge;
//! use girder_core::evaluation::Evaluator;
//! use girder_core::geometry::BoxGirder;
//! use girder_core::loads::Train;
//! use girder_core::materials::Material;
//!
//! let section = BoxGirder::default().build().unwrap();
//! let bridge = BeamBridge::new(1200.0, Train::default(), section).unwrap();
//! let evaluator = Evaluator::new(bridge, Material::matboard()).unwrap();
//!
//! let series = evaluator.pass_the_train().unwrap();
//! assert_eq!(series.len(), 345);
//!
//! let max = evaluator.maximum_load().unwrap();
//! assert!(max.load_n > 256.0 && max.load_n < 256.1);
//! ```

use log::debug;
use serde::Serialize;

use super::dead_zones::{dead_zones, DeadZone};
use crate::calculations::bridge::{BeamBridge, SectionProfile};
use crate::calculations::safety::{FailureMode, SafetyFactors};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::geometry::CrossSection;
use crate::loads::Train;
use crate::materials::Material;

/// Relative width of the bracket around the reported maximum load
pub const MAXIMUM_LOAD_BRACKET: f64 = 1e-9;

/// Safety factor a bridge must keep everywhere to carry a load
const FAILURE_FACTOR: f64 = 1.0;

const MAX_EXPANSIONS: usize = 64;
const MAX_BISECTIONS: usize = 200;

/// One safety-factor series per mode, indexed by train position
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SafetySeries {
    /// Leading-wheel positions (mm)
    pub positions_mm: Vec<f64>,
    pub compression: Vec<f64>,
    pub tension: Vec<f64>,
    pub shear: Vec<f64>,
    pub glue_shear: Vec<f64>,
    pub flexural_buckling: Vec<f64>,
    pub shear_buckling: Vec<f64>,
}

impl SafetySeries {
    fn with_capacity(n: usize) -> Self {
        SafetySeries {
            positions_mm: Vec::with_capacity(n),
            compression: Vec::with_capacity(n),
            tension: Vec::with_capacity(n),
            shear: Vec::with_capacity(n),
            glue_shear: Vec::with_capacity(n),
            flexural_buckling: Vec::with_capacity(n),
            shear_buckling: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, position_mm: f64, factors: &SafetyFactors) {
        self.positions_mm.push(position_mm);
        self.compression.push(factors.compression);
        self.tension.push(factors.tension);
        self.shear.push(factors.shear);
        self.glue_shear.push(factors.glue_shear);
        self.flexural_buckling.push(factors.flexural_buckling);
        self.shear_buckling.push(factors.shear_buckling);
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.positions_mm.len()
    }

    /// Whether no position was swept
    pub fn is_empty(&self) -> bool {
        self.positions_mm.is_empty()
    }

    /// Series for one mode
    pub fn get(&self, mode: FailureMode) -> &[f64] {
        match mode {
            FailureMode::Compression => &self.compression,
            FailureMode::Tension => &self.tension,
            FailureMode::Shear => &self.shear,
            FailureMode::GlueShear => &self.glue_shear,
            FailureMode::FlexuralBuckling => &self.flexural_buckling,
            FailureMode::ShearBuckling => &self.shear_buckling,
        }
    }

    /// All six series in report order
    pub fn all(&self) -> [&[f64]; 6] {
        FailureMode::ALL.map(|mode| self.get(mode))
    }

    /// Factors at position index `i`
    pub fn at(&self, i: usize) -> Option<SafetyFactors> {
        (i < self.len()).then(|| SafetyFactors {
            compression: self.compression[i],
            tension: self.tension[i],
            shear: self.shear[i],
            glue_shear: self.glue_shear[i],
            flexural_buckling: self.flexural_buckling[i],
            shear_buckling: self.shear_buckling[i],
        })
    }

    /// Smallest factor across modes at every position
    pub fn minimum(&self) -> Vec<f64> {
        (0..self.len())
            .filter_map(|i| self.at(i).map(|f| f.min()))
            .collect()
    }

    /// Smallest factor of each mode over all positions
    pub fn mode_minimums(&self) -> SafetyFactors {
        (0..self.len())
            .filter_map(|i| self.at(i))
            .fold(SafetyFactors::UNLOADED, |acc, f| acc.min_with(&f))
    }

    /// Index of the first position where the combined minimum is smallest
    pub fn critical_index(&self) -> Option<usize> {
        let mut critical: Option<(usize, f64)> = None;
        for (i, f) in self.minimum().into_iter().enumerate() {
            if critical.map_or(true, |(_, best)| f < best) {
                critical = Some((i, f));
            }
        }
        critical.map(|(i, _)| i)
    }

    /// First position where the combined minimum is smallest, with that
    /// factor
    pub fn critical_position(&self) -> Option<(f64, f64)> {
        let i = self.critical_index()?;
        Some((*self.positions_mm.get(i)?, self.at(i)?.min()))
    }

    /// Modes that govern at the critical position, ties included
    pub fn critical_causes(&self) -> Vec<FailureMode> {
        self.critical_index()
            .and_then(|i| self.at(i))
            .map(|f| f.causes())
            .unwrap_or_default()
    }
}

/// Largest train load the bridge carries at every position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaximumLoad {
    /// Total train load (N)
    pub load_n: f64,
    /// Modes that fail first at the critical position, ties included
    pub causes: Vec<FailureMode>,
    /// Leading-wheel position where the bridge is weakest (mm)
    pub critical_position_mm: f64,
    /// Load at which each mode alone would fail (N)
    pub mode_limits_n: SafetyFactors,
}

impl MaximumLoad {
    /// Cause names joined for display
    pub fn cause_names(&self) -> Vec<&'static str> {
        self.causes.iter().map(|c| c.name()).collect()
    }
}

/// Largest shear and moment seen at each span position over the whole sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForceEnvelope {
    /// Span positions (mm)
    pub positions_mm: Vec<f64>,
    /// Largest `|V|` on either side of the position (N)
    pub max_shear_n: Vec<f64>,
    /// Largest `|M|` at the position (N·mm)
    pub max_moment_nmm: Vec<f64>,
}

/// Train sweep over one bridge and material
#[derive(Debug, Clone)]
pub struct Evaluator<P = CrossSection> {
    bridge: BeamBridge<P>,
    material: Material,
    threshold: f64,
    position_step_mm: f64,
}

impl<P: SectionProfile> Evaluator<P> {
    /// Create an evaluator with threshold 1 and a 1 mm position step.
    ///
    /// # Errors
    ///
    /// Invalid material constants, or a train longer than the span.
    pub fn new(bridge: BeamBridge<P>, material: Material) -> CalcResult<Self> {
        material.validate()?;
        bridge.check_train_fits()?;
        Ok(Evaluator {
            bridge,
            material,
            threshold: FAILURE_FACTOR,
            position_step_mm: 1.0,
        })
    }

    /// Safety factor below which a position counts as a dead zone
    pub fn with_threshold(mut self, threshold: f64) -> CalcResult<Self> {
        require_positive("threshold", threshold)?;
        self.threshold = threshold;
        Ok(self)
    }

    /// Distance between successive train positions (mm)
    pub fn with_position_step(mut self, step_mm: f64) -> CalcResult<Self> {
        require_positive("position_step_mm", step_mm)?;
        self.position_step_mm = step_mm;
        Ok(self)
    }

    /// The bridge under evaluation
    pub fn bridge(&self) -> &BeamBridge<P> {
        &self.bridge
    }

    /// Material limits
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Dead-zone threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Leading-wheel positions swept
    pub fn positions(&self) -> CalcResult<Vec<f64>> {
        self.bridge.admissible_positions(self.position_step_mm)
    }

    fn sweep(&self, train: &Train) -> CalcResult<SafetySeries> {
        let positions = self.positions()?;
        let mut series = SafetySeries::with_capacity(positions.len());
        for x in positions {
            let factors = self
                .bridge
                .safety_factors_under(&train.placed_at(x), &self.material)?;
            series.push(x, &factors);
        }
        Ok(series)
    }

    fn sweep_at_load(&self, total_load_n: f64) -> CalcResult<SafetySeries> {
        self.sweep(&self.bridge.train().with_total_load(total_load_n)?)
    }

    /// Safety factors at every admissible train position, starting with the
    /// leading wheel on the left support
    pub fn pass_the_train(&self) -> CalcResult<SafetySeries> {
        self.sweep(self.bridge.train())
    }

    /// Dead zones of a sweep at this evaluator's threshold
    pub fn dead_zones(&self, series: &SafetySeries) -> Vec<DeadZone> {
        dead_zones(&series.positions_mm, &series.all(), self.threshold)
    }

    /// Dead zones with the train load rescaled to `total_load_n`
    pub fn dead_zones_at_load(&self, total_load_n: f64) -> CalcResult<Vec<DeadZone>> {
        let series = self.sweep_at_load(total_load_n)?;
        Ok(dead_zones(&series.positions_mm, &series.all(), FAILURE_FACTOR))
    }

    /// Largest total train load with every safety factor at least 1 at every
    /// position, and the modes that limit it.
    ///
    /// # Errors
    ///
    /// [`CalcError::NonConvergence`] when no mode is loaded by the train or
    /// the load cannot be bracketed.
    pub fn maximum_load(&self) -> CalcResult<MaximumLoad> {
        let unit = self.sweep_at_load(1.0)?;
        let mode_limits_n = unit.mode_minimums();
        let candidate = mode_limits_n.min();
        if !candidate.is_finite() || candidate <= 0.0 {
            return Err(CalcError::non_convergence(
                "maximum load",
                format!("unit-load sweep gave a minimum safety factor of {}", candidate),
            ));
        }

        let lo = candidate * (1.0 - MAXIMUM_LOAD_BRACKET);
        let hi = candidate * (1.0 + MAXIMUM_LOAD_BRACKET);
        let lo_series = self.sweep_at_load(lo)?;
        let (load_n, series) = if is_safe(&lo_series) && !is_safe(&self.sweep_at_load(hi)?) {
            (lo, lo_series)
        } else {
            debug!(
                "Maximum load candidate {:.6} N not confirmed, bisecting",
                candidate
            );
            self.bisect_maximum_load(candidate)?
        };

        // Causes come from one position; per-mode minima may sit elsewhere
        let causes = series.critical_causes();
        let critical_position_mm = series.critical_position().map_or(0.0, |(x, _)| x);
        debug!(
            "Maximum load {:.6} N at position {} mm ({:?})",
            load_n, critical_position_mm, causes
        );

        Ok(MaximumLoad {
            load_n,
            causes,
            critical_position_mm,
            mode_limits_n,
        })
    }

    fn bisect_maximum_load(&self, candidate: f64) -> CalcResult<(f64, SafetySeries)> {
        let mut safe: Option<(f64, SafetySeries)> = None;
        let mut hi = candidate;

        let mut expansions = 0;
        loop {
            let series = self.sweep_at_load(hi)?;
            if !is_safe(&series) {
                break;
            }
            safe = Some((hi, series));
            hi *= 2.0;
            expansions += 1;
            if expansions > MAX_EXPANSIONS {
                return Err(CalcError::non_convergence(
                    "maximum load",
                    format!("still safe at {} N", hi),
                ));
            }
        }

        let mut lo = safe.as_ref().map_or(0.0, |(load, _)| *load);
        for _ in 0..MAX_BISECTIONS {
            if hi - lo <= MAXIMUM_LOAD_BRACKET * hi {
                break;
            }
            let mid = 0.5 * (lo + hi);
            let series = self.sweep_at_load(mid)?;
            if is_safe(&series) {
                lo = mid;
                safe = Some((mid, series));
            } else {
                hi = mid;
            }
        }

        match safe {
            Some((load, series)) if hi - load <= MAXIMUM_LOAD_BRACKET * hi => Ok((load, series)),
            Some((load, _)) => Err(CalcError::non_convergence(
                "maximum load",
                format!("bracket [{}, {}] N did not close", load, hi),
            )),
            None => Err(CalcError::non_convergence(
                "maximum load",
                "no positive train load is safe",
            )),
        }
    }

    /// Largest `|V|` and `|M|` at span positions `resolution_mm` apart over
    /// every train position
    pub fn force_envelope(&self, resolution_mm: f64) -> CalcResult<ForceEnvelope> {
        require_positive("resolution_mm", resolution_mm)?;
        let span = self.bridge.span();
        let count = (span / resolution_mm + 1e-9).floor() as usize;
        let mut xs: Vec<f64> = (0..=count).map(|i| i as f64 * resolution_mm).collect();
        if xs.last().map_or(true, |&x| x < span) {
            xs.push(span);
        }

        let mut envelope = ForceEnvelope {
            max_shear_n: vec![0.0; xs.len()],
            max_moment_nmm: vec![0.0; xs.len()],
            positions_mm: xs,
        };
        for position in self.positions()? {
            let beam = self
                .bridge
                .beam_under(&self.bridge.train().placed_at(position))?;
            for (i, &x) in envelope.positions_mm.iter().enumerate() {
                let v = beam.shear_left_of(x).abs().max(beam.shear_at(x).abs());
                let m = beam.moment_at(x).abs();
                envelope.max_shear_n[i] = envelope.max_shear_n[i].max(v);
                envelope.max_moment_nmm[i] = envelope.max_moment_nmm[i].max(m);
            }
        }
        Ok(envelope)
    }
}

fn is_safe(series: &SafetySeries) -> bool {
    series.mode_minimums().min() >= FAILURE_FACTOR
}
