//! Multi-resolution grid search
//!
//! The first pass walks the full Cartesian product of the searched ranges.
//! Each refinement pass then walks a finer grid spanning one old step either
//! side of the best candidate so far, clamped to the original bounds.
//!
//! ```text
//!   pass 0:  |----|----|----|----|----|      step s
//!                      ^ best
//!   pass 1:       |.|.|.|.|.|.|.|.|         step s / refine_factor
//! ```

use serde::{Deserialize, Serialize};

use super::search::Candidate;
use super::space::{Assignment, ParameterRange};
use crate::errors::{CalcError, CalcResult};

/// Grid search configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Refinement passes after the first (0 = plain grid search)
    #[serde(default)]
    pub refinements: usize,
    /// Step divisor of each refinement pass
    #[serde(default = "default_refine_factor")]
    pub refine_factor: f64,
}

fn default_refine_factor() -> f64 {
    4.0
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            refinements: 0,
            refine_factor: default_refine_factor(),
        }
    }
}

impl GridSettings {
    /// Set the number of refinement passes.
    pub fn with_refinements(mut self, refinements: usize) -> Self {
        self.refinements = refinements;
        self
    }

    /// Set the step divisor of refinement passes.
    pub fn with_refine_factor(mut self, factor: f64) -> Self {
        self.refine_factor = factor;
        self
    }

    pub(crate) fn validate(&self) -> CalcResult<()> {
        if !(self.refine_factor.is_finite() && self.refine_factor > 1.0) {
            return Err(CalcError::invalid_input(
                "refine_factor",
                self.refine_factor.to_string(),
                "Refinement must shrink the step (factor > 1)",
            ));
        }
        Ok(())
    }
}

/// Position in a grid walk
#[derive(Debug, Clone)]
pub(crate) struct GridCursor {
    settings: GridSettings,
    bounds: Vec<(String, ParameterRange)>,
    ranges: Vec<(String, ParameterRange)>,
    odometer: Vec<usize>,
    level: usize,
    level_exhausted: bool,
    done: bool,
}

impl GridCursor {
    pub(crate) fn new(searched: Vec<(String, ParameterRange)>, settings: GridSettings) -> Self {
        GridCursor {
            settings,
            odometer: vec![0; searched.len()],
            ranges: searched.clone(),
            bounds: searched,
            level: 0,
            level_exhausted: false,
            done: false,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    /// Next raw candidate (searched parameters only), or `None` when the
    /// walk is over
    pub(crate) fn next(&mut self, best: Option<&Candidate>) -> Option<Assignment> {
        if self.done {
            return None;
        }
        if self.level_exhausted && !self.refine(best) {
            self.done = true;
            return None;
        }

        let candidate = self
            .ranges
            .iter()
            .zip(&self.odometer)
            .map(|((name, range), &i)| (name.clone(), range.value(i)))
            .collect();
        self.step_odometer();
        Some(candidate)
    }

    /// Last parameter turns fastest
    fn step_odometer(&mut self) {
        for i in (0..self.odometer.len()).rev() {
            self.odometer[i] += 1;
            if self.odometer[i] < self.ranges[i].1.len() {
                return;
            }
            self.odometer[i] = 0;
        }
        self.level_exhausted = true;
    }

    fn refine(&mut self, best: Option<&Candidate>) -> bool {
        let Some(best) = best else {
            return false;
        };
        if self.level >= self.settings.refinements {
            return false;
        }

        self.ranges = self
            .ranges
            .iter()
            .zip(&self.bounds)
            .map(|((name, range), (_, bounds))| {
                let center = best.assignment.get(name).copied().unwrap_or(bounds.low);
                (
                    name.clone(),
                    range.refined(center, self.settings.refine_factor, bounds),
                )
            })
            .collect();
        self.odometer.iter_mut().for_each(|i| *i = 0);
        self.level += 1;
        self.level_exhausted = false;
        log::debug!(
            "Grid refinement {} around score {:.6}: {:?}",
            self.level,
            best.score,
            self.ranges
        );
        true
    }
}
