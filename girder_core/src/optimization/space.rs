//! Search space: named parameters with stepped ranges
//!
//! A parameter range `(low, high, step)` covers `low, low + step, ...` up to
//! and including `high` when it lies on the grid. Parameters can be marked
//! independent; the rest are pinned at their low value and left for the
//! constraint to derive.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Parameter name to value, ordered by name
pub type Assignment = BTreeMap<String, f64>;

/// Slack for floating-point grid ends
const GRID_SLACK: f64 = 1e-9;

/// Most values one range may hold
const MAX_GRID_POINTS: f64 = 1e9;

/// Stepped range of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub low: f64,
    pub high: f64,
    pub step: f64,
}

impl ParameterRange {
    /// Create a range, rejecting `low > high` and non-positive steps
    pub fn new(low: f64, high: f64, step: f64) -> CalcResult<Self> {
        let range = ParameterRange { low, high, step };
        range.validate("range")?;
        Ok(range)
    }

    fn validate(&self, name: &str) -> CalcResult<()> {
        if !(self.low.is_finite() && self.high.is_finite() && self.step.is_finite()) {
            return Err(CalcError::invalid_input(
                name,
                format!("({}, {}, {})", self.low, self.high, self.step),
                "Range bounds and step must be finite",
            ));
        }
        if self.low > self.high {
            return Err(CalcError::invalid_input(
                name,
                format!("({}, {})", self.low, self.high),
                "Low bound exceeds high bound",
            ));
        }
        if self.step <= 0.0 {
            return Err(CalcError::invalid_input(
                name,
                self.step.to_string(),
                "Step must be positive",
            ));
        }
        let points = (self.high - self.low) / self.step;
        if !points.is_finite() || points >= MAX_GRID_POINTS {
            return Err(CalcError::invalid_input(
                name,
                format!("({}, {}, {})", self.low, self.high, self.step),
                "Range has too many grid points",
            ));
        }
        Ok(())
    }

    /// Number of grid values
    pub fn len(&self) -> usize {
        ((self.high - self.low) / self.step + GRID_SLACK).floor() as usize + 1
    }

    /// A valid range always holds at least its low value
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `i`-th grid value
    pub fn value(&self, i: usize) -> f64 {
        self.low + i as f64 * self.step
    }

    /// All grid values, ascending
    pub fn values(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.value(i)).collect()
    }

    /// Nearest grid value to `x`, clamped into the range
    pub fn snap(&self, x: f64) -> f64 {
        let i = ((x - self.low) / self.step).round().max(0.0) as usize;
        self.value(i.min(self.len() - 1))
    }

    /// Finer range around `center`: one old step either side, clamped to
    /// `bounds`, with the step divided by `factor`
    pub fn refined(&self, center: f64, factor: f64, bounds: &ParameterRange) -> ParameterRange {
        ParameterRange {
            low: (center - self.step).max(bounds.low),
            high: (center + self.step).min(bounds.high),
            step: self.step / factor,
        }
    }
}

/// Named ranges plus the set of independently searched parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    ranges: BTreeMap<String, ParameterRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    independent: Option<BTreeSet<String>>,
}

impl SearchSpace {
    /// Create a space where every parameter is searched
    pub fn new(ranges: BTreeMap<String, ParameterRange>) -> CalcResult<Self> {
        if ranges.is_empty() {
            return Err(CalcError::invalid_input(
                "ranges",
                "{}",
                "Search space has no parameters",
            ));
        }
        for (name, range) in &ranges {
            range.validate(name)?;
        }
        Ok(SearchSpace {
            ranges,
            independent: None,
        })
    }

    /// Search only `names`; the others stay pinned at their low value
    pub fn with_independent<I, S>(mut self, names: I) -> CalcResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if let Some(unknown) = names.iter().find(|n| !self.ranges.contains_key(*n)) {
            return Err(CalcError::invalid_input(
                "independent",
                unknown.clone(),
                "Not a parameter of the search space",
            ));
        }
        if names.is_empty() {
            return Err(CalcError::invalid_input(
                "independent",
                "[]",
                "At least one parameter must be searched",
            ));
        }
        self.independent = Some(names);
        Ok(self)
    }

    /// All ranges by name
    pub fn ranges(&self) -> &BTreeMap<String, ParameterRange> {
        &self.ranges
    }

    /// Whether `name` is searched rather than pinned
    pub fn is_independent(&self, name: &str) -> bool {
        self.independent
            .as_ref()
            .map_or(self.ranges.contains_key(name), |set| set.contains(name))
    }

    /// Searched parameters and their ranges, ordered by name
    pub fn searched(&self) -> Vec<(String, ParameterRange)> {
        self.ranges
            .iter()
            .filter(|(name, _)| self.is_independent(name))
            .map(|(name, range)| (name.clone(), *range))
            .collect()
    }

    /// Values of the pinned parameters
    pub fn pinned(&self) -> Assignment {
        self.ranges
            .iter()
            .filter(|(name, _)| !self.is_independent(name))
            .map(|(name, range)| (name.clone(), range.low))
            .collect()
    }

    /// Number of raw grid candidates
    pub fn grid_size(&self) -> usize {
        self.searched()
            .iter()
            .map(|(_, r)| r.len())
            .fold(1usize, usize::saturating_mul)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> SearchSpace {
        let mut ranges = BTreeMap::new();
        ranges.insert("top_mm".to_string(), ParameterRange::new(10.0, 30.0, 10.0).unwrap());
        ranges.insert("height_mm".to_string(), ParameterRange::new(1.0, 2.0, 0.25).unwrap());
        ranges.insert("outreach_mm".to_string(), ParameterRange::new(0.0, 9.0, 1.0).unwrap());
        SearchSpace::new(ranges).unwrap()
    }

    #[test]
    fn test_range_values_include_high() {
        let r = ParameterRange::new(10.0, 30.0, 10.0).unwrap();
        assert_eq!(r.values(), vec![10.0, 20.0, 30.0]);
        // 0.1 steps do not land exactly on 0.3 in binary
        let r = ParameterRange::new(0.0, 0.3, 0.1).unwrap();
        assert_eq!(r.len(), 4);
        let r = ParameterRange::new(0.0, 1.0, 0.3).unwrap();
        assert_eq!(r.len(), 4);
        assert!((r.values()[3] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_range_validation() {
        assert!(ParameterRange::new(2.0, 1.0, 1.0).is_err());
        assert!(ParameterRange::new(1.0, 2.0, 0.0).is_err());
        assert!(ParameterRange::new(1.0, 1.0, 1.0).unwrap().len() == 1);
    }

    #[test]
    fn test_range_point_count_is_capped() {
        let err = ParameterRange::new(0.0, 1e30, 1e-10).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(ParameterRange::new(0.0, f64::MAX, f64::MIN_POSITIVE).is_err());
        assert!(ParameterRange::new(0.0, 1e9, 1.0).is_err());

        let wide = ParameterRange::new(0.0, 1e6, 1.0).unwrap();
        assert_eq!(wide.len(), 1_000_001);
    }

    #[test]
    fn test_snap() {
        let r = ParameterRange::new(10.0, 30.0, 10.0).unwrap();
        assert_eq!(r.snap(14.0), 10.0);
        assert_eq!(r.snap(16.0), 20.0);
        assert_eq!(r.snap(-100.0), 10.0);
        assert_eq!(r.snap(100.0), 30.0);
    }

    #[test]
    fn test_refined_is_clamped() {
        let bounds = ParameterRange::new(10.0, 30.0, 10.0).unwrap();
        let fine = bounds.refined(30.0, 4.0, &bounds);
        assert_eq!(fine, ParameterRange { low: 20.0, high: 30.0, step: 2.5 });
        assert_eq!(fine.len(), 5);
    }

    #[test]
    fn test_independent_parameters() {
        let space = space()
            .with_independent(["top_mm", "height_mm"])
            .unwrap();
        assert!(space.is_independent("top_mm"));
        assert!(!space.is_independent("outreach_mm"));
        assert_eq!(space.pinned().get("outreach_mm"), Some(&0.0));
        assert_eq!(space.grid_size(), 3 * 5);

        assert!(self::space().with_independent(["width_mm"]).is_err());
        assert_eq!(self::space().grid_size(), 3 * 5 * 10);
    }
}
