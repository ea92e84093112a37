//! Objectives and the memo cache in front of them
//!
//! An objective scores one resolved assignment; larger is better. Scoring a
//! cross-section means a full train sweep and maximum-load search, so every
//! score is remembered by its exact parameter values and never computed
//! twice.

use std::collections::HashMap;

use super::space::Assignment;
use crate::calculations::bridge::BeamBridge;
use crate::errors::CalcResult;
use crate::evaluation::Evaluator;
use crate::geometry::CrossSection;
use crate::loads::Train;
use crate::materials::Material;

/// Score a resolved assignment
pub trait Objective {
    fn score(&self, assignment: &Assignment) -> CalcResult<f64>;
}

impl<F> Objective for F
where
    F: Fn(&Assignment) -> CalcResult<f64>,
{
    fn score(&self, assignment: &Assignment) -> CalcResult<f64> {
        self(assignment)
    }
}

/// Maximum train load of the section built from the assignment
pub struct MaximumLoadObjective<B> {
    build: B,
    span_mm: f64,
    train: Train,
    material: Material,
    diaphragm_spacing_mm: Option<f64>,
    position_step_mm: f64,
}

impl<B> MaximumLoadObjective<B>
where
    B: Fn(&Assignment) -> CalcResult<CrossSection>,
{
    /// Score sections from `build` on a span with `train` and `material`
    pub fn new(build: B, span_mm: f64, train: Train, material: Material) -> Self {
        MaximumLoadObjective {
            build,
            span_mm,
            train,
            material,
            diaphragm_spacing_mm: None,
            position_step_mm: 1.0,
        }
    }

    /// Diaphragm spacing for shear buckling
    pub fn with_diaphragm_spacing(mut self, spacing_mm: Option<f64>) -> Self {
        self.diaphragm_spacing_mm = spacing_mm;
        self
    }

    /// Train position step of each sweep
    pub fn with_position_step(mut self, step_mm: f64) -> Self {
        self.position_step_mm = step_mm;
        self
    }
}

impl<B> Objective for MaximumLoadObjective<B>
where
    B: Fn(&Assignment) -> CalcResult<CrossSection>,
{
    fn score(&self, assignment: &Assignment) -> CalcResult<f64> {
        let section = (self.build)(assignment)?;
        let bridge = BeamBridge::new(self.span_mm, self.train.clone(), section)?
            .with_diaphragm_spacing(self.diaphragm_spacing_mm)?;
        let evaluator =
            Evaluator::new(bridge, self.material)?.with_position_step(self.position_step_mm)?;
        Ok(evaluator.maximum_load()?.load_n)
    }
}

/// Cache key: names with the exact bit patterns of their values
type MemoKey = Vec<(String, u64)>;

fn memo_key(assignment: &Assignment) -> MemoKey {
    // Adding 0.0 folds -0.0 into 0.0
    assignment
        .iter()
        .map(|(name, value)| (name.clone(), (value + 0.0).to_bits()))
        .collect()
}

/// Objective wrapped with a score cache
pub struct Memoized<O> {
    objective: O,
    cache: HashMap<MemoKey, f64>,
    hits: usize,
    misses: usize,
}

impl<O: Objective> Memoized<O> {
    /// Wrap an objective with an empty cache
    pub fn new(objective: O) -> Self {
        Memoized {
            objective,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached score, computing it on first sight. Failed evaluations are
    /// returned but never cached.
    pub fn score(&mut self, assignment: &Assignment) -> CalcResult<f64> {
        let key = memo_key(assignment);
        if let Some(&score) = self.cache.get(&key) {
            self.hits += 1;
            log::trace!("Memo hit for {:?}", assignment);
            return Ok(score);
        }
        self.misses += 1;
        let score = self.objective.score(assignment)?;
        self.cache.insert(key, score);
        Ok(score)
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that ran the objective (including failed runs)
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Distinct assignments scored successfully
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been scored yet
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;
    use crate::geometry::BoxGirder;
    use std::cell::Cell;

    fn assignment(pairs: &[(&str, f64)]) -> Assignment {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_repeated_assignment_is_computed_once() {
        let calls = Cell::new(0);
        let objective = |a: &Assignment| -> CalcResult<f64> {
            calls.set(calls.get() + 1);
            Ok(a["x"] * 2.0)
        };
        let mut memo = Memoized::new(objective);
        let a = assignment(&[("x", 3.0), ("y", 1.0)]);

        assert_eq!(memo.score(&a).unwrap(), 6.0);
        assert_eq!(memo.score(&a.clone()).unwrap(), 6.0);
        assert_eq!(calls.get(), 1);
        assert_eq!((memo.hits(), memo.misses(), memo.len()), (1, 1, 1));
    }

    #[test]
    fn test_negative_zero_shares_entry() {
        let mut memo = Memoized::new(|_: &Assignment| -> CalcResult<f64> { Ok(1.0) });
        memo.score(&assignment(&[("x", 0.0)])).unwrap();
        memo.score(&assignment(&[("x", -0.0)])).unwrap();
        assert_eq!(memo.hits(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let calls = Cell::new(0);
        let objective = |_: &Assignment| -> CalcResult<f64> {
            calls.set(calls.get() + 1);
            Err(CalcError::invalid_input("x", "1", "boom"))
        };
        let mut memo = Memoized::new(objective);
        let a = assignment(&[("x", 1.0)]);
        assert!(memo.score(&a).is_err());
        assert!(memo.score(&a).is_err());
        assert_eq!(calls.get(), 2);
        assert!(memo.is_empty());
    }

    #[test]
    fn test_maximum_load_objective() {
        let build = |a: &Assignment| {
            BoxGirder {
                height_mm: a["height_mm"],
                ..BoxGirder::default()
            }
            .build()
        };
        let objective =
            MaximumLoadObjective::new(build, 1200.0, Train::default(), Material::matboard())
                .with_position_step(4.0);
        let shallow = objective.score(&assignment(&[("height_mm", 75.0)])).unwrap();
        let deep = objective.score(&assignment(&[("height_mm", 100.0)])).unwrap();
        assert!(shallow > 256.0 && shallow < 257.0);
        assert!(deep > shallow);
        assert!(objective.score(&assignment(&[("height_mm", 1.0)])).is_err());
    }
}
