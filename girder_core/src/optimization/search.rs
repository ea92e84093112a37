//! Resumable search driver
//!
//! [`Search`] owns the objective (behind a [`Memoized`] cache), the
//! constraint and the strategy cursor. Each candidate goes
//! raw assignment -> pinned values merged in -> constraint -> cached score.
//! Rejected and failed candidates are skipped; the best candidate only
//! changes on a strictly greater score, so ties keep the first one found.
//!
//! The search can run to completion with [`Search::run`] or be driven in
//! slices with [`Search::advance`], keeping all state between calls.

use serde::{Deserialize, Serialize};

use super::constraints::{Constraint, Unconstrained};
use super::evolution::{EvolutionCursor, EvolutionSettings};
use super::grid::{GridCursor, GridSettings};
use super::objective::{Memoized, Objective};
use super::space::{Assignment, SearchSpace};
use crate::errors::CalcResult;

/// Search strategy and its settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Strategy {
    Grid(GridSettings),
    Evolution(EvolutionSettings),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Grid(GridSettings::default())
    }
}

impl Strategy {
    fn validate(&self) -> CalcResult<()> {
        match self {
            Strategy::Grid(settings) => settings.validate(),
            Strategy::Evolution(settings) => settings.validate(),
        }
    }
}

/// A resolved assignment and its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub assignment: Assignment,
    pub score: f64,
}

/// Candidate bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Raw candidates produced by the strategy
    pub candidates: usize,
    /// Objective runs that produced a score
    pub evaluations: usize,
    /// Scores answered from the memo cache
    pub cache_hits: usize,
    /// Candidates the constraint rejected
    pub rejected: usize,
    /// Objective runs that failed or gave a non-finite score
    pub failed: usize,
}

/// Outcome of a (possibly partial) search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// `None` when no candidate was feasible
    pub best: Option<Candidate>,
    pub stats: SearchStats,
    pub finished: bool,
}

#[derive(Debug, Clone)]
enum Cursor {
    Grid(GridCursor),
    Evolution(EvolutionCursor),
}

/// Search session over a [`SearchSpace`]
pub struct Search<O, C = Unconstrained> {
    space: SearchSpace,
    objective: Memoized<O>,
    constraint: C,
    cursor: Cursor,
    best: Option<Candidate>,
    stats: SearchStats,
}

impl<O: Objective> Search<O, Unconstrained> {
    /// Start an unconstrained search
    pub fn new(space: SearchSpace, objective: O, strategy: Strategy) -> CalcResult<Self> {
        strategy.validate()?;
        let searched = space.searched();
        let cursor = match strategy {
            Strategy::Grid(settings) => Cursor::Grid(GridCursor::new(searched, settings)),
            Strategy::Evolution(settings) => {
                Cursor::Evolution(EvolutionCursor::new(searched, settings))
            }
        };
        log::debug!(
            "Search over {:?} with {:?} ({} grid points)",
            space.ranges().keys().collect::<Vec<_>>(),
            strategy,
            space.grid_size()
        );
        Ok(Search {
            space,
            objective: Memoized::new(objective),
            constraint: Unconstrained,
            cursor,
            best: None,
            stats: SearchStats::default(),
        })
    }
}

impl<O: Objective, C: Constraint> Search<O, C> {
    /// Filter and complete every candidate with `constraint`
    pub fn with_constraint<K: Constraint>(self, constraint: K) -> Search<O, K> {
        Search {
            space: self.space,
            objective: self.objective,
            constraint,
            cursor: self.cursor,
            best: self.best,
            stats: self.stats,
        }
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    /// Best candidate so far
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        match &self.cursor {
            Cursor::Grid(grid) => grid.is_done(),
            Cursor::Evolution(evolution) => evolution.is_done(),
        }
    }

    /// Process up to `budget` candidates. Returns `true` once the strategy
    /// has nothing left to propose.
    pub fn advance(&mut self, budget: usize) -> bool {
        for _ in 0..budget {
            let next = match &mut self.cursor {
                Cursor::Grid(grid) => grid.next(self.best.as_ref()),
                Cursor::Evolution(evolution) => evolution.next(),
            };
            let Some(raw) = next else {
                return true;
            };
            let score = self.consider(raw);
            if let Cursor::Evolution(evolution) = &mut self.cursor {
                evolution.report(score);
            }
        }
        self.is_finished()
    }

    /// Run to completion
    pub fn run(&mut self) -> SearchResult {
        while !self.advance(usize::MAX) {}
        self.result()
    }

    /// Snapshot of the current state
    pub fn result(&self) -> SearchResult {
        SearchResult {
            best: self.best.clone(),
            stats: self.stats,
            finished: self.is_finished(),
        }
    }

    /// Score one raw candidate; `-inf` when it was skipped
    fn consider(&mut self, raw: Assignment) -> f64 {
        self.stats.candidates += 1;

        let mut full = self.space.pinned();
        full.extend(raw);
        let Some(resolved) = self.constraint.resolve(full) else {
            self.stats.rejected += 1;
            return f64::NEG_INFINITY;
        };

        let hits = self.objective.hits();
        match self.objective.score(&resolved) {
            Ok(score) if score.is_finite() => {
                if self.objective.hits() > hits {
                    self.stats.cache_hits += 1;
                } else {
                    self.stats.evaluations += 1;
                }
                if self.best.as_ref().map_or(true, |best| score > best.score) {
                    log::debug!("New best {:.6} at {:?}", score, resolved);
                    self.best = Some(Candidate {
                        assignment: resolved,
                        score,
                    });
                }
                score
            }
            Ok(score) => {
                self.stats.failed += 1;
                log::warn!("Skipping {:?}: score {}", resolved, score);
                f64::NEG_INFINITY
            }
            Err(err) => {
                self.stats.failed += 1;
                log::warn!("Skipping {:?}: {}", resolved, err);
                f64::NEG_INFINITY
            }
        }
    }
}
