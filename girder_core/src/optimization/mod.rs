//! # Optimization
//!
//! Parameter search over cross-section designs.
//!
//! - [`space`] - Named stepped ranges and independent parameters
//! - [`constraints`] - Candidate filters such as the matboard budget
//! - [`objective`] - Scoring and the memo cache
//! - [`grid`] - Multi-resolution grid search
//! - [`evolution`] - Differential evolution
//! - [`search`] - The resumable search driver

pub mod constraints;
pub mod evolution;
pub mod grid;
pub mod objective;
pub mod search;
pub mod space;

pub use constraints::{Constraint, MatboardBudget, Unconstrained, MATBOARD_BUDGET_MM};
pub use evolution::EvolutionSettings;
pub use grid::GridSettings;
pub use objective::{MaximumLoadObjective, Memoized, Objective};
pub use search::{Candidate, Search, SearchResult, SearchStats, Strategy};
pub use space::{Assignment, ParameterRange, SearchSpace};
