//! Feasibility constraints
//!
//! A constraint sees every raw candidate before it is scored. It either
//! returns the candidate, possibly with extra derived parameters filled in,
//! or rejects it with `None`. Rejection is a skip, never an error.

use serde::{Deserialize, Serialize};

use super::space::Assignment;
use crate::geometry::MATBOARD_THICKNESS_MM;

/// Filter and complete search candidates
pub trait Constraint {
    /// Resolved candidate, or `None` to skip it
    fn resolve(&self, candidate: Assignment) -> Option<Assignment>;
}

impl<F> Constraint for F
where
    F: Fn(Assignment) -> Option<Assignment>,
{
    fn resolve(&self, candidate: Assignment) -> Option<Assignment> {
        self(candidate)
    }
}

/// Accepts every candidate unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl Constraint for Unconstrained {
    fn resolve(&self, candidate: Assignment) -> Option<Assignment> {
        Some(candidate)
    }
}

/// Default width of the matboard sheet available for one girder (mm)
pub const MATBOARD_BUDGET_MM: f64 = 406.5;

/// Box girder cut from one strip of board.
///
/// Fixes `thickness_mm`, charges the top and bottom flanges plus both webs
/// against the board width, and spends what is left on the two glue tabs
/// (`outreach_mm`). Rejects designs that overrun the board, have a top
/// narrower than the bottom, or whose tabs, measured from the outer face of
/// each web, would meet inside the box.
///
/// ```text
///   board used = top + bottom + 2·(height - 2t)
///   outreach   = (board - used) / 2
///   feasible   : 2·(t + outreach) < bottom
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatboardBudget {
    pub board_width_mm: f64,
    pub thickness_mm: f64,
}

impl Default for MatboardBudget {
    fn default() -> Self {
        MatboardBudget {
            board_width_mm: MATBOARD_BUDGET_MM,
            thickness_mm: MATBOARD_THICKNESS_MM,
        }
    }
}

impl Constraint for MatboardBudget {
    fn resolve(&self, mut candidate: Assignment) -> Option<Assignment> {
        let top = *candidate.get("top_mm")?;
        let bottom = *candidate.get("bottom_mm")?;
        let height = *candidate.get("height_mm")?;
        let t = self.thickness_mm;

        let used = top + bottom + 2.0 * (height - 2.0 * t);
        if used > self.board_width_mm || top < bottom {
            return None;
        }
        let outreach = 0.5 * (self.board_width_mm - used);
        if 2.0 * (t + outreach) >= bottom {
            return None;
        }

        candidate.insert("thickness_mm".to_string(), t);
        candidate.insert("outreach_mm".to_string(), outreach);
        Some(candidate)
    }
}
