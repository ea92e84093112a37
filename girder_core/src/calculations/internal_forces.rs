//! Simply-Supported Span Under Point Loads
//!
//! Reactions, shear force and bending moment for a pin-roller span carrying
//! any number of point loads. With point loads only, `V(x)` is piecewise
//! constant and `M(x)` piecewise linear, so both are fully described by their
//! values at the pivot points: the supports and every load position.
//!
//! ## Sign Convention
//! - Loads positive downward, reactions positive upward
//! - Positive moment: tension on bottom fiber (sagging)
//! - Positive shear: left side up, right side down
//!
//! ## Example
//! ```rust
//! use girder_core::calculations::internal_forces::SimplySupportedBeam;
//! use girder_core::loads::PointLoad;
//!
//! // 1000 mm span with 1000 N at midspan
//! let beam = SimplySupportedBeam::new(1000.0, vec![PointLoad::new(500.0, 1000.0)]).unwrap();
//!
//! let (r1, r2) = beam.reactions();
//! assert_eq!((r1, r2), (500.0, 500.0));
//! // M = PL/4
//! assert!((beam.moment_at(500.0) - 250_000.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};
use crate::loads::PointLoad;

/// Pivot values of the force diagrams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalForces {
    /// Left support reaction (N) - positive upward
    pub reaction_left_n: f64,
    /// Right support reaction (N) - positive upward
    pub reaction_right_n: f64,

    /// Supports and load positions, ascending (mm)
    pub pivots_mm: Vec<f64>,
    /// Shear just right of each pivot (N); zero after the right support
    pub shear_n: Vec<f64>,
    /// Moment at each pivot (N·mm)
    pub moment_nmm: Vec<f64>,

    /// Largest shear magnitude on either side of any pivot (N)
    pub max_shear_n: f64,
    /// Position of the largest shear magnitude (mm)
    pub max_shear_position_mm: f64,
    /// Largest moment magnitude (N·mm)
    pub max_moment_nmm: f64,
    /// Position of the largest moment magnitude (mm)
    pub max_moment_position_mm: f64,
}

/// Pin-roller span with point loads
#[derive(Debug, Clone, PartialEq)]
pub struct SimplySupportedBeam {
    /// Span length (mm)
    span_mm: f64,
    /// Loads on the span, sorted by position
    loads: Vec<PointLoad>,
}

impl SimplySupportedBeam {
    /// Create a span. Loads outside `[0, span]` are dropped.
    pub fn new(span_mm: f64, loads: Vec<PointLoad>) -> CalcResult<Self> {
        require_positive("span_mm", span_mm)?;
        let mut loads: Vec<PointLoad> = loads
            .into_iter()
            .filter(|load| load.is_on_span(span_mm))
            .collect();
        loads.sort_by(|a, b| a.position_mm.total_cmp(&b.position_mm));
        Ok(SimplySupportedBeam { span_mm, loads })
    }

    /// Span length (mm)
    pub fn span(&self) -> f64 {
        self.span_mm
    }

    /// Loads on the span, sorted by position
    pub fn loads(&self) -> &[PointLoad] {
        &self.loads
    }

    /// Left and right support reactions (N)
    pub fn reactions(&self) -> (f64, f64) {
        let left = self.loads.iter().map(|l| l.reaction_left(self.span_mm)).sum();
        let right = self.loads.iter().map(|l| l.reaction_right(self.span_mm)).sum();
        (left, right)
    }

    /// Positions where V jumps or M changes slope: both supports and every
    /// load position, ascending and without duplicates
    pub fn pivots(&self) -> Vec<f64> {
        let mut pivots = Vec::with_capacity(self.loads.len() + 2);
        pivots.push(0.0);
        pivots.extend(self.loads.iter().map(|l| l.position_mm));
        pivots.push(self.span_mm);
        pivots.dedup();
        pivots
    }

    /// Shear just right of `x_mm` (N)
    pub fn shear_at(&self, x_mm: f64) -> f64 {
        if x_mm < 0.0 || x_mm >= self.span_mm {
            return 0.0;
        }
        let (r1, _) = self.reactions();
        r1 - self
            .loads
            .iter()
            .filter(|l| l.position_mm <= x_mm)
            .map(|l| l.magnitude_n)
            .sum::<f64>()
    }

    /// Shear just left of `x_mm` (N)
    pub fn shear_left_of(&self, x_mm: f64) -> f64 {
        if x_mm <= 0.0 || x_mm > self.span_mm {
            return 0.0;
        }
        let (r1, _) = self.reactions();
        r1 - self
            .loads
            .iter()
            .filter(|l| l.position_mm < x_mm)
            .map(|l| l.magnitude_n)
            .sum::<f64>()
    }

    /// Bending moment at `x_mm` (N·mm)
    pub fn moment_at(&self, x_mm: f64) -> f64 {
        if x_mm <= 0.0 || x_mm >= self.span_mm {
            return 0.0;
        }
        let (r1, _) = self.reactions();
        // M(x) = R1·x - Σ P(x - a) over loads left of x
        r1 * x_mm
            - self
                .loads
                .iter()
                .filter(|l| l.position_mm < x_mm)
                .map(|l| l.magnitude_n * (x_mm - l.position_mm))
                .sum::<f64>()
    }

    /// `(x, V)` at every pivot, right-hand values
    pub fn shear_forces(&self) -> Vec<(f64, f64)> {
        self.pivots()
            .into_iter()
            .map(|x| (x, self.shear_at(x)))
            .collect()
    }

    /// `(x, M)` at every pivot
    pub fn bending_moments(&self) -> Vec<(f64, f64)> {
        self.pivots()
            .into_iter()
            .map(|x| (x, self.moment_at(x)))
            .collect()
    }

    /// Sample positions every `resolution_mm` plus every pivot, ascending
    fn sample_positions(&self, resolution_mm: f64) -> Vec<f64> {
        let mut positions = self.pivots();
        if resolution_mm > 0.0 {
            let count = (self.span_mm / resolution_mm).floor() as usize;
            positions.extend((0..=count).map(|i| i as f64 * resolution_mm));
        }
        positions.sort_by(f64::total_cmp);
        positions.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        positions
    }

    /// Shear diagram densified for plotting. Pivots appear twice, with the
    /// left and right values, so jumps draw as vertical lines.
    pub fn expanded_shear_forces(&self, resolution_mm: f64) -> Vec<(f64, f64)> {
        let pivots = self.pivots();
        let mut samples = Vec::new();
        for x in self.sample_positions(resolution_mm) {
            if pivots.contains(&x) {
                samples.push((x, self.shear_left_of(x)));
            }
            samples.push((x, self.shear_at(x)));
        }
        samples
    }

    /// Moment diagram densified for plotting
    pub fn expanded_bending_moments(&self, resolution_mm: f64) -> Vec<(f64, f64)> {
        self.sample_positions(resolution_mm)
            .into_iter()
            .map(|x| (x, self.moment_at(x)))
            .collect()
    }

    /// Largest `|V|` on either side of any pivot and where it occurs
    pub fn max_shear(&self) -> (f64, f64) {
        let mut max = (0.0f64, 0.0);
        for x in self.pivots() {
            let v = self.shear_left_of(x).abs().max(self.shear_at(x).abs());
            if v > max.0 {
                max = (v, x);
            }
        }
        max
    }

    /// Largest `|M|` and where it occurs; always at a pivot
    pub fn max_moment(&self) -> (f64, f64) {
        let mut max = (0.0f64, 0.0);
        for x in self.pivots() {
            let m = self.moment_at(x).abs();
            if m > max.0 {
                max = (m, x);
            }
        }
        max
    }

    /// Full pivot-point analysis
    pub fn analyze(&self) -> InternalForces {
        let (reaction_left_n, reaction_right_n) = self.reactions();
        let pivots_mm = self.pivots();
        let shear_n = pivots_mm.iter().map(|&x| self.shear_at(x)).collect();
        let moment_nmm = pivots_mm.iter().map(|&x| self.moment_at(x)).collect();
        let (max_shear_n, max_shear_position_mm) = self.max_shear();
        let (max_moment_nmm, max_moment_position_mm) = self.max_moment();

        InternalForces {
            reaction_left_n,
            reaction_right_n,
            pivots_mm,
            shear_n,
            moment_nmm,
            max_shear_n,
            max_shear_position_mm,
            max_moment_nmm,
            max_moment_position_mm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::Train;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < 1e-10 {
            a.abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    fn train_at_172() -> SimplySupportedBeam {
        let loads = Train::default().placed_at(172.0).loads_on(1200.0);
        SimplySupportedBeam::new(1200.0, loads).unwrap()
    }

    #[test]
    fn test_midspan_point_load() {
        let beam = SimplySupportedBeam::new(1000.0, vec![PointLoad::new(500.0, 1000.0)]).unwrap();
        assert_eq!(beam.pivots(), vec![0.0, 500.0, 1000.0]);
        assert!(approx_eq(beam.shear_at(100.0), 500.0, EPSILON));
        assert!(approx_eq(beam.shear_at(500.0), -500.0, EPSILON));
        assert!(approx_eq(beam.shear_left_of(500.0), 500.0, EPSILON));
        assert!(approx_eq(beam.moment_at(500.0), 250_000.0, EPSILON));
        assert_eq!(beam.moment_at(0.0), 0.0);
        assert_eq!(beam.moment_at(1000.0), 0.0);
    }

    #[test]
    fn test_train_reactions() {
        let (r1, r2) = train_at_172().reactions();
        assert!(approx_eq(r1, 239.38009950248755, EPSILON));
        assert!(approx_eq(r2, 212.6199004975124, EPSILON));
        assert!(approx_eq(r1 + r2, 452.0, EPSILON));
    }

    #[test]
    fn test_train_pivot_values() {
        let beam = train_at_172();
        let forces = beam.analyze();

        assert_eq!(
            forces.pivots_mm,
            vec![0.0, 172.0, 348.0, 512.0, 688.0, 852.0, 1028.0, 1200.0]
        );
        assert!(approx_eq(forces.shear_n[0], 239.38009950248755, EPSILON));
        assert!(approx_eq(forces.shear_n[6], -212.6199004975124, EPSILON));
        assert_eq!(forces.shear_n[7], 0.0);

        assert!(approx_eq(forces.moment_nmm[1], 41173.37711442786, 1e-9));
        assert!(approx_eq(forces.moment_nmm[3], 76660.99900497514, 1e-9));
        assert!(approx_eq(forces.max_moment_nmm, 76660.99900497514, 1e-9));
        assert_eq!(forces.max_moment_position_mm, 512.0);
        assert!(approx_eq(forces.max_shear_n, 239.38009950248755, EPSILON));
    }

    #[test]
    fn test_integral_of_shear_is_moment() {
        for start in [0.0, 57.0, 172.0, 344.0] {
            let loads = Train::default().placed_at(start).loads_on(1200.0);
            let beam = SimplySupportedBeam::new(1200.0, loads).unwrap();
            let pivots = beam.pivots();
            let mut integral = 0.0;
            for pair in pivots.windows(2) {
                integral += beam.shear_at(pair[0]) * (pair[1] - pair[0]);
                assert!((integral - beam.moment_at(pair[1])).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_loads_off_span_are_ignored() {
        let beam = SimplySupportedBeam::new(
            100.0,
            vec![PointLoad::new(-10.0, 5.0), PointLoad::new(50.0, 10.0), PointLoad::new(120.0, 5.0)],
        )
        .unwrap();
        assert_eq!(beam.loads().len(), 1);
        assert_eq!(beam.reactions(), (5.0, 5.0));
    }

    #[test]
    fn test_load_on_support() {
        let beam = SimplySupportedBeam::new(100.0, vec![PointLoad::new(0.0, 10.0)]).unwrap();
        assert_eq!(beam.pivots(), vec![0.0, 100.0]);
        assert_eq!(beam.reactions(), (10.0, 0.0));
        assert_eq!(beam.shear_at(0.0), 0.0);
        assert_eq!(beam.max_moment().0, 0.0);
    }

    #[test]
    fn test_expanded_diagrams() {
        let beam = SimplySupportedBeam::new(1000.0, vec![PointLoad::new(250.0, 100.0)]).unwrap();
        let moments = beam.expanded_bending_moments(100.0);
        // 0, 100, 200, 250, 300, ..., 1000
        assert_eq!(moments.len(), 12);
        assert!(moments.windows(2).all(|w| w[0].0 < w[1].0));

        let shear = beam.expanded_shear_forces(100.0);
        let jump: Vec<_> = shear.iter().filter(|(x, _)| *x == 250.0).collect();
        assert_eq!(jump.len(), 2);
        assert!(approx_eq(jump[0].1, 75.0, EPSILON));
        assert!(approx_eq(jump[1].1, -25.0, EPSILON));
    }

    #[test]
    fn test_invalid_span() {
        assert!(SimplySupportedBeam::new(0.0, Vec::new()).is_err());
    }
}
