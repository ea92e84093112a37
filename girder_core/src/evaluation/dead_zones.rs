//! Dead-zone scan over safety-factor series
//!
//! A dead zone is a maximal run of consecutive train positions where at least
//! one series falls below the threshold. Runs are reported as closed
//! intervals of position values; on the default 1 mm step these are whole
//! millimetres.

use serde::{Deserialize, Serialize};

/// Closed interval `[start_mm, end_mm]` of leading-wheel positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadZone {
    pub start_mm: f64,
    pub end_mm: f64,
}

impl DeadZone {
    /// Length of the interval (mm); zero for a single position
    pub fn width(&self) -> f64 {
        self.end_mm - self.start_mm
    }

    /// Whether `position_mm` lies inside the interval
    pub fn contains(&self, position_mm: f64) -> bool {
        position_mm >= self.start_mm && position_mm <= self.end_mm
    }
}

/// Find the dead zones of one or more series sampled at `positions`.
///
/// A position is dead when any series is strictly below `threshold` there.
/// Series shorter than `positions` only count where they have values.
///
/// ```rust
/// use girder_core::evaluation::dead_zones;
///
/// let positions = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let compression = [2.0, 0.5, 2.0, 2.0, 2.0];
/// let shear = [2.0, 2.0, 0.9, 2.0, 0.1];
///
/// let zones = dead_zones(&positions, &[&compression, &shear], 1.0);
/// assert_eq!(zones.len(), 2);
/// assert_eq!((zones[0].start_mm, zones[0].end_mm), (1.0, 2.0));
/// assert_eq!((zones[1].start_mm, zones[1].end_mm), (4.0, 4.0));
/// ```
pub fn dead_zones(positions: &[f64], series: &[&[f64]], threshold: f64) -> Vec<DeadZone> {
    let is_dead = |i: usize| {
        series
            .iter()
            .any(|s| s.get(i).is_some_and(|&f| f < threshold))
    };

    let mut zones = Vec::new();
    let mut run_start: Option<usize> = None;
    for i in 0..positions.len() {
        match (is_dead(i), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                zones.push(DeadZone {
                    start_mm: positions[start],
                    end_mm: positions[i - 1],
                });
                run_start = None;
            }
            _ => {}
        }
    }
    if let (Some(start), Some(&last)) = (run_start, positions.last()) {
        zones.push(DeadZone {
            start_mm: positions[start],
            end_mm: last,
        });
    }
    zones
}
