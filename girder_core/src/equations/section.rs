//! # Cross-Section Property Formulas
//!
//! Closed-form geometric properties of the primitive shapes that sections are
//! assembled from. All lengths are millimeters; results are mm², mm³, mm⁴.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Moment of inertia (second moment of area) about the shape's own
//!   horizontal centroidal axis
//! - `Q` = First moment of area
//! - `b` = Width of section
//! - `d` = Depth (height) of section
//! - `r` = Radius
//!
//! Local coordinates put the origin at the bottom-left corner of the shape's
//! bounding box, so a cut height `y` runs from `0` (bottom) to `d` or `2r`.
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1
//! - Gere & Goodno, Mechanics of Materials, Appendix E

use std::f64::consts::PI;

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Calculate cross-sectional area for rectangular section
///
/// ```text
///     ┌─────────┐
///     │         │
///   d │         │
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// A = b × d
///
/// # Example
/// ```rust
/// use girder_core::equations::section::rectangular_area;
///
/// let area = rectangular_area(100.0, 1.27);
/// assert!((area - 127.0).abs() < 1e-9);
/// ```
#[inline]
pub fn rectangular_area(b: f64, d: f64) -> f64 {
    b * d
}

/// Calculate moment of inertia for rectangular section about its centroidal axis
///
/// ```text
///     ┌─────────┐
///     │         │
///   d │ ════════│ ← centroidal axis at d/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = bd³/12
///
/// # Example
/// ```rust
/// use girder_core::equations::section::rectangular_moment_of_inertia;
///
/// let i = rectangular_moment_of_inertia(24.0, 847.0);
/// assert!((i - 24.0 * 847.0_f64.powi(3) / 12.0).abs() < 1e-6);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, d: f64) -> f64 {
    b * d.powi(3) / 12.0
}

/// Area and local centroid height of the part of a rectangle above cut `y`.
///
/// The cut is clamped to `[0, d]`, so a cut below the shape returns the whole
/// rectangle and a cut above it returns zero area.
///
/// # Returns
/// `(area, centroid_y)` with `centroid_y` measured from the rectangle bottom
#[inline]
pub fn rectangular_segment_above(b: f64, d: f64, y: f64) -> (f64, f64) {
    let cut = y.clamp(0.0, d);
    let area = b * (d - cut);
    (area, 0.5 * (cut + d))
}

// =============================================================================
// CIRCULAR SECTION PROPERTIES
// =============================================================================

/// Area of a solid circular section: A = πr²
#[inline]
pub fn circular_area(r: f64) -> f64 {
    PI * r * r
}

/// Moment of inertia of a solid circle about a diameter: I = πr⁴/4
#[inline]
pub fn circular_moment_of_inertia(r: f64) -> f64 {
    PI * r.powi(4) / 4.0
}

/// Area and local centroid height of the circular segment above cut `y`.
///
/// ```text
///        ___
///      /#####\   ← segment above the cut
///     |-------|  ← cut at height y, distance c = y - r from the center
///     |       |
///      \_____/
/// ```
///
/// # Formulas
/// - A = r²·acos(c/r) − c·√(r² − c²)
/// - Q about the center = (2/3)·(r² − c²)^(3/2)
///
/// # Returns
/// `(area, centroid_y)` with `centroid_y` measured from the circle bottom
pub fn circular_segment_above(r: f64, y: f64) -> (f64, f64) {
    let c = (y - r).clamp(-r, r);
    let half_chord_sq = (r * r - c * c).max(0.0);
    let area = r * r * (c / r).acos() - c * half_chord_sq.sqrt();
    if area <= 0.0 {
        return (0.0, 2.0 * r);
    }
    let moment_about_center = 2.0 / 3.0 * half_chord_sq.powf(1.5);
    (area, r + moment_about_center / area)
}

/// Chord width of a circle at local height `y` (zero outside the circle).
#[inline]
pub fn circular_chord(r: f64, y: f64) -> f64 {
    let c = y - r;
    if c.abs() >= r {
        0.0
    } else {
        2.0 * (r * r - c * c).sqrt()
    }
}

// =============================================================================
// COMPOSITION
// =============================================================================

/// Transfer a local moment of inertia to a parallel axis at distance `d`.
///
/// # Formula
/// I = I_local + A·d²
#[inline]
pub fn parallel_axis(i_local: f64, area: f64, d: f64) -> f64 {
    i_local + area * d * d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn test_rectangle_segment_clamps() {
        assert_eq!(rectangular_segment_above(10.0, 4.0, -1.0), (40.0, 2.0));
        assert_eq!(rectangular_segment_above(10.0, 4.0, 5.0).0, 0.0);
        let (area, centroid) = rectangular_segment_above(10.0, 4.0, 1.0);
        assert!(approx_eq(area, 30.0, 1e-12));
        assert!(approx_eq(centroid, 2.5, 1e-12));
    }

    #[test]
    fn test_half_circle_segment() {
        // Half disk above the center: centroid at 4r/(3π) above the center
        let r = 10.0;
        let (area, centroid) = circular_segment_above(r, r);
        assert!(approx_eq(area, PI * r * r / 2.0, 1e-12));
        assert!(approx_eq(centroid, r + 4.0 * r / (3.0 * PI), 1e-12));
    }

    #[test]
    fn test_full_and_empty_circle_segment() {
        let (area, centroid) = circular_segment_above(5.0, 0.0);
        assert!(approx_eq(area, circular_area(5.0), 1e-12));
        assert!(approx_eq(centroid, 5.0, 1e-9));
        assert_eq!(circular_segment_above(5.0, 10.0).0, 0.0);
    }

    #[test]
    fn test_chord() {
        assert!(approx_eq(circular_chord(5.0, 5.0), 10.0, 1e-12));
        assert_eq!(circular_chord(5.0, 10.0), 0.0);
        assert_eq!(circular_chord(5.0, -1.0), 0.0);
    }

    #[test]
    fn test_parallel_axis() {
        assert!(approx_eq(parallel_axis(10.0, 2.0, 3.0), 28.0, 1e-12));
    }
}
