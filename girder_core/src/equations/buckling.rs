//! # Thin-Plate Buckling Formulas
//!
//! Critical stresses for the thin walls of built-up sections. Every plate is
//! treated as a long rectangular plate of thickness `t` and unsupported
//! width `b`, loaded in its own plane.
//!
//! ## Notation
//!
//! - `E` = Modulus of elasticity (MPa)
//! - `ν` = Poisson's ratio
//! - `t` = Plate thickness (mm)
//! - `b` = Unsupported plate width (mm)
//! - `h` = Web height between flanges (mm)
//! - `a` = Distance between transverse diaphragms (mm)
//! - `k` = Plate buckling coefficient for the edge conditions
//!
//! ## Buckling Coefficients
//!
//! | Case | Edges | k |
//! |------|-------|---|
//! | Internal flange | both long edges restrained | 4.0 |
//! | Outstand flange | one long edge free | 0.425 |
//! | Web in flexure | linearly varying compression | 6.0 |
//! | Web in shear | both edges restrained | 5.0 |
//!
//! ## References
//!
//! - Timoshenko & Gere, Theory of Elastic Stability, Ch. 9
//! - CIV102 course notes, thin-walled plate buckling

use std::f64::consts::PI;

/// Coefficient for a flange restrained along both long edges
pub const INTERNAL_FLANGE_K: f64 = 4.0;

/// Coefficient for a flange tip with one free edge
pub const OUTSTAND_FLANGE_K: f64 = 0.425;

/// Coefficient for a web under linearly varying flexural compression
pub const WEB_FLEXURE_K: f64 = 6.0;

/// Coefficient for a web in pure shear
pub const WEB_SHEAR_K: f64 = 5.0;

/// Plate rigidity term π²E / (12(1 − ν²)).
#[inline]
fn plate_rigidity(e: f64, nu: f64) -> f64 {
    PI * PI * e / (12.0 * (1.0 - nu * nu))
}

/// Critical compressive stress of a thin plate
///
/// ```text
///   ┌───────────────────────┐  ↑
///   │                       │  b   (unsupported width)
///   └───────────────────────┘  ↓
///   ← compression →     thickness t
/// ```
///
/// # Formula
/// σ_cr = k·π²E / (12(1 − ν²)) · (t/b)²
///
/// # Example
/// ```rust
/// use girder_core::equations::buckling::{plate_buckling_stress, INTERNAL_FLANGE_K};
///
/// let sigma = plate_buckling_stress(INTERNAL_FLANGE_K, 4000.0, 0.2, 1.27, 77.46);
/// assert!((sigma - 3.685).abs() < 0.01);
/// ```
#[inline]
pub fn plate_buckling_stress(k: f64, e: f64, nu: f64, t: f64, b: f64) -> f64 {
    if b <= 0.0 {
        return f64::INFINITY;
    }
    k * plate_rigidity(e, nu) * (t / b).powi(2)
}

/// Critical shear stress of a web panel
///
/// # Formula
/// τ_cr = 5π²E / (12(1 − ν²)) · ((t/h)² + (t/a)²)
///
/// Without diaphragms (`a = None`) the panel is treated as infinitely long and
/// the `(t/a)²` term drops out.
#[inline]
pub fn shear_buckling_stress(e: f64, nu: f64, t: f64, h: f64, a: Option<f64>) -> f64 {
    if h <= 0.0 {
        return f64::INFINITY;
    }
    let length_term = match a {
        Some(a) if a > 0.0 => (t / a).powi(2),
        _ => 0.0,
    };
    WEB_SHEAR_K * plate_rigidity(e, nu) * ((t / h).powi(2) + length_term)
}
