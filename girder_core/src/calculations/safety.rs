//! # Stress and Safety Factors
//!
//! Turns internal forces at a station into stresses and then into one safety
//! factor per failure mode:
//!
//! | Mode | Demand | Capacity |
//! |------|--------|----------|
//! | Compression | σ = M·c/I on the compressed fiber | compressive strength |
//! | Tension | σ = M·c/I on the tensioned fiber | tensile strength |
//! | Shear | τ = V·Q/(I·b) at the governing cut | shear strength |
//! | Glue shear | τ = V·Q/(I·b) at each glue seam | glue shear strength |
//! | Flexural buckling | σ at each compressed plate | thin-plate σ_cr |
//! | Shear buckling | τ at the governing cut | web τ_cr |
//!
//! A factor is `capacity / demand`. Zero demand gives an infinite factor,
//! which never governs.

use serde::Serialize;

use crate::equations::buckling::{
    plate_buckling_stress, shear_buckling_stress, INTERNAL_FLANGE_K, OUTSTAND_FLANGE_K,
    WEB_FLEXURE_K,
};
use crate::geometry::{CrossSection, Plate};
use crate::materials::Material;

/// Relative tolerance within which two modes both count as the cause
pub const CAUSE_TOLERANCE: f64 = 1e-6;

/// Ways the bridge can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FailureMode {
    Compression,
    Tension,
    Shear,
    GlueShear,
    FlexuralBuckling,
    ShearBuckling,
}

impl FailureMode {
    /// Every mode, in report order
    pub const ALL: [FailureMode; 6] = [
        FailureMode::Compression,
        FailureMode::Tension,
        FailureMode::Shear,
        FailureMode::GlueShear,
        FailureMode::FlexuralBuckling,
        FailureMode::ShearBuckling,
    ];

    /// Stable lowercase name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            FailureMode::Compression => "compression",
            FailureMode::Tension => "tension",
            FailureMode::Shear => "shear",
            FailureMode::GlueShear => "glue shear",
            FailureMode::FlexuralBuckling => "flexural buckling",
            FailureMode::ShearBuckling => "shear buckling",
        }
    }
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One safety factor per failure mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafetyFactors {
    pub compression: f64,
    pub tension: f64,
    pub shear: f64,
    pub glue_shear: f64,
    pub flexural_buckling: f64,
    pub shear_buckling: f64,
}

impl SafetyFactors {
    /// All modes unloaded
    pub const UNLOADED: SafetyFactors = SafetyFactors {
        compression: f64::INFINITY,
        tension: f64::INFINITY,
        shear: f64::INFINITY,
        glue_shear: f64::INFINITY,
        flexural_buckling: f64::INFINITY,
        shear_buckling: f64::INFINITY,
    };

    /// Factor for one mode
    pub fn get(&self, mode: FailureMode) -> f64 {
        match mode {
            FailureMode::Compression => self.compression,
            FailureMode::Tension => self.tension,
            FailureMode::Shear => self.shear,
            FailureMode::GlueShear => self.glue_shear,
            FailureMode::FlexuralBuckling => self.flexural_buckling,
            FailureMode::ShearBuckling => self.shear_buckling,
        }
    }

    /// `(mode, factor)` pairs in report order
    pub fn iter(&self) -> impl Iterator<Item = (FailureMode, f64)> + '_ {
        FailureMode::ALL.iter().map(move |&mode| (mode, self.get(mode)))
    }

    /// Smallest factor across modes
    pub fn min(&self) -> f64 {
        self.iter().map(|(_, f)| f).fold(f64::INFINITY, f64::min)
    }

    /// Modes within [`CAUSE_TOLERANCE`] of the smallest factor. Empty when
    /// nothing is loaded.
    pub fn causes(&self) -> Vec<FailureMode> {
        let min = self.min();
        if !min.is_finite() {
            return Vec::new();
        }
        self.iter()
            .filter(|(_, f)| *f <= min * (1.0 + CAUSE_TOLERANCE))
            .map(|(mode, _)| mode)
            .collect()
    }

    /// Mode-by-mode minimum of two sets
    pub fn min_with(&self, other: &SafetyFactors) -> SafetyFactors {
        SafetyFactors {
            compression: self.compression.min(other.compression),
            tension: self.tension.min(other.tension),
            shear: self.shear.min(other.shear),
            glue_shear: self.glue_shear.min(other.glue_shear),
            flexural_buckling: self.flexural_buckling.min(other.flexural_buckling),
            shear_buckling: self.shear_buckling.min(other.shear_buckling),
        }
    }

    /// Factors after multiplying every load by `load_factor`.
    ///
    /// Stresses are linear in load, so each factor divides by it.
    pub fn at_load_factor(&self, load_factor: f64) -> SafetyFactors {
        let scale = |f: f64| if load_factor > 0.0 { f / load_factor } else { f64::INFINITY };
        SafetyFactors {
            compression: scale(self.compression),
            tension: scale(self.tension),
            shear: scale(self.shear),
            glue_shear: scale(self.glue_shear),
            flexural_buckling: scale(self.flexural_buckling),
            shear_buckling: scale(self.shear_buckling),
        }
    }
}

/// Demand stresses at a station (MPa, magnitudes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Stresses {
    /// Peak normal stress on the compressed fiber
    pub compressive_mpa: f64,
    /// Peak normal stress on the tensioned fiber
    pub tensile_mpa: f64,
    /// Shear stress at the governing cut
    pub shear_mpa: f64,
    /// Largest shear stress across the glue seams
    pub glue_shear_mpa: f64,
}

impl Stresses {
    /// Mode-by-mode maximum of two sets
    pub fn max_with(&self, other: &Stresses) -> Stresses {
        Stresses {
            compressive_mpa: self.compressive_mpa.max(other.compressive_mpa),
            tensile_mpa: self.tensile_mpa.max(other.tensile_mpa),
            shear_mpa: self.shear_mpa.max(other.shear_mpa),
            glue_shear_mpa: self.glue_shear_mpa.max(other.glue_shear_mpa),
        }
    }
}

fn ratio(capacity: f64, demand: f64) -> f64 {
    if demand > 0.0 {
        capacity / demand
    } else {
        f64::INFINITY
    }
}

/// Stresses in `section` under shear `shear_n` (N) and moment `moment_nmm`
/// (N·mm). Positive moment compresses the top fiber.
pub fn section_stresses(section: &CrossSection, shear_n: f64, moment_nmm: f64) -> Stresses {
    let i = section.moment_of_inertia();
    let top = moment_nmm.abs() * section.top_fiber_distance() / i;
    let bottom = moment_nmm.abs() * section.bottom_fiber_distance() / i;
    let (compressive_mpa, tensile_mpa) = if moment_nmm >= 0.0 {
        (top, bottom)
    } else {
        (bottom, top)
    };

    let shear_mpa = section
        .governing_shear_cut()
        .map_or(0.0, |cut| shear_n.abs() * cut.q_over_b() / i);

    let glue_shear_mpa = section
        .glue_joints()
        .iter()
        .map(|joint| shear_n.abs() * section.q(joint.y_mm) / (i * joint.contact_width_mm))
        .fold(0.0, f64::max);

    Stresses {
        compressive_mpa,
        tensile_mpa,
        shear_mpa,
        glue_shear_mpa,
    }
}

/// Compressive stress acting on a plate and the width free to buckle.
/// `None` when the plate is in tension.
fn plate_demand(plate: &Plate, section: &CrossSection, moment_nmm: f64) -> Option<(f64, f64, f64)> {
    let i = section.moment_of_inertia();
    let (_, y_bar) = section.centroid();

    match *plate {
        Plate::Internal {
            thickness_mm,
            width_mm,
            fiber_y_mm,
        }
        | Plate::Outstand {
            thickness_mm,
            width_mm,
            fiber_y_mm,
        } => {
            let sigma = moment_nmm * (fiber_y_mm - y_bar) / i;
            (sigma > 0.0).then_some((sigma, thickness_mm, width_mm))
        }
        Plate::Web {
            thickness_mm,
            bottom_y_mm,
            top_y_mm,
        } => {
            // Compressed part of the web runs from the neutral axis to the
            // web edge on the compression side
            let (sigma, depth) = if moment_nmm >= 0.0 {
                (
                    moment_nmm * (top_y_mm - y_bar) / i,
                    top_y_mm - y_bar.max(bottom_y_mm),
                )
            } else {
                (
                    -moment_nmm * (y_bar - bottom_y_mm) / i,
                    y_bar.min(top_y_mm) - bottom_y_mm,
                )
            };
            (sigma > 0.0 && depth > 0.0).then_some((sigma, thickness_mm, depth))
        }
    }
}

fn buckling_coefficient(plate: &Plate) -> f64 {
    match plate {
        Plate::Internal { .. } => INTERNAL_FLANGE_K,
        Plate::Outstand { .. } => OUTSTAND_FLANGE_K,
        Plate::Web { .. } => WEB_FLEXURE_K,
    }
}

/// Safety factors for one section under `(V, M)`.
///
/// `diaphragm_spacing_mm` is the distance between transverse stiffeners used
/// by shear buckling; `None` treats the webs as unstiffened.
pub fn section_safety_factors(
    section: &CrossSection,
    material: &Material,
    diaphragm_spacing_mm: Option<f64>,
    shear_n: f64,
    moment_nmm: f64,
) -> SafetyFactors {
    let stresses = section_stresses(section, shear_n, moment_nmm);
    let e = material.elastic_modulus_mpa;
    let nu = material.poisson_ratio;

    let flexural_buckling = section
        .plates()
        .iter()
        .filter_map(|plate| {
            plate_demand(plate, section, moment_nmm).map(|(sigma, t, b)| {
                let critical = plate_buckling_stress(buckling_coefficient(plate), e, nu, t, b);
                ratio(critical, sigma)
            })
        })
        .fold(f64::INFINITY, f64::min);

    let shear_buckling = section
        .plates()
        .iter()
        .filter_map(|plate| match *plate {
            Plate::Web {
                thickness_mm,
                bottom_y_mm,
                top_y_mm,
            } => {
                let critical = shear_buckling_stress(
                    e,
                    nu,
                    thickness_mm,
                    top_y_mm - bottom_y_mm,
                    diaphragm_spacing_mm,
                );
                Some(ratio(critical, stresses.shear_mpa))
            }
            _ => None,
        })
        .fold(f64::INFINITY, f64::min);

    SafetyFactors {
        compression: ratio(material.compressive_strength_mpa, stresses.compressive_mpa),
        tension: ratio(material.tensile_strength_mpa, stresses.tensile_mpa),
        shear: ratio(material.shear_strength_mpa, stresses.shear_mpa),
        glue_shear: ratio(material.glue_shear_strength_mpa, stresses.glue_shear_mpa),
        flexural_buckling,
        shear_buckling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxGirder;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    // Train of 452 N with its leading wheel at 172 mm on a 1200 mm span
    const V_MAX: f64 = 239.38009950248758;
    const M_MAX: f64 = 76660.99900497514;

    #[test]
    fn test_default_box_girder_factors() {
        let section = BoxGirder::default().build().unwrap();
        let factors =
            section_safety_factors(&section, &Material::matboard(), None, V_MAX, M_MAX);

        assert!(approx_eq(factors.compression, 0.93984089, 1e-7));
        assert!(approx_eq(factors.tension, 3.95150415, 1e-7));
        assert!(approx_eq(factors.shear, 2.86699399, 1e-7));
        assert!(approx_eq(factors.glue_shear, 10.0902548, 1e-7));
        assert!(approx_eq(factors.flexural_buckling, 0.57719531, 1e-7));
        assert!(approx_eq(factors.shear_buckling, 3.6438713, 1e-7));
        assert_eq!(factors.causes(), vec![FailureMode::FlexuralBuckling]);
    }

    #[test]
    fn test_without_plates_compression_governs() {
        let boxed = BoxGirder::default().build().unwrap();
        let plain = CrossSection::new(boxed.placements().to_vec()).unwrap();
        let factors = section_safety_factors(&plain, &Material::matboard(), None, V_MAX, M_MAX);
        assert!(factors.flexural_buckling.is_infinite());
        assert!(factors.shear_buckling.is_infinite());
        assert!(factors.glue_shear.is_infinite());
        assert_eq!(factors.causes(), vec![FailureMode::Compression]);
    }

    #[test]
    fn test_hogging_moment_swaps_fibers() {
        let section = BoxGirder::default().build().unwrap();
        let sagging = section_stresses(&section, 0.0, 1000.0);
        let hogging = section_stresses(&section, 0.0, -1000.0);
        assert_eq!(sagging.compressive_mpa, hogging.tensile_mpa);
        assert_eq!(sagging.tensile_mpa, hogging.compressive_mpa);
    }

    #[test]
    fn test_diaphragms_raise_shear_buckling_factor() {
        let section = BoxGirder::default().build().unwrap();
        let m = Material::matboard();
        let open = section_safety_factors(&section, &m, None, V_MAX, M_MAX);
        let braced = section_safety_factors(&section, &m, Some(100.0), V_MAX, M_MAX);
        assert!(braced.shear_buckling > open.shear_buckling);
        assert_eq!(braced.shear, open.shear);
    }

    #[test]
    fn test_unloaded_has_no_causes() {
        let section = BoxGirder::default().build().unwrap();
        let factors = section_safety_factors(&section, &Material::matboard(), None, 0.0, 0.0);
        assert_eq!(factors, SafetyFactors::UNLOADED);
        assert!(factors.causes().is_empty());
    }

    #[test]
    fn test_ties_are_all_causes() {
        let factors = SafetyFactors {
            compression: 2.0,
            tension: 5.0,
            shear: 2.0 * (1.0 + 1e-9),
            glue_shear: 2.1,
            ..SafetyFactors::UNLOADED
        };
        assert_eq!(
            factors.causes(),
            vec![FailureMode::Compression, FailureMode::Shear]
        );
    }

    #[test]
    fn test_load_factor_scaling() {
        let unit = SafetyFactors {
            compression: 400.0,
            ..SafetyFactors::UNLOADED
        };
        assert_eq!(unit.at_load_factor(4.0).compression, 100.0);
        assert!(unit.at_load_factor(4.0).shear.is_infinite());
        assert_eq!(unit.min_with(&SafetyFactors::UNLOADED), unit);
    }
}
