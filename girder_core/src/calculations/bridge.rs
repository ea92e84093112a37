//! # Beam Bridge
//!
//! A simply supported span, a train on it, and the cross-section carrying
//! the load. The section may be the same everywhere or change along the
//! span; [`SectionProfile`] hides the difference from the checks.
//!
//! ## Stations
//!
//! A uniform section is checked once against the envelope of the largest
//! `|M|` and `|V|` on the span, since every stress grows with them. A varying
//! section is checked at every pivot point and on a station grid, each with
//! its own section, and the smallest factor per mode wins.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::calculations::bridge::BeamBridge;
//! use girder_core::geometry::BoxGirder;
//! use girder_core::loads::Train;
//! use girder_core::materials::Material;
//!
//! let section = BoxGirder::default().build().unwrap();
//! let bridge = BeamBridge::new(1200.0, Train::default().placed_at(172.0), section).unwrap();
//!
//! let factors = bridge.safety_factors(&Material::matboard()).unwrap();
//! assert!(factors.min() < 1.0);
//! ```

use std::borrow::Cow;

use crate::calculations::internal_forces::SimplySupportedBeam;
use crate::calculations::safety::{
    section_safety_factors, section_stresses, SafetyFactors, Stresses,
};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::geometry::CrossSection;
use crate::loads::Train;
use crate::materials::Material;

/// Default spacing of check stations on a varying section (mm)
pub const DEFAULT_STATION_SPACING_MM: f64 = 10.0;

/// Cross-section as a function of span position.
pub trait SectionProfile {
    /// Section at `x_mm` from the left support
    fn section_at(&self, x_mm: f64) -> CalcResult<Cow<'_, CrossSection>>;

    /// Whether every position shares one section
    fn is_uniform(&self) -> bool {
        false
    }
}

impl SectionProfile for CrossSection {
    fn section_at(&self, _x_mm: f64) -> CalcResult<Cow<'_, CrossSection>> {
        Ok(Cow::Borrowed(self))
    }

    fn is_uniform(&self) -> bool {
        true
    }
}

/// Section that changes along the span, built on demand by a closure.
pub struct VaryingSection<F> {
    build: F,
}

impl<F> VaryingSection<F>
where
    F: Fn(f64) -> CalcResult<CrossSection>,
{
    /// Wrap a position-to-section function
    pub fn new(build: F) -> Self {
        VaryingSection { build }
    }
}

impl<F> SectionProfile for VaryingSection<F>
where
    F: Fn(f64) -> CalcResult<CrossSection>,
{
    fn section_at(&self, x_mm: f64) -> CalcResult<Cow<'_, CrossSection>> {
        (self.build)(x_mm).map(Cow::Owned)
    }
}

impl<F> std::fmt::Debug for VaryingSection<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaryingSection")
    }
}

/// Span, train and section together
#[derive(Debug, Clone)]
pub struct BeamBridge<P = CrossSection> {
    span_mm: f64,
    train: Train,
    profile: P,
    diaphragm_spacing_mm: Option<f64>,
    station_spacing_mm: f64,
}

impl<P: SectionProfile> BeamBridge<P> {
    /// Create a bridge
    pub fn new(span_mm: f64, train: Train, profile: P) -> CalcResult<Self> {
        require_positive("span_mm", span_mm)?;
        Ok(BeamBridge {
            span_mm,
            train,
            profile,
            diaphragm_spacing_mm: None,
            station_spacing_mm: DEFAULT_STATION_SPACING_MM,
        })
    }

    /// Stiffen the webs with diaphragms every `spacing_mm`
    pub fn with_diaphragm_spacing(mut self, spacing_mm: Option<f64>) -> CalcResult<Self> {
        if let Some(a) = spacing_mm {
            require_positive("diaphragm_spacing_mm", a)?;
        }
        self.diaphragm_spacing_mm = spacing_mm;
        Ok(self)
    }

    /// Distance between check stations on a varying section
    pub fn with_station_spacing(mut self, spacing_mm: f64) -> CalcResult<Self> {
        require_positive("station_spacing_mm", spacing_mm)?;
        self.station_spacing_mm = spacing_mm;
        Ok(self)
    }

    /// Span length (mm)
    pub fn span(&self) -> f64 {
        self.span_mm
    }

    /// The train in its current position
    pub fn train(&self) -> &Train {
        &self.train
    }

    /// Section profile
    pub fn profile(&self) -> &P {
        &self.profile
    }

    /// Diaphragm spacing (mm), if any
    pub fn diaphragm_spacing(&self) -> Option<f64> {
        self.diaphragm_spacing_mm
    }

    /// Replace the train, keeping span and section
    pub fn set_train(&mut self, train: Train) {
        self.train = train;
    }

    /// Put the leading wheel at `position_mm`
    pub fn place_the_train(&mut self, position_mm: f64) {
        self.train = self.train.placed_at(position_mm);
    }

    /// Move the train along the span by `step_mm`
    pub fn move_the_train(&mut self, step_mm: f64) {
        self.train = self.train.moved_by(step_mm);
    }

    /// Internal force solver for the current train position
    pub fn beam(&self) -> CalcResult<SimplySupportedBeam> {
        self.beam_under(&self.train)
    }

    /// Internal force solver for any train on this span
    pub fn beam_under(&self, train: &Train) -> CalcResult<SimplySupportedBeam> {
        SimplySupportedBeam::new(self.span_mm, train.loads_on(self.span_mm))
    }

    /// Stations to check, each with the governing `(V, M)` there
    fn stations(&self, beam: &SimplySupportedBeam) -> Vec<(f64, f64, f64)> {
        if self.profile.is_uniform() {
            let (v, _) = beam.max_shear();
            let (m, _) = beam.max_moment();
            return vec![(0.0, v, m)];
        }

        let mut positions = beam.pivots();
        let count = (self.span_mm / self.station_spacing_mm).floor() as usize;
        positions.extend((0..=count).map(|i| i as f64 * self.station_spacing_mm));
        positions.sort_by(f64::total_cmp);
        positions.dedup();

        positions
            .into_iter()
            .map(|x| {
                let v = beam.shear_left_of(x).abs().max(beam.shear_at(x).abs());
                (x, v, beam.moment_at(x))
            })
            .collect()
    }

    /// Peak demand stresses for the current train position
    pub fn ultimate_stress(&self) -> CalcResult<Stresses> {
        let beam = self.beam()?;
        let mut peak = Stresses::default();
        for (x, v, m) in self.stations(&beam) {
            let section = self.profile.section_at(x)?;
            peak = peak.max_with(&section_stresses(&section, v, m));
        }
        Ok(peak)
    }

    /// Safety factors for the current train position
    pub fn safety_factors(&self, material: &Material) -> CalcResult<SafetyFactors> {
        self.safety_factors_under(&self.train, material)
    }

    /// Safety factors with `train` on the span instead of the bridge's own
    pub fn safety_factors_under(
        &self,
        train: &Train,
        material: &Material,
    ) -> CalcResult<SafetyFactors> {
        let beam = self.beam_under(train)?;
        let mut factors = SafetyFactors::UNLOADED;
        for (x, v, m) in self.stations(&beam) {
            let section = self.profile.section_at(x)?;
            let here =
                section_safety_factors(&section, material, self.diaphragm_spacing_mm, v, m);
            factors = factors.min_with(&here);
        }
        Ok(factors)
    }

    /// Leading-wheel positions that keep the whole train on the span
    pub fn admissible_positions(&self, step_mm: f64) -> CalcResult<Vec<f64>> {
        self.train.admissible_positions(self.span_mm, step_mm)
    }

    /// Reject a train that can never fit on the span
    pub fn check_train_fits(&self) -> CalcResult<()> {
        if self.train.wheelbase() > self.span_mm {
            return Err(CalcError::InfeasibleTrain {
                wheelbase_mm: self.train.wheelbase(),
                span_mm: self.span_mm,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::safety::FailureMode;
    use crate::geometry::BoxGirder;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    fn default_bridge() -> BeamBridge {
        let section = BoxGirder::default().build().unwrap();
        BeamBridge::new(1200.0, Train::default().placed_at(172.0), section).unwrap()
    }

    #[test]
    fn test_uniform_bridge_factors() {
        let factors = default_bridge().safety_factors(&Material::matboard()).unwrap();
        assert!(approx_eq(factors.compression, 0.93984089, 1e-7));
        assert!(approx_eq(factors.flexural_buckling, 0.57719531, 1e-7));
        assert_eq!(factors.causes(), vec![FailureMode::FlexuralBuckling]);
    }

    #[test]
    fn test_ultimate_stress() {
        let stresses = default_bridge().ultimate_stress().unwrap();
        // σ = M·c/I with c = 76.27 - ȳ
        let expected = 76660.99900497514 * (76.27 - 41.43109435192319) / 418352.20899942366;
        assert!(approx_eq(stresses.compressive_mpa, expected, 1e-9));
        // Bottom fiber sits ȳ below the axis, further than the top fiber
        let tensile = 76660.99900497514 * 41.43109435192319 / 418352.20899942366;
        assert!(approx_eq(stresses.tensile_mpa, tensile, 1e-9));
        assert!(stresses.tensile_mpa > stresses.compressive_mpa);
    }

    #[test]
    fn test_constant_varying_section_matches_uniform() {
        let section = BoxGirder::default().build().unwrap();
        let varying = VaryingSection::new(move |_x| Ok(section.clone()));
        let bridge = BeamBridge::new(1200.0, Train::default().placed_at(172.0), varying).unwrap();

        let varying_factors = bridge.safety_factors(&Material::matboard()).unwrap();
        let uniform_factors = default_bridge().safety_factors(&Material::matboard()).unwrap();
        for mode in FailureMode::ALL {
            assert!(approx_eq(varying_factors.get(mode), uniform_factors.get(mode), 1e-12));
        }
    }

    #[test]
    fn test_deeper_midspan_is_stronger() {
        let varying = VaryingSection::new(|x: f64| {
            let height = if (300.0..=900.0).contains(&x) { 120.0 } else { 75.0 };
            BoxGirder {
                height_mm: height,
                ..BoxGirder::default()
            }
            .build()
        });
        let bridge = BeamBridge::new(1200.0, Train::default().placed_at(172.0), varying).unwrap();
        let deep = bridge.safety_factors(&Material::matboard()).unwrap();
        let shallow = default_bridge().safety_factors(&Material::matboard()).unwrap();
        assert!(deep.compression > shallow.compression);
    }

    #[test]
    fn test_varying_section_errors_propagate() {
        let varying = VaryingSection::new(|_x: f64| {
            BoxGirder {
                height_mm: -1.0,
                ..BoxGirder::default()
            }
            .build()
        });
        let bridge = BeamBridge::new(1200.0, Train::default(), varying).unwrap();
        assert!(bridge.safety_factors(&Material::matboard()).is_err());
    }

    #[test]
    fn test_moving_the_train() {
        let mut bridge = default_bridge();
        bridge.place_the_train(0.0);
        bridge.move_the_train(172.0);
        assert_eq!(bridge.train().leading_position(), 172.0);
        assert!(bridge.with_diaphragm_spacing(Some(0.0)).is_err());
    }

    #[test]
    fn test_train_longer_than_span() {
        let section = BoxGirder::default().build().unwrap();
        let bridge = BeamBridge::new(500.0, Train::default(), section).unwrap();
        assert!(bridge.check_train_fits().is_err());
        assert_eq!(
            bridge.admissible_positions(1.0).unwrap_err().error_code(),
            "INFEASIBLE_TRAIN"
        );
    }
}
