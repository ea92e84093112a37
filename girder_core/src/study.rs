//! # Study Documents
//!
//! A `Study` is the root container for one bridge design problem: the span,
//! train and section, the material, sweep settings and an optional parameter
//! search. Studies serialize to `.girder` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Study
//! ├── meta: StudyMeta (schema version, author, title, timestamps)
//! ├── bridge: BridgeConfig (span, train, section, diaphragms)
//! ├── material: Material
//! ├── evaluation: EvaluationSettings (threshold, steps)
//! └── search: Option<SearchConfig> (ranges, strategy, constraint)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use girder_core::study::Study;
//!
//! let study = Study::new("A. Student", "Bridge 1");
//! let json = serde_json::to_string_pretty(&study).unwrap();
//!
//! let roundtrip: Study = serde_json::from_str(&json).unwrap();
//! assert_eq!(roundtrip.bridge, study.bridge);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::bridge::{BeamBridge, DEFAULT_STATION_SPACING_MM};
use crate::errors::{CalcError, CalcResult};
use crate::evaluation::Evaluator;
use crate::geometry::{hollow_box, i_beam, BoxGirder, CrossSection};
use crate::loads::Train;
use crate::materials::Material;
use crate::optimization::{
    Assignment, Constraint, MatboardBudget, MaximumLoadObjective, Objective, ParameterRange,
    Search, SearchSpace, Strategy,
};

/// Current schema version for study files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default span between supports (mm)
pub const DEFAULT_SPAN_MM: f64 = 1200.0;

/// Root study container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Study {
    pub meta: StudyMeta,
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub evaluation: EvaluationSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,
}

impl Study {
    /// New study with the default box girder on a 1200 mm span.
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Study {
            meta: StudyMeta {
                schema_version: SCHEMA_VERSION.to_string(),
                author: author.into(),
                title: title.into(),
                created: now,
                modified: now,
            },
            bridge: BridgeConfig::default(),
            material: Material::matboard(),
            evaluation: EvaluationSettings::default(),
            search: None,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Build the bridge described by this study
    pub fn bridge(&self) -> CalcResult<BeamBridge> {
        self.bridge.build(self.evaluation.station_spacing_mm)
    }

    /// Evaluator for the study's bridge, material and sweep settings
    pub fn evaluator(&self) -> CalcResult<Evaluator> {
        Evaluator::new(self.bridge()?, self.material)?
            .with_threshold(self.evaluation.threshold)?
            .with_position_step(self.evaluation.position_step_mm)
    }

    /// Check that every part of the study builds
    pub fn validate(&self) -> CalcResult<()> {
        if let Some(search) = &self.search {
            search.space()?;
        }
        self.evaluator().map(|_| ())
    }

    /// Parameter search over the study's section.
    ///
    /// Each candidate rebuilds the section with the searched parameters and
    /// is scored by its maximum train load.
    ///
    /// # Errors
    ///
    /// The study has no search block, or the block's ranges are invalid.
    pub fn search(&self) -> CalcResult<Search<impl Objective, ConstraintConfig>> {
        let config = self.search.as_ref().ok_or_else(|| {
            CalcError::invalid_input("search", "null", "Study has no search configuration")
        })?;

        let section = self.bridge.section.clone();
        let build = move |a: &Assignment| section.with_parameters(a)?.build();
        let objective = MaximumLoadObjective::new(
            build,
            self.bridge.span_mm,
            self.bridge.train.clone(),
            self.material,
        )
        .with_diaphragm_spacing(self.bridge.diaphragm_spacing_mm)
        .with_position_step(self.evaluation.position_step_mm);

        Ok(Search::new(config.space()?, objective, config.strategy)?
            .with_constraint(config.constraint))
    }
}

/// Study metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMeta {
    /// Schema version (for migration compatibility)
    pub schema_version: String,
    pub author: String,
    pub title: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Span, train and section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Distance between supports (mm)
    pub span_mm: f64,
    #[serde(default)]
    pub train: Train,
    pub section: SectionConfig,
    /// Spacing of diaphragms stiffening the webs (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diaphragm_spacing_mm: Option<f64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            span_mm: DEFAULT_SPAN_MM,
            train: Train::default(),
            section: SectionConfig::BoxGirder(BoxGirder::default()),
            diaphragm_spacing_mm: None,
        }
    }
}

impl BridgeConfig {
    fn build(&self, station_spacing_mm: f64) -> CalcResult<BeamBridge> {
        BeamBridge::new(self.span_mm, self.train.clone(), self.section.build()?)?
            .with_diaphragm_spacing(self.diaphragm_spacing_mm)?
            .with_station_spacing(station_spacing_mm)
    }
}

/// Cross-section description, by preset or explicit shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionConfig {
    BoxGirder(BoxGirder),
    IBeam {
        depth_mm: f64,
        flange_width_mm: f64,
        flange_thickness_mm: f64,
        web_thickness_mm: f64,
    },
    HollowBox {
        width_mm: f64,
        height_mm: f64,
        thickness_mm: f64,
    },
    /// Shapes, plates and glue joints given explicitly
    Composite(CrossSection),
}

impl SectionConfig {
    /// Build the section
    pub fn build(&self) -> CalcResult<CrossSection> {
        match self {
            SectionConfig::BoxGirder(girder) => girder.build(),
            SectionConfig::IBeam {
                depth_mm,
                flange_width_mm,
                flange_thickness_mm,
                web_thickness_mm,
            } => i_beam(*depth_mm, *flange_width_mm, *flange_thickness_mm, *web_thickness_mm),
            SectionConfig::HollowBox {
                width_mm,
                height_mm,
                thickness_mm,
            } => hollow_box(*width_mm, *height_mm, *thickness_mm),
            SectionConfig::Composite(section) => Ok(section.clone()),
        }
    }

    /// Copy with the named dimensions replaced.
    ///
    /// # Errors
    ///
    /// A name that is not a dimension of this section. Composite sections
    /// have no named dimensions.
    pub fn with_parameters(&self, parameters: &Assignment) -> CalcResult<SectionConfig> {
        let mut config = self.clone();
        for (name, &value) in parameters {
            let slot = config.dimension_mut(name).ok_or_else(|| {
                CalcError::invalid_input(
                    name,
                    value.to_string(),
                    "Not a dimension of this section type",
                )
            })?;
            *slot = value;
        }
        Ok(config)
    }

    fn dimension_mut(&mut self, name: &str) -> Option<&mut f64> {
        match self {
            SectionConfig::BoxGirder(girder) => match name {
                "top_mm" => Some(&mut girder.top_mm),
                "bottom_mm" => Some(&mut girder.bottom_mm),
                "height_mm" => Some(&mut girder.height_mm),
                "thickness_mm" => Some(&mut girder.thickness_mm),
                "outreach_mm" => Some(&mut girder.outreach_mm),
                _ => None,
            },
            SectionConfig::IBeam {
                depth_mm,
                flange_width_mm,
                flange_thickness_mm,
                web_thickness_mm,
            } => match name {
                "depth_mm" => Some(depth_mm),
                "flange_width_mm" => Some(flange_width_mm),
                "flange_thickness_mm" => Some(flange_thickness_mm),
                "web_thickness_mm" => Some(web_thickness_mm),
                _ => None,
            },
            SectionConfig::HollowBox {
                width_mm,
                height_mm,
                thickness_mm,
            } => match name {
                "width_mm" => Some(width_mm),
                "height_mm" => Some(height_mm),
                "thickness_mm" => Some(thickness_mm),
                _ => None,
            },
            SectionConfig::Composite(_) => None,
        }
    }
}

/// Train sweep settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Safety factor below which a position is a dead zone
    pub threshold: f64,
    /// Leading-wheel position step (mm)
    pub position_step_mm: f64,
    /// Check station spacing on position-varying sections (mm)
    pub station_spacing_mm: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        EvaluationSettings {
            threshold: 1.0,
            position_step_mm: 1.0,
            station_spacing_mm: DEFAULT_STATION_SPACING_MM,
        }
    }
}

/// Built-in constraint selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintConfig {
    #[default]
    Unconstrained,
    MatboardBudget(MatboardBudget),
}

impl Constraint for ConstraintConfig {
    fn resolve(&self, candidate: Assignment) -> Option<Assignment> {
        match self {
            ConstraintConfig::Unconstrained => Some(candidate),
            ConstraintConfig::MatboardBudget(budget) => budget.resolve(candidate),
        }
    }
}

/// Parameter search over the section's named dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub ranges: BTreeMap<String, ParameterRange>,
    /// Searched parameters; the rest stay at their low value. `None`
    /// searches them all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub independent: Option<Vec<String>>,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub constraint: ConstraintConfig,
}

impl SearchConfig {
    /// Validated search space
    pub fn space(&self) -> CalcResult<SearchSpace> {
        let space = SearchSpace::new(self.ranges.clone())?;
        match &self.independent {
            Some(names) => space.with_independent(names.iter().cloned()),
            None => Ok(space),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::GridSettings;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    fn range(low: f64, high: f64, step: f64) -> ParameterRange {
        ParameterRange::new(low, high, step).unwrap()
    }

    #[test]
    fn test_study_creation() {
        let study = Study::new("A. Student", "Bridge 1");
        assert_eq!(study.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(study.meta.author, "A. Student");
        assert_eq!(study.bridge.span_mm, 1200.0);
        assert!(study.validate().is_ok());
    }

    #[test]
    fn test_study_json_roundtrip() {
        let mut study = Study::new("A. Student", "Bridge 1");
        study.bridge.diaphragm_spacing_mm = Some(400.0);
        study.search = Some(SearchConfig {
            ranges: [("height_mm".to_string(), range(60.0, 120.0, 10.0))].into(),
            independent: None,
            strategy: Strategy::Grid(GridSettings::default().with_refinements(1)),
            constraint: ConstraintConfig::MatboardBudget(MatboardBudget::default()),
        });

        let json = serde_json::to_string_pretty(&study).unwrap();
        assert!(json.contains("\"type\": \"box_girder\""));
        assert!(json.contains("\"method\": \"grid\""));
        assert!(json.contains("\"kind\": \"matboard_budget\""));

        let roundtrip: Study = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, study);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "meta": {
                "schema_version": "0.1.0",
                "author": "",
                "title": "",
                "created": "2026-01-01T00:00:00Z",
                "modified": "2026-01-01T00:00:00Z"
            },
            "bridge": {
                "span_mm": 1200.0,
                "section": { "type": "hollow_box", "width_mm": 80.0, "height_mm": 100.0, "thickness_mm": 2.0 }
            }
        }"#;
        let study: Study = serde_json::from_str(json).unwrap();
        assert_eq!(study.material, Material::matboard());
        assert_eq!(study.evaluation, EvaluationSettings::default());
        assert_eq!(study.bridge.train, Train::default());
        assert!(study.validate().is_ok());
    }

    #[test]
    fn test_composite_section_config() {
        let section = i_beam(933.0, 423.0, 43.0, 24.0).unwrap();
        let config = SectionConfig::Composite(section.clone());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"type\":\"composite\""));
        assert!(json.contains("\"shapes\""));

        let parsed: SectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.build().unwrap(), section);
    }

    #[test]
    fn test_with_parameters() {
        let config = SectionConfig::BoxGirder(BoxGirder::default());
        let deeper = config
            .with_parameters(&[("height_mm".to_string(), 90.0)].into())
            .unwrap();
        match deeper {
            SectionConfig::BoxGirder(girder) => assert_eq!(girder.height_mm, 90.0),
            _ => panic!("expected box girder"),
        }
        assert!(config
            .with_parameters(&[("depth_mm".to_string(), 90.0)].into())
            .is_err());
    }

    #[test]
    fn test_default_study_maximum_load() {
        let study = Study::new("", "");
        let result = study.evaluator().unwrap().maximum_load().unwrap();
        assert!(approx_eq(result.load_n, 256.09268295834346, 1e-6));
        assert_eq!(result.cause_names(), vec!["flexural buckling"]);
    }

    #[test]
    fn test_search_without_config() {
        assert!(Study::new("", "").search().is_err());
    }

    #[test]
    fn test_study_search_over_height() {
        let mut study = Study::new("", "");
        study.evaluation.position_step_mm = 8.0;
        study.search = Some(SearchConfig {
            ranges: [("height_mm".to_string(), range(75.0, 95.0, 10.0))].into(),
            independent: None,
            strategy: Strategy::default(),
            constraint: ConstraintConfig::Unconstrained,
        });

        let result = study.search().unwrap().run();
        let best = result.best.unwrap();
        assert_eq!(best.assignment["height_mm"], 95.0);
        assert!(approx_eq(best.score, 341.3465214798463, 1e-6));
    }

    #[test]
    fn test_study_search_with_matboard_budget() {
        let mut study = Study::new("", "");
        study.evaluation.position_step_mm = 8.0;
        study.search = Some(SearchConfig {
            ranges: [
                ("top_mm".to_string(), range(120.0, 120.0, 1.0)),
                ("bottom_mm".to_string(), range(100.0, 100.0, 1.0)),
                ("height_mm".to_string(), range(70.0, 80.0, 10.0)),
            ]
            .into(),
            independent: None,
            strategy: Strategy::default(),
            constraint: ConstraintConfig::MatboardBudget(MatboardBudget::default()),
        });

        let result = study.search().unwrap().run();
        assert_eq!(result.stats.evaluations, 2);
        let best = result.best.unwrap();
        assert_eq!(best.assignment["thickness_mm"], 1.27);
        assert!(best.assignment.contains_key("outreach_mm"));
    }
}
