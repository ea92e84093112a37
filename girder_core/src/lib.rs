//! # girder_core - Beam Bridge Analysis Engine
//!
//! `girder_core` analyzes a simply supported beam bridge under a moving
//! train: cross-section geometry, internal forces, stresses and six failure
//! modes, train sweeps with dead zones and maximum load, and parameter
//! searches for better sections. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Values, not state**: sections and trains are rebuilt, never mutated
//! - **JSON-First**: study documents and results implement Serialize
//! - **Rich Errors**: structured error types, not just strings
//! - **No I/O**: file handling belongs to the CLI
//!
//! ## Quick Start
//!
//! ```rust
//! use girder_core::study::Study;
//!
//! let study = Study::new("A. Student", "Bridge 1");
//! let evaluator = study.evaluator().unwrap();
//!
//! let max = evaluator.maximum_load().unwrap();
//! assert!(max.load_n > 250.0 && max.load_n < 260.0);
//! assert_eq!(max.cause_names(), vec!["flexural buckling"]);
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Primitives, composite cross-sections and presets
//! - [`equations`] - Closed-form section and plate-buckling formulas
//! - [`materials`] - Strength limits
//! - [`loads`] - Point loads and the train
//! - [`calculations`] - Internal forces, safety factors, the bridge
//! - [`evaluation`] - Train sweeps, dead zones, maximum load
//! - [`optimization`] - Grid and evolutionary section search
//! - [`study`] - Serializable study documents
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod evaluation;
pub mod geometry;
pub mod loads;
pub mod materials;
pub mod optimization;
pub mod study;

// Re-export commonly used types at crate root for convenience
pub use calculations::{BeamBridge, FailureMode, SafetyFactors, SimplySupportedBeam};
pub use errors::{CalcError, CalcResult};
pub use evaluation::{DeadZone, Evaluator, MaximumLoad};
pub use geometry::{BoxGirder, CrossSection};
pub use loads::Train;
pub use materials::Material;
pub use study::Study;
