//! # Structural Calculations
//!
//! The per-position pipeline: point loads become internal forces, internal
//! forces become stresses, stresses become safety factors.
//!
//! ## Available Calculations
//!
//! - [`internal_forces`] - Reactions, shear and moment of a simply supported span
//! - [`safety`] - Stresses and the six safety factors for one section
//! - [`bridge`] - Span + train + section profile, checked as a whole

pub mod bridge;
pub mod internal_forces;
pub mod safety;

// Re-export commonly used types
pub use bridge::{BeamBridge, SectionProfile, VaryingSection, DEFAULT_STATION_SPACING_MM};
pub use internal_forces::{InternalForces, SimplySupportedBeam};
pub use safety::{
    section_safety_factors, section_stresses, FailureMode, SafetyFactors, Stresses,
    CAUSE_TOLERANCE,
};
