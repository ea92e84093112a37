//! # Structural Mechanics Equations
//!
//! Closed-form formulas used by the geometry and safety calculations. Keeping
//! them in one place makes them easy to check against references and keeps
//! the sign conventions documented once.
//!
//! ## Modules
//!
//! - [`section`] - Primitive shape properties (A, I, clipped first moments)
//! - [`buckling`] - Thin-plate critical stresses (flexural and shear)
//!
//! ## Units
//!
//! Millimeters, Newtons and MPa throughout. Nothing is converted internally.
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moment**: Positive causes compression on the top fiber (sagging)
//! - **Shear**: Positive when left side moves up relative to right
//! - **Reactions**: Positive upward

pub mod buckling;
pub mod section;

pub use buckling::{
    plate_buckling_stress,
    shear_buckling_stress,
    INTERNAL_FLANGE_K,
    OUTSTAND_FLANGE_K,
    WEB_FLEXURE_K,
    WEB_SHEAR_K,
};

pub use section::{
    circular_area,
    circular_chord,
    circular_moment_of_inertia,
    circular_segment_above,
    parallel_axis,
    rectangular_area,
    rectangular_moment_of_inertia,
    rectangular_segment_above,
};
