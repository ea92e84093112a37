//! # Cross-Section Geometry
//!
//! Primitive shapes, composite sections and the thin-wall descriptors the
//! buckling and glue checks need.
//!
//! ## Modules
//!
//! - [`primitive`] - Rectangle and circle with closed-form properties
//! - [`section`] - Composite [`CrossSection`] with cached centroid, I and Q(y)
//! - [`plates`] - [`Plate`] and [`GlueJoint`] descriptors
//! - [`presets`] - Box girder, I-beam and hollow box constructors
//!
//! ## Coordinates
//!
//! Each section has one global frame with its origin at the bottom-left of
//! the bounding box, `x` to the right and `y` up. All lengths are millimeters.

pub mod plates;
pub mod presets;
pub mod primitive;
pub mod section;

pub use plates::{GlueJoint, Plate};
pub use presets::{hollow_box, i_beam, BoxGirder, MATBOARD_THICKNESS_MM};
pub use primitive::{Circle, Primitive, Rectangle};
pub use section::{CrossSection, PlacedPrimitive, Placement, SectionProperties, Shape, ShearCut};
