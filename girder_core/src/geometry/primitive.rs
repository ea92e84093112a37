//! Primitive shapes with closed-form properties.
//!
//! Every primitive is described in local coordinates whose origin is the
//! bottom-left corner of its bounding box. Primitives are immutable values.

use serde::{Deserialize, Serialize};

use crate::equations::section::{
    circular_area, circular_chord, circular_moment_of_inertia, circular_segment_above,
    rectangular_area, rectangular_moment_of_inertia, rectangular_segment_above,
};
use crate::errors::{require_positive, CalcResult};

/// Solid rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Horizontal extent (mm)
    pub width_mm: f64,
    /// Vertical extent (mm)
    pub height_mm: f64,
}

impl Rectangle {
    /// Create a rectangle
    pub const fn new(width_mm: f64, height_mm: f64) -> Self {
        Rectangle {
            width_mm,
            height_mm,
        }
    }

    /// Area (mm²)
    pub fn area(&self) -> f64 {
        rectangular_area(self.width_mm, self.height_mm)
    }

    /// Centroid in local coordinates (mm)
    pub fn local_centroid(&self) -> (f64, f64) {
        (self.width_mm * 0.5, self.height_mm * 0.5)
    }

    /// Moment of inertia about the local horizontal centroidal axis (mm⁴)
    pub fn local_moment_of_inertia(&self) -> f64 {
        rectangular_moment_of_inertia(self.width_mm, self.height_mm)
    }
}

/// Solid circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Radius (mm)
    pub radius_mm: f64,
}

impl Circle {
    /// Create a circle
    pub const fn new(radius_mm: f64) -> Self {
        Circle { radius_mm }
    }
}

/// A single basic shape.
///
/// ## JSON
///
/// ```json
/// { "type": "Rectangle", "width_mm": 100.0, "height_mm": 1.27 }
/// { "type": "Circle", "radius_mm": 12.5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Primitive {
    /// Solid rectangle
    Rectangle(Rectangle),
    /// Solid circle
    Circle(Circle),
}

impl Primitive {
    /// Shorthand for a rectangular primitive
    pub const fn rectangle(width_mm: f64, height_mm: f64) -> Self {
        Primitive::Rectangle(Rectangle::new(width_mm, height_mm))
    }

    /// Shorthand for a circular primitive
    pub const fn circle(radius_mm: f64) -> Self {
        Primitive::Circle(Circle::new(radius_mm))
    }

    /// Reject non-positive or non-finite dimensions
    pub fn validate(&self) -> CalcResult<()> {
        match self {
            Primitive::Rectangle(r) => {
                require_positive("width_mm", r.width_mm)?;
                require_positive("height_mm", r.height_mm)
            }
            Primitive::Circle(c) => require_positive("radius_mm", c.radius_mm),
        }
    }

    /// Bounding-box width (mm)
    pub fn width(&self) -> f64 {
        match self {
            Primitive::Rectangle(r) => r.width_mm,
            Primitive::Circle(c) => 2.0 * c.radius_mm,
        }
    }

    /// Bounding-box height (mm)
    pub fn height(&self) -> f64 {
        match self {
            Primitive::Rectangle(r) => r.height_mm,
            Primitive::Circle(c) => 2.0 * c.radius_mm,
        }
    }

    /// Area (mm²)
    pub fn area(&self) -> f64 {
        match self {
            Primitive::Rectangle(r) => r.area(),
            Primitive::Circle(c) => circular_area(c.radius_mm),
        }
    }

    /// Centroid in local coordinates (mm)
    pub fn local_centroid(&self) -> (f64, f64) {
        match self {
            Primitive::Rectangle(r) => r.local_centroid(),
            Primitive::Circle(c) => (c.radius_mm, c.radius_mm),
        }
    }

    /// Moment of inertia about the local horizontal centroidal axis (mm⁴)
    pub fn local_moment_of_inertia(&self) -> f64 {
        match self {
            Primitive::Rectangle(r) => r.local_moment_of_inertia(),
            Primitive::Circle(c) => circular_moment_of_inertia(c.radius_mm),
        }
    }

    /// Area and local centroid height of the material above local cut `y`
    pub fn segment_above(&self, y: f64) -> (f64, f64) {
        match self {
            Primitive::Rectangle(r) => rectangular_segment_above(r.width_mm, r.height_mm, y),
            Primitive::Circle(c) => circular_segment_above(c.radius_mm, y),
        }
    }

    /// Material width just below and just above local cut `y`.
    ///
    /// The two differ only on a horizontal edge of a rectangle.
    pub fn widths_at(&self, y: f64) -> (f64, f64) {
        match self {
            Primitive::Rectangle(r) => {
                let below = if y > 0.0 && y <= r.height_mm { r.width_mm } else { 0.0 };
                let above = if y >= 0.0 && y < r.height_mm { r.width_mm } else { 0.0 };
                (below, above)
            }
            Primitive::Circle(c) => {
                let chord = circular_chord(c.radius_mm, y);
                (chord, chord)
            }
        }
    }

    /// Interior heights where the width of this shape changes abruptly or
    /// where a cut is worth checking for shear
    pub fn critical_heights(&self) -> Vec<f64> {
        match self {
            Primitive::Rectangle(r) => vec![0.0, r.height_mm],
            Primitive::Circle(c) => vec![c.radius_mm],
        }
    }
}

impl From<Rectangle> for Primitive {
    fn from(value: Rectangle) -> Self {
        Primitive::Rectangle(value)
    }
}

impl From<Circle> for Primitive {
    fn from(value: Circle) -> Self {
        Primitive::Circle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_properties() {
        let r = Primitive::rectangle(100.0, 1.27);
        assert!((r.area() - 127.0).abs() < 1e-9);
        assert_eq!(r.local_centroid(), (50.0, 0.635));
        assert!((r.local_moment_of_inertia() - 100.0 * 1.27f64.powi(3) / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_rectangle_edge_widths() {
        let r = Primitive::rectangle(10.0, 2.0);
        assert_eq!(r.widths_at(0.0), (0.0, 10.0));
        assert_eq!(r.widths_at(1.0), (10.0, 10.0));
        assert_eq!(r.widths_at(2.0), (10.0, 0.0));
        assert_eq!(r.widths_at(3.0), (0.0, 0.0));
    }

    #[test]
    fn test_circle_properties() {
        let c = Primitive::circle(2.0);
        assert_eq!(c.width(), 4.0);
        assert_eq!(c.height(), 4.0);
        assert_eq!(c.local_centroid(), (2.0, 2.0));
        let (below, above) = c.widths_at(2.0);
        assert!((below - 4.0).abs() < 1e-12 && (above - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(Primitive::rectangle(1.0, 1.0).validate().is_ok());
        assert!(Primitive::rectangle(0.0, 1.0).validate().is_err());
        assert!(Primitive::circle(-1.0).validate().is_err());
    }
}
