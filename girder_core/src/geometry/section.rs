//! # Composite Cross-Sections
//!
//! A [`CrossSection`] is an ordered list of shapes placed at offsets in one
//! global frame whose origin is the bottom-left of the section's bounding box.
//! Shapes are either primitives or whole cross-sections, so sections nest to
//! any depth.
//!
//! Derived geometry (area, centroid, moment of inertia, governing shear cut)
//! is computed once when the section is built. Sections are values: a new
//! parameter set means a new section, never a mutated one.
//!
//! Overlapping shapes are not detected. Their areas simply add up, which is
//! the caller's responsibility to avoid (or to exploit deliberately).
//!
//! ## Example
//!
//! ```rust
//! use girder_core::geometry::{CrossSection, Placement, Primitive};
//!
//! // I-beam assembled from three rectangles
//! let section = CrossSection::new(vec![
//!     Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 0.0),
//!     Placement::primitive(Primitive::rectangle(24.0, 847.0), 199.5, 43.0),
//!     Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 890.0),
//! ])
//! .unwrap();
//!
//! assert!((section.moment_of_inertia() * 1e-6 - 8424.6495395).abs() < 1e-6);
//! assert!((section.q(section.centroid().1) - section.q_max()).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::plates::{GlueJoint, Plate};
use super::primitive::Primitive;
use crate::equations::section::parallel_axis;
use crate::errors::{CalcError, CalcResult};

/// Either a primitive or a nested composite section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "shape")]
pub enum Shape {
    /// Single basic shape
    Primitive(Primitive),
    /// Nested composite section
    Composite(CrossSection),
}

impl Shape {
    /// Area (mm²)
    pub fn area(&self) -> f64 {
        match self {
            Shape::Primitive(p) => p.area(),
            Shape::Composite(cs) => cs.area(),
        }
    }

    /// Centroid in the shape's own frame (mm)
    pub fn centroid(&self) -> (f64, f64) {
        match self {
            Shape::Primitive(p) => p.local_centroid(),
            Shape::Composite(cs) => cs.centroid(),
        }
    }

    /// Moment of inertia about the shape's own horizontal centroidal axis (mm⁴)
    pub fn moment_of_inertia(&self) -> f64 {
        match self {
            Shape::Primitive(p) => p.local_moment_of_inertia(),
            Shape::Composite(cs) => cs.moment_of_inertia(),
        }
    }
}

/// A shape together with its offset in the parent frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub shape: Shape,
    pub x_offset_mm: f64,
    pub y_offset_mm: f64,
}

impl Placement {
    /// Place a primitive
    pub fn primitive(primitive: Primitive, x_offset_mm: f64, y_offset_mm: f64) -> Self {
        Placement {
            shape: Shape::Primitive(primitive),
            x_offset_mm,
            y_offset_mm,
        }
    }

    /// Place a nested section
    pub fn composite(section: CrossSection, x_offset_mm: f64, y_offset_mm: f64) -> Self {
        Placement {
            shape: Shape::Composite(section),
            x_offset_mm,
            y_offset_mm,
        }
    }
}

/// A primitive resolved into the global section frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPrimitive {
    pub primitive: Primitive,
    pub x_mm: f64,
    pub y_mm: f64,
}

/// The horizontal cut that maximizes Q/b, where shear stress peaks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearCut {
    /// Height of the cut (mm)
    pub y_mm: f64,
    /// First moment of area of the material above the cut (mm³)
    pub q_mm3: f64,
    /// Material width carrying the shear at the cut (mm)
    pub width_mm: f64,
}

impl ShearCut {
    /// Q/b at the cut (mm²); multiply by V/I for shear stress
    pub fn q_over_b(&self) -> f64 {
        self.q_mm3 / self.width_mm
    }
}

/// Geometry derived once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    pub area_mm2: f64,
    pub centroid_x_mm: f64,
    pub centroid_y_mm: f64,
    pub moment_of_inertia_mm4: f64,
    pub left_mm: f64,
    pub right_mm: f64,
    pub bottom_mm: f64,
    pub top_mm: f64,
    pub shear_cut: Option<ShearCut>,
}

/// Serialized form of a section: the inputs, never the cached geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SectionSpec {
    shapes: Vec<Placement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    plates: Vec<Plate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    glue_joints: Vec<GlueJoint>,
}

/// A composite cross-section with cached properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionSpec", into = "SectionSpec")]
pub struct CrossSection {
    placements: Vec<Placement>,
    plates: Vec<Plate>,
    glue_joints: Vec<GlueJoint>,
    flat: Vec<PlacedPrimitive>,
    all_plates: Vec<Plate>,
    all_glue_joints: Vec<GlueJoint>,
    properties: SectionProperties,
}

impl CrossSection {
    /// Build a section from placed shapes.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] when the list is empty or a
    /// primitive has a non-positive dimension.
    pub fn new(placements: Vec<Placement>) -> CalcResult<Self> {
        if placements.is_empty() {
            return Err(CalcError::invalid_input(
                "shapes",
                "[]",
                "A cross-section needs at least one shape",
            ));
        }

        let mut flat = Vec::new();
        for placement in &placements {
            match &placement.shape {
                Shape::Primitive(p) => {
                    p.validate()?;
                    flat.push(PlacedPrimitive {
                        primitive: *p,
                        x_mm: placement.x_offset_mm,
                        y_mm: placement.y_offset_mm,
                    });
                }
                Shape::Composite(cs) => {
                    flat.extend(cs.flat.iter().map(|inner| PlacedPrimitive {
                        primitive: inner.primitive,
                        x_mm: inner.x_mm + placement.x_offset_mm,
                        y_mm: inner.y_mm + placement.y_offset_mm,
                    }));
                }
            }
        }

        let properties = compute_properties(&flat);
        let mut section = CrossSection {
            placements,
            plates: Vec::new(),
            glue_joints: Vec::new(),
            flat,
            all_plates: Vec::new(),
            all_glue_joints: Vec::new(),
            properties,
        };
        section.collect_descriptors();
        Ok(section)
    }

    /// Section made of one primitive at the origin
    pub fn single(primitive: Primitive) -> CalcResult<Self> {
        CrossSection::new(vec![Placement::primitive(primitive, 0.0, 0.0)])
    }

    /// Declare the thin plates of this section (replaces earlier declarations)
    pub fn with_plates(mut self, plates: Vec<Plate>) -> Self {
        self.plates = plates;
        self.collect_descriptors();
        self
    }

    /// Declare the glue joints of this section (replaces earlier declarations)
    pub fn with_glue_joints(mut self, glue_joints: Vec<GlueJoint>) -> Self {
        self.glue_joints = glue_joints;
        self.collect_descriptors();
        self
    }

    /// Merge own and nested descriptors into the global frame
    fn collect_descriptors(&mut self) {
        let mut plates = self.plates.clone();
        let mut glue_joints = self.glue_joints.clone();
        for placement in &self.placements {
            if let Shape::Composite(cs) = &placement.shape {
                let dy = placement.y_offset_mm;
                plates.extend(cs.all_plates.iter().map(|p| p.shifted(dy)));
                glue_joints.extend(cs.all_glue_joints.iter().map(|g| g.shifted(dy)));
            }
        }
        self.all_plates = plates;
        self.all_glue_joints = glue_joints;
    }

    /// The placed shapes, in construction order (for visualization)
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Every primitive resolved into the global frame
    pub fn primitives(&self) -> &[PlacedPrimitive] {
        &self.flat
    }

    /// Thin plates, including those declared by nested sections
    pub fn plates(&self) -> &[Plate] {
        &self.all_plates
    }

    /// Glue joints, including those declared by nested sections
    pub fn glue_joints(&self) -> &[GlueJoint] {
        &self.all_glue_joints
    }

    /// Cached derived geometry
    pub fn properties(&self) -> &SectionProperties {
        &self.properties
    }

    /// Total area (mm²)
    pub fn area(&self) -> f64 {
        self.properties.area_mm2
    }

    /// Global centroid `(x̄, ȳ)` (mm)
    pub fn centroid(&self) -> (f64, f64) {
        (self.properties.centroid_x_mm, self.properties.centroid_y_mm)
    }

    /// Second moment of area about the horizontal centroidal axis (mm⁴)
    pub fn moment_of_inertia(&self) -> f64 {
        self.properties.moment_of_inertia_mm4
    }

    /// Bounding-box width (mm)
    pub fn width(&self) -> f64 {
        self.properties.right_mm - self.properties.left_mm
    }

    /// Bounding-box height (mm)
    pub fn height(&self) -> f64 {
        self.properties.top_mm - self.properties.bottom_mm
    }

    /// Distance from the centroid to the top fiber (mm)
    pub fn top_fiber_distance(&self) -> f64 {
        self.properties.top_mm - self.properties.centroid_y_mm
    }

    /// Distance from the centroid to the bottom fiber (mm)
    pub fn bottom_fiber_distance(&self) -> f64 {
        self.properties.centroid_y_mm - self.properties.bottom_mm
    }

    /// First moment of area of the material above height `y` about the
    /// centroidal axis (mm³).
    ///
    /// Cuts at or outside the section's vertical extent return zero.
    pub fn q(&self, y: f64) -> f64 {
        if y <= self.properties.bottom_mm || y >= self.properties.top_mm {
            return 0.0;
        }
        first_moment_above(&self.flat, y, self.properties.centroid_y_mm)
    }

    /// First moment of area at the centroid, the maximum of [`q`](Self::q)
    pub fn q_max(&self) -> f64 {
        self.q(self.properties.centroid_y_mm)
    }

    /// Narrowest non-zero material width at height `y` (mm).
    ///
    /// On an edge between two shapes of different width the narrower side is
    /// returned. Zero means no material crosses the cut.
    pub fn width_at(&self, y: f64) -> f64 {
        width_at(&self.flat, y)
    }

    /// The cut where Q/b peaks, if the section has any interior cut.
    ///
    /// Candidates are the centroid and every interior edge of every shape, so
    /// a thin web away from the centroid is found.
    pub fn governing_shear_cut(&self) -> Option<ShearCut> {
        self.properties.shear_cut
    }
}

impl TryFrom<SectionSpec> for CrossSection {
    type Error = CalcError;

    fn try_from(spec: SectionSpec) -> Result<Self, Self::Error> {
        Ok(CrossSection::new(spec.shapes)?
            .with_plates(spec.plates)
            .with_glue_joints(spec.glue_joints))
    }
}

impl From<CrossSection> for SectionSpec {
    fn from(section: CrossSection) -> Self {
        SectionSpec {
            shapes: section.placements,
            plates: section.plates,
            glue_joints: section.glue_joints,
        }
    }
}

fn compute_properties(flat: &[PlacedPrimitive]) -> SectionProperties {
    let mut area = 0.0;
    let mut moment_x = 0.0;
    let mut moment_y = 0.0;
    let mut left = f64::INFINITY;
    let mut right = f64::NEG_INFINITY;
    let mut bottom = f64::INFINITY;
    let mut top = f64::NEG_INFINITY;

    for placed in flat {
        let a = placed.primitive.area();
        let (cx, cy) = placed.primitive.local_centroid();
        area += a;
        moment_x += a * (placed.x_mm + cx);
        moment_y += a * (placed.y_mm + cy);
        left = left.min(placed.x_mm);
        right = right.max(placed.x_mm + placed.primitive.width());
        bottom = bottom.min(placed.y_mm);
        top = top.max(placed.y_mm + placed.primitive.height());
    }

    let centroid_x = moment_x / area;
    let centroid_y = moment_y / area;

    let moment_of_inertia = flat
        .iter()
        .map(|placed| {
            let (_, cy) = placed.primitive.local_centroid();
            parallel_axis(
                placed.primitive.local_moment_of_inertia(),
                placed.primitive.area(),
                placed.y_mm + cy - centroid_y,
            )
        })
        .sum();

    let shear_cut = governing_cut(flat, centroid_y, bottom, top);

    SectionProperties {
        area_mm2: area,
        centroid_x_mm: centroid_x,
        centroid_y_mm: centroid_y,
        moment_of_inertia_mm4: moment_of_inertia,
        left_mm: left,
        right_mm: right,
        bottom_mm: bottom,
        top_mm: top,
        shear_cut,
    }
}

fn first_moment_above(flat: &[PlacedPrimitive], y: f64, centroid_y: f64) -> f64 {
    flat.iter()
        .map(|placed| {
            let (area, local_centroid) = placed.primitive.segment_above(y - placed.y_mm);
            area * (placed.y_mm + local_centroid - centroid_y)
        })
        .sum()
}

fn width_at(flat: &[PlacedPrimitive], y: f64) -> f64 {
    let (below, above) = flat.iter().fold((0.0, 0.0), |(below, above), placed| {
        let (b, a) = placed.primitive.widths_at(y - placed.y_mm);
        (below + b, above + a)
    });
    match (below > 0.0, above > 0.0) {
        (true, true) => below.min(above),
        (true, false) => below,
        (false, true) => above,
        (false, false) => 0.0,
    }
}

fn governing_cut(
    flat: &[PlacedPrimitive],
    centroid_y: f64,
    bottom: f64,
    top: f64,
) -> Option<ShearCut> {
    let mut candidates = vec![centroid_y];
    for placed in flat {
        candidates.extend(
            placed
                .primitive
                .critical_heights()
                .into_iter()
                .map(|h| placed.y_mm + h),
        );
    }

    let mut best: Option<ShearCut> = None;
    for y in candidates {
        if y <= bottom || y >= top {
            continue;
        }
        let width = width_at(flat, y);
        if width <= 0.0 {
            continue;
        }
        let cut = ShearCut {
            y_mm: y,
            q_mm3: first_moment_above(flat, y, centroid_y),
            width_mm: width,
        };
        // Strictly greater keeps the centroid on ties
        if best.map_or(true, |b| cut.q_over_b() > b.q_over_b()) {
            best = Some(cut);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    fn i_beam_by_hand() -> CrossSection {
        CrossSection::new(vec![
            Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 0.0),
            Placement::primitive(Primitive::rectangle(24.0, 847.0), 199.5, 43.0),
            Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 890.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_primitive_matches_primitive() {
        let rect = Primitive::rectangle(30.0, 12.0);
        let section = CrossSection::single(rect).unwrap();
        assert_eq!(section.moment_of_inertia(), rect.local_moment_of_inertia());
        assert_eq!(section.centroid(), rect.local_centroid());
        assert_eq!(section.area(), rect.area());

        let disk = Primitive::circle(7.0);
        let section = CrossSection::single(disk).unwrap();
        assert_eq!(section.moment_of_inertia(), disk.local_moment_of_inertia());
    }

    #[test]
    fn test_area_and_centroid_are_area_weighted() {
        let section = i_beam_by_hand();
        let areas = [423.0 * 43.0, 24.0 * 847.0, 423.0 * 43.0];
        let centroids = [21.5, 43.0 + 423.5, 890.0 + 21.5];
        let total: f64 = areas.iter().sum();
        let y_bar = areas.iter().zip(centroids).map(|(a, c)| a * c).sum::<f64>() / total;

        assert!(approx_eq(section.area(), total, 1e-12));
        assert!(approx_eq(section.centroid().1, y_bar, 1e-12));
        assert!(approx_eq(section.centroid().0, 211.5, 1e-12));
        assert!(approx_eq(section.height(), 933.0, 1e-12));
    }

    #[test]
    fn test_i_beam_moment_of_inertia() {
        let section = i_beam_by_hand();
        assert!(approx_eq(section.moment_of_inertia() * 1e-6, 8424.6495395, 1e-9));
    }

    #[test]
    fn test_q_peaks_at_centroid() {
        let section = i_beam_by_hand();
        let y_bar = section.centroid().1;
        assert_eq!(section.q(y_bar), section.q_max());
        for i in 1..100 {
            let y = section.height() * i as f64 / 100.0;
            assert!(section.q(y) <= section.q_max() + 1e-6);
        }
    }

    #[test]
    fn test_q_of_rectangle_at_mid_height() {
        // Q = b h² / 8 for a rectangle cut through its centroid
        let section = CrossSection::single(Primitive::rectangle(10.0, 20.0)).unwrap();
        assert!(approx_eq(section.q_max(), 10.0 * 400.0 / 8.0, 1e-12));
    }

    #[test]
    fn test_q_outside_section_is_zero() {
        let section = i_beam_by_hand();
        assert_eq!(section.q(-5.0), 0.0);
        assert_eq!(section.q(0.0), 0.0);
        assert_eq!(section.q(933.0), 0.0);
        assert_eq!(section.q(2000.0), 0.0);
    }

    #[test]
    fn test_width_at_edges_takes_narrow_side() {
        let section = i_beam_by_hand();
        assert_eq!(section.width_at(20.0), 423.0);
        assert_eq!(section.width_at(43.0), 24.0);
        assert_eq!(section.width_at(400.0), 24.0);
        assert_eq!(section.width_at(933.0), 423.0);
        assert_eq!(section.width_at(1000.0), 0.0);
    }

    #[test]
    fn test_governing_cut_is_centroid_for_i_beam() {
        let section = i_beam_by_hand();
        let cut = section.governing_shear_cut().unwrap();
        assert_eq!(cut.y_mm, section.centroid().1);
        assert_eq!(cut.width_mm, 24.0);
    }

    #[test]
    fn test_governing_cut_finds_thin_neck_off_centroid() {
        // Wide block on top of a narrow neck on top of a wide base. The neck
        // sits well below the centroid, yet Q/b is worst there.
        let section = CrossSection::new(vec![
            Placement::primitive(Primitive::rectangle(40.0, 10.0), 0.0, 0.0),
            Placement::primitive(Primitive::rectangle(2.0, 5.0), 19.0, 10.0),
            Placement::primitive(Primitive::rectangle(40.0, 40.0), 0.0, 15.0),
        ])
        .unwrap();
        let y_bar = section.centroid().1;
        assert!(y_bar > 15.0);
        let cut = section.governing_shear_cut().unwrap();
        assert_eq!(cut.width_mm, 2.0);
        assert!(cut.y_mm < y_bar);
        assert!(cut.q_over_b() > section.q_max() / section.width_at(y_bar));
    }

    #[test]
    fn test_overlapping_shapes_double_count() {
        let rect = Primitive::rectangle(10.0, 10.0);
        let section = CrossSection::new(vec![
            Placement::primitive(rect, 0.0, 0.0),
            Placement::primitive(rect, 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(section.area(), 200.0);
    }

    #[test]
    fn test_nested_section_matches_flat_section() {
        let web_and_top = CrossSection::new(vec![
            Placement::primitive(Primitive::rectangle(24.0, 847.0), 199.5, 0.0),
            Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 847.0),
        ])
        .unwrap()
        .with_glue_joints(vec![GlueJoint::new(847.0, 24.0)]);
        let nested = CrossSection::new(vec![
            Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 0.0),
            Placement::composite(web_and_top, 0.0, 43.0),
        ])
        .unwrap();
        let flat = i_beam_by_hand();

        assert!(approx_eq(nested.moment_of_inertia(), flat.moment_of_inertia(), 1e-12));
        assert!(approx_eq(nested.centroid().1, flat.centroid().1, 1e-12));
        assert_eq!(nested.glue_joints(), &[GlueJoint::new(890.0, 24.0)]);
    }

    #[test]
    fn test_empty_section_is_rejected() {
        assert!(CrossSection::new(Vec::new()).is_err());
    }

    #[test]
    fn test_json_keeps_inputs_and_rebuilds_geometry() {
        let section = i_beam_by_hand().with_glue_joints(vec![GlueJoint::new(43.0, 24.0)]);
        let json = serde_json::to_string(&section).unwrap();
        assert!(!json.contains("moment_of_inertia"));
        let back: CrossSection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
    }
}
