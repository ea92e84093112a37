//! # Section Presets
//!
//! Ready-made cross-sections with their thin plates and glue joints declared.
//!
//! ## Box Girder
//!
//! ```text
//!   ┌──────────────────────────────────┐  ← top flange (glued on)
//!   └─────┬─┬────┬──────────┬────┬─┬───┘
//!         │ └────┘ tabs     └────┘ │     ← outreach tabs glued under flange
//!         │                        │
//!    web →│                        │← web
//!         │                        │
//!         └────────────────────────┘     ← bottom flange
//! ```
//!
//! The top flange rests on the webs and on two tabs folded inward from the
//! webs, which gives the glue seam more contact width.

use serde::{Deserialize, Serialize};

use super::plates::{GlueJoint, Plate};
use super::primitive::Primitive;
use super::section::{CrossSection, Placement};
use crate::errors::{require_positive, CalcError, CalcResult};

/// Matboard thickness used by the default box girder (mm)
pub const MATBOARD_THICKNESS_MM: f64 = 1.27;

/// Box girder built from thin board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGirder {
    /// Top flange width (mm)
    pub top_mm: f64,
    /// Bottom flange width, also the outside width of the box (mm)
    pub bottom_mm: f64,
    /// Height from the bottom face to the underside of the top flange (mm)
    pub height_mm: f64,
    /// Board thickness (mm)
    pub thickness_mm: f64,
    /// Width of each glue tab under the top flange (mm)
    pub outreach_mm: f64,
    /// Whether the top flange is glued on (declares the glue seam)
    #[serde(default = "default_glued")]
    pub glued: bool,
}

fn default_glued() -> bool {
    true
}

impl Default for BoxGirder {
    fn default() -> Self {
        BoxGirder {
            top_mm: 100.0,
            bottom_mm: 80.0,
            height_mm: 75.0,
            thickness_mm: MATBOARD_THICKNESS_MM,
            outreach_mm: 5.0,
            glued: true,
        }
    }
}

impl BoxGirder {
    /// Check dimensions before building
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("top_mm", self.top_mm)?;
        require_positive("bottom_mm", self.bottom_mm)?;
        require_positive("height_mm", self.height_mm)?;
        require_positive("thickness_mm", self.thickness_mm)?;

        if !self.outreach_mm.is_finite() || self.outreach_mm < 0.0 {
            return Err(CalcError::invalid_input(
                "outreach_mm",
                self.outreach_mm.to_string(),
                "Outreach cannot be negative",
            ));
        }
        if self.top_mm < self.bottom_mm {
            return Err(CalcError::invalid_input(
                "top_mm",
                self.top_mm.to_string(),
                "Top flange must be at least as wide as the bottom flange",
            ));
        }
        if self.height_mm <= 2.0 * self.thickness_mm {
            return Err(CalcError::invalid_input(
                "height_mm",
                self.height_mm.to_string(),
                "Height must exceed two board thicknesses",
            ));
        }
        if 2.0 * (self.thickness_mm + self.outreach_mm) >= self.bottom_mm {
            return Err(CalcError::invalid_input(
                "outreach_mm",
                self.outreach_mm.to_string(),
                "Glue tabs overlap inside the box",
            ));
        }
        Ok(())
    }

    /// Build the cross-section
    pub fn build(&self) -> CalcResult<CrossSection> {
        self.validate()?;

        let t = self.thickness_mm;
        let o = self.outreach_mm;
        let h = self.height_mm;
        let left = (self.top_mm - self.bottom_mm) / 2.0;
        let right = (self.top_mm + self.bottom_mm) / 2.0;

        let mut shapes = vec![Placement::primitive(
            Primitive::rectangle(self.top_mm, t),
            0.0,
            h,
        )];
        if o > 0.0 {
            shapes.push(Placement::primitive(Primitive::rectangle(o, t), left + t, h - t));
            shapes.push(Placement::primitive(
                Primitive::rectangle(o, t),
                right - t - o,
                h - t,
            ));
        }
        shapes.push(Placement::primitive(Primitive::rectangle(t, h - t), left, t));
        shapes.push(Placement::primitive(Primitive::rectangle(t, h - t), right - t, t));
        shapes.push(Placement::primitive(
            Primitive::rectangle(self.bottom_mm, t),
            left,
            0.0,
        ));

        let mut plates = vec![Plate::Internal {
            thickness_mm: t,
            width_mm: self.bottom_mm - 2.0 * t,
            fiber_y_mm: h + t,
        }];
        if self.top_mm > self.bottom_mm {
            plates.push(Plate::Outstand {
                thickness_mm: t,
                width_mm: left,
                fiber_y_mm: h + t,
            });
        }
        plates.push(Plate::Web {
            thickness_mm: t,
            bottom_y_mm: t,
            top_y_mm: h,
        });

        let glue_joints = if self.glued {
            vec![GlueJoint::new(h, 2.0 * (t + o))]
        } else {
            Vec::new()
        };

        Ok(CrossSection::new(shapes)?
            .with_plates(plates)
            .with_glue_joints(glue_joints))
    }
}

/// I-beam of depth `d`, flange width `bf`, flange thickness `tf` and web
/// thickness `tw`.
///
/// ```rust
/// use girder_core::geometry::presets::i_beam;
///
/// let section = i_beam(933.0, 423.0, 43.0, 24.0).unwrap();
/// assert!((section.moment_of_inertia() * 1e-6 - 8424.6495395).abs() < 1e-6);
/// ```
pub fn i_beam(d: f64, bf: f64, tf: f64, tw: f64) -> CalcResult<CrossSection> {
    require_positive("depth_mm", d)?;
    require_positive("flange_width_mm", bf)?;
    require_positive("flange_thickness_mm", tf)?;
    require_positive("web_thickness_mm", tw)?;
    if d <= 2.0 * tf {
        return Err(CalcError::invalid_input(
            "depth_mm",
            d.to_string(),
            "Depth must exceed both flange thicknesses",
        ));
    }
    if tw > bf {
        return Err(CalcError::invalid_input(
            "web_thickness_mm",
            tw.to_string(),
            "Web cannot be wider than the flanges",
        ));
    }

    let web_height = d - 2.0 * tf;
    let outstand = (bf - tw) / 2.0;
    let section = CrossSection::new(vec![
        Placement::primitive(Primitive::rectangle(bf, tf), 0.0, 0.0),
        Placement::primitive(Primitive::rectangle(tw, web_height), outstand, tf),
        Placement::primitive(Primitive::rectangle(bf, tf), 0.0, d - tf),
    ])?;

    let mut plates = Vec::new();
    if outstand > 0.0 {
        plates.push(Plate::Outstand {
            thickness_mm: tf,
            width_mm: outstand,
            fiber_y_mm: d,
        });
        plates.push(Plate::Outstand {
            thickness_mm: tf,
            width_mm: outstand,
            fiber_y_mm: 0.0,
        });
    }
    plates.push(Plate::Web {
        thickness_mm: tw,
        bottom_y_mm: tf,
        top_y_mm: d - tf,
    });

    Ok(section.with_plates(plates))
}

/// Closed rectangular tube of outside width `b`, outside height `h` and wall
/// thickness `t`.
pub fn hollow_box(b: f64, h: f64, t: f64) -> CalcResult<CrossSection> {
    require_positive("width_mm", b)?;
    require_positive("height_mm", h)?;
    require_positive("thickness_mm", t)?;
    if b <= 2.0 * t || h <= 2.0 * t {
        return Err(CalcError::invalid_input(
            "thickness_mm",
            t.to_string(),
            "Walls leave no hollow core",
        ));
    }

    let section = CrossSection::new(vec![
        Placement::primitive(Primitive::rectangle(b, t), 0.0, 0.0),
        Placement::primitive(Primitive::rectangle(t, h - 2.0 * t), 0.0, t),
        Placement::primitive(Primitive::rectangle(t, h - 2.0 * t), b - t, t),
        Placement::primitive(Primitive::rectangle(b, t), 0.0, h - t),
    ])?;

    Ok(section.with_plates(vec![
        Plate::Internal {
            thickness_mm: t,
            width_mm: b - 2.0 * t,
            fiber_y_mm: h,
        },
        Plate::Internal {
            thickness_mm: t,
            width_mm: b - 2.0 * t,
            fiber_y_mm: 0.0,
        },
        Plate::Web {
            thickness_mm: t,
            bottom_y_mm: t,
            top_y_mm: h - t,
        },
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn test_default_box_girder_properties() {
        let section = BoxGirder::default().build().unwrap();
        let (x_bar, y_bar) = section.centroid();

        assert!(approx_eq(section.area(), 428.5742, 1e-12));
        assert!(approx_eq(x_bar, 50.0, 1e-12));
        assert!(approx_eq(y_bar, 41.43109435192319, 1e-12));
        assert!(approx_eq(section.moment_of_inertia(), 418352.20899942366, 1e-12));
        assert!(approx_eq(section.height(), 76.27, 1e-12));
        assert!(approx_eq(section.q_max(), 6193.283330576357, 1e-12));
    }

    #[test]
    fn test_box_girder_shear_cut_through_both_webs() {
        let section = BoxGirder::default().build().unwrap();
        let cut = section.governing_shear_cut().unwrap();
        assert!(approx_eq(cut.width_mm, 2.54, 1e-12));
        assert!(approx_eq(cut.q_over_b(), 2438.3005238489595, 1e-12));
    }

    #[test]
    fn test_box_girder_descriptors() {
        let section = BoxGirder::default().build().unwrap();
        assert_eq!(section.glue_joints(), &[GlueJoint::new(75.0, 12.54)]);
        assert_eq!(section.plates().len(), 3);
        assert!(matches!(
            section.plates()[0],
            Plate::Internal { width_mm, .. } if approx_eq(width_mm, 77.46, 1e-12)
        ));

        let unglued = BoxGirder {
            glued: false,
            ..BoxGirder::default()
        };
        assert!(unglued.build().unwrap().glue_joints().is_empty());
    }

    #[test]
    fn test_glue_seam_first_moment() {
        let section = BoxGirder::default().build().unwrap();
        let joint = section.glue_joints()[0];
        let q_over_b = section.q(joint.y_mm) / joint.contact_width_mm;
        assert!(approx_eq(q_over_b, 346.4031911727065, 1e-12));
    }

    #[test]
    fn test_box_girder_rejects_bad_dimensions() {
        let narrow_top = BoxGirder {
            top_mm: 70.0,
            ..BoxGirder::default()
        };
        assert!(narrow_top.build().is_err());

        let wide_tabs = BoxGirder {
            outreach_mm: 40.0,
            ..BoxGirder::default()
        };
        assert!(wide_tabs.build().is_err());

        let no_tabs = BoxGirder {
            outreach_mm: 0.0,
            ..BoxGirder::default()
        };
        assert_eq!(no_tabs.build().unwrap().placements().len(), 4);
    }

    #[test]
    fn test_i_beam_shortcut_matches_hand_assembly() {
        let shortcut = i_beam(933.0, 423.0, 43.0, 24.0).unwrap();
        let by_hand = CrossSection::new(vec![
            Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 0.0),
            Placement::primitive(Primitive::rectangle(24.0, 847.0), 199.5, 43.0),
            Placement::primitive(Primitive::rectangle(423.0, 43.0), 0.0, 890.0),
        ])
        .unwrap();
        assert!(approx_eq(shortcut.moment_of_inertia(), by_hand.moment_of_inertia(), 1e-12));
        assert!(approx_eq(shortcut.moment_of_inertia() * 1e-6, 8424.6495395, 1e-9));
    }

    #[test]
    fn test_hollow_box_is_symmetric() {
        let section = hollow_box(50.0, 80.0, 2.0).unwrap();
        assert!(approx_eq(section.centroid().1, 40.0, 1e-12));
        let solid = 50.0 * 80.0f64.powi(3) / 12.0;
        let core = 46.0 * 76.0f64.powi(3) / 12.0;
        assert!(approx_eq(section.moment_of_inertia(), solid - core, 1e-9));
        assert!(hollow_box(3.0, 80.0, 2.0).is_err());
    }
}
