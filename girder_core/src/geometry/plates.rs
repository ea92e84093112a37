//! Thin-wall descriptors attached to a cross-section.
//!
//! A section made of thin plates can fail by local buckling or by shear in a
//! glued seam long before the material itself yields. The rectangles alone do
//! not say which walls are free to buckle or where the glue is, so sections
//! carry these descriptors alongside their geometry. Heights are global
//! section coordinates (mm).

use serde::{Deserialize, Serialize};

/// A thin wall that can buckle locally.
///
/// Flange plates are checked against the bending stress at `fiber_y_mm`, the
/// extreme fiber of the flange on the compression side. Webs are checked for
/// flexural buckling over their compressed depth and for shear buckling over
/// their full height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Plate {
    /// Flange restrained by webs along both long edges
    Internal {
        thickness_mm: f64,
        /// Clear distance between the restraining webs
        width_mm: f64,
        fiber_y_mm: f64,
    },
    /// Flange tip projecting past a web with one free edge
    Outstand {
        thickness_mm: f64,
        /// Projection beyond the web
        width_mm: f64,
        fiber_y_mm: f64,
    },
    /// Vertical web between two flanges
    Web {
        thickness_mm: f64,
        bottom_y_mm: f64,
        top_y_mm: f64,
    },
}

impl Plate {
    /// Plate thickness (mm)
    pub fn thickness(&self) -> f64 {
        match self {
            Plate::Internal { thickness_mm, .. }
            | Plate::Outstand { thickness_mm, .. }
            | Plate::Web { thickness_mm, .. } => *thickness_mm,
        }
    }

    /// Same plate moved up by `dy_mm`
    pub fn shifted(&self, dy_mm: f64) -> Self {
        let mut plate = *self;
        match &mut plate {
            Plate::Internal { fiber_y_mm, .. } | Plate::Outstand { fiber_y_mm, .. } => {
                *fiber_y_mm += dy_mm;
            }
            Plate::Web {
                bottom_y_mm,
                top_y_mm,
                ..
            } => {
                *bottom_y_mm += dy_mm;
                *top_y_mm += dy_mm;
            }
        }
        plate
    }

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Plate::Internal { .. } => "internal flange",
            Plate::Outstand { .. } => "outstand flange",
            Plate::Web { .. } => "web",
        }
    }
}

/// A glued seam running along the span at height `y_mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlueJoint {
    /// Height of the seam (mm)
    pub y_mm: f64,
    /// Total glued contact width across the section (mm)
    pub contact_width_mm: f64,
}

impl GlueJoint {
    /// Create a glue joint
    pub const fn new(y_mm: f64, contact_width_mm: f64) -> Self {
        GlueJoint {
            y_mm,
            contact_width_mm,
        }
    }

    /// Same joint moved up by `dy_mm`
    pub fn shifted(&self, dy_mm: f64) -> Self {
        GlueJoint::new(self.y_mm + dy_mm, self.contact_width_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_moves_every_height() {
        let web = Plate::Web {
            thickness_mm: 1.0,
            bottom_y_mm: 1.0,
            top_y_mm: 10.0,
        };
        assert_eq!(
            web.shifted(5.0),
            Plate::Web {
                thickness_mm: 1.0,
                bottom_y_mm: 6.0,
                top_y_mm: 15.0,
            }
        );
        assert_eq!(GlueJoint::new(2.0, 3.0).shifted(1.0), GlueJoint::new(3.0, 3.0));
    }

    #[test]
    fn test_plate_json_tag() {
        let plate = Plate::Outstand {
            thickness_mm: 1.27,
            width_mm: 10.0,
            fiber_y_mm: 76.27,
        };
        let json = serde_json::to_string(&plate).unwrap();
        assert!(json.contains("\"kind\":\"Outstand\""));
    }
}
