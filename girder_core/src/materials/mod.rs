//! # Materials
//!
//! Scalar strength limits used to turn stresses into safety factors. A
//! material has no geometry; the section decides where stresses occur and the
//! material decides how much of each the bridge can take.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::materials::Material;
//!
//! let board = Material::matboard();
//! assert_eq!(board.compressive_strength_mpa, 6.0);
//! assert!(board.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};

/// Strength limits and elastic constants (MPa unless noted).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Ultimate compressive stress
    pub compressive_strength_mpa: f64,
    /// Ultimate tensile stress
    pub tensile_strength_mpa: f64,
    /// Ultimate shear stress of the board
    pub shear_strength_mpa: f64,
    /// Ultimate shear stress of a glued seam
    pub glue_shear_strength_mpa: f64,
    /// Modulus of elasticity
    pub elastic_modulus_mpa: f64,
    /// Poisson's ratio (dimensionless)
    pub poisson_ratio: f64,
}

impl Default for Material {
    fn default() -> Self {
        Material::matboard()
    }
}

impl Material {
    /// Matboard as tested for model bridges
    pub const fn matboard() -> Self {
        Material {
            compressive_strength_mpa: 6.0,
            tensile_strength_mpa: 30.0,
            shear_strength_mpa: 4.0,
            glue_shear_strength_mpa: 2.0,
            elastic_modulus_mpa: 4000.0,
            poisson_ratio: 0.2,
        }
    }

    /// Reject non-positive strengths and impossible Poisson ratios
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("compressive_strength_mpa", self.compressive_strength_mpa)?;
        require_positive("tensile_strength_mpa", self.tensile_strength_mpa)?;
        require_positive("shear_strength_mpa", self.shear_strength_mpa)?;
        require_positive("glue_shear_strength_mpa", self.glue_shear_strength_mpa)?;
        require_positive("elastic_modulus_mpa", self.elastic_modulus_mpa)?;

        // ν must stay in (-1, 0.5) for an isotropic plate
        if !(self.poisson_ratio > -1.0 && self.poisson_ratio < 0.5) {
            return Err(CalcError::invalid_input(
                "poisson_ratio",
                self.poisson_ratio.to_string(),
                "Poisson's ratio must lie between -1 and 0.5",
            ));
        }
        Ok(())
    }
}
