//! Fuselage geometry derived from the outer dimensions

use serde::{Deserialize, Serialize};

use super::require_positive;
use crate::config::FuselageConfig;
use crate::error::RuleError;

/// Longitudinal stations and cross-section of the fuselage [m]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuselageGeometry {
    pub length: f64,
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    pub nose_length: f64,
    pub tail_length: f64,
    pub cylindrical_length: f64,
    /// First seat row may not be forward of this station
    pub cabin_start_x: f64,
    /// Aft limit of the pressurised volume usable for cabin and tanks
    pub aft_limit_x: f64,
    pub tailcone_end_ratio: f64,
}

impl FuselageGeometry {
    /// Length available to cabin plus tanks
    pub fn usable_length(&self) -> f64 {
        self.aft_limit_x - self.cabin_start_x
    }

    /// Station where the tailcone starts tapering
    pub fn tailcone_start_x(&self) -> f64 {
        self.length - self.tail_length
    }

    /// Inner diameter at station `x`, tapering linearly along the tailcone
    pub fn inner_diameter_at(&self, x: f64) -> f64 {
        let start = self.tailcone_start_x();
        if x <= start || self.tail_length <= 0.0 {
            return self.inner_diameter;
        }
        let t = ((x - start) / self.tail_length).min(1.0);
        self.inner_diameter * (1.0 - t * (1.0 - self.tailcone_end_ratio))
    }
}

/// Derive the fuselage geometry from its overall length and outer diameter
pub fn fuselage_geometry(
    length: f64,
    outer_diameter: f64,
    config: &FuselageConfig,
) -> Result<FuselageGeometry, RuleError> {
    require_positive("fuselage.length", length)?;
    require_positive("fuselage.outer_diameter", outer_diameter)?;

    let inner_diameter = outer_diameter - 2.0 * config.skin_thickness;
    if inner_diameter <= 0.0 {
        return Err(RuleError::InvalidGeometry(format!(
            "skin of {} m leaves no inner diameter in a {} m fuselage",
            config.skin_thickness, outer_diameter
        )));
    }

    let cylindrical_length = length - config.nose_length - config.tail_length;
    if cylindrical_length <= 0.0 {
        return Err(RuleError::InvalidGeometry(format!(
            "fuselage of {} m is shorter than nose plus tail ({} m)",
            length,
            config.nose_length + config.tail_length
        )));
    }

    let cabin_start_x = config.cockpit_length;
    let aft_limit_x = config.aft_tank_limit * length;
    if aft_limit_x <= cabin_start_x {
        return Err(RuleError::InvalidGeometry(format!(
            "aft limit at {:.3} m lies forward of the cabin start at {:.3} m",
            aft_limit_x, cabin_start_x
        )));
    }

    Ok(FuselageGeometry {
        length,
        outer_diameter,
        inner_diameter,
        nose_length: config.nose_length,
        tail_length: config.tail_length,
        cylindrical_length,
        cabin_start_x,
        aft_limit_x,
        tailcone_end_ratio: config.tailcone_end_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a320_fuselage() {
        let geo = fuselage_geometry(37.57, 4.14, &FuselageConfig::default()).unwrap();
        assert!((geo.inner_diameter - 3.94).abs() < 1e-12);
        assert!((geo.cylindrical_length - (37.57 - 5.44 - 13.47)).abs() < 1e-12);
        assert_eq!(geo.cabin_start_x, 4.0);
        assert!((geo.aft_limit_x - 0.85 * 37.57).abs() < 1e-12);
    }

    #[test]
    fn usable_length_for_30m() {
        let geo = fuselage_geometry(30.0, 4.14, &FuselageConfig::default()).unwrap();
        assert!((geo.usable_length() - 21.5).abs() < 1e-12);
    }

    #[test]
    fn too_short_is_invalid() {
        let err = fuselage_geometry(15.0, 4.14, &FuselageConfig::default()).unwrap_err();
        assert!(matches!(err, RuleError::InvalidGeometry(_)));
    }

    #[test]
    fn non_positive_length_is_out_of_range() {
        let err = fuselage_geometry(-1.0, 4.14, &FuselageConfig::default()).unwrap_err();
        assert!(matches!(err, RuleError::OutOfRange { quantity: "fuselage.length", .. }));
    }

    #[test]
    fn tailcone_tapers() {
        let geo = fuselage_geometry(37.57, 4.14, &FuselageConfig::default()).unwrap();
        let start = geo.tailcone_start_x();
        assert_eq!(geo.inner_diameter_at(start - 1.0), geo.inner_diameter);
        assert!(geo.inner_diameter_at(start + 1.0) < geo.inner_diameter);
        assert!((geo.inner_diameter_at(geo.length) - 0.3 * geo.inner_diameter).abs() < 1e-12);
    }
}
