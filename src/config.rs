//! Named model constants, loadable from YAML
//!
//! Every field has a default taken from the A320 baseline, so a config file only
//! needs to list what it overrides:
//!
//! ```yaml
//! cabin:
//!   allowances:
//!     galley_length: 0.9
//! tank:
//!   structural_fraction: 0.6
//! ```
//!
//! Loaded configs are range-checked; a negative allowance or a fraction above
//! one is rejected with `InvalidConfig`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RetrofitError;

/// Complete set of constants captured by the rules at wiring time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub fuselage: FuselageConfig,
    pub cabin: CabinConfig,
    pub tank: TankConfig,
    pub mass: MassConfig,
    pub cargo: CargoConfig,
}

impl ModelConfig {
    /// Load from YAML string and range-check every constant
    pub fn from_yaml(yaml: &str) -> Result<Self, RetrofitError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RetrofitError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Reject constants that would only show up later as odd geometry
    pub fn validate(&self) -> Result<(), RetrofitError> {
        let f = &self.fuselage;
        positive("fuselage.nose_length", f.nose_length)?;
        non_negative("fuselage.tail_length", f.tail_length)?;
        non_negative("fuselage.skin_thickness", f.skin_thickness)?;
        non_negative("fuselage.cockpit_length", f.cockpit_length)?;
        if !(f.aft_tank_limit > 0.0 && f.aft_tank_limit <= 1.0) {
            return Err(invalid("fuselage.aft_tank_limit", f.aft_tank_limit, "must be in (0, 1]"));
        }
        fraction("fuselage.tailcone_end_ratio", f.tailcone_end_ratio)?;

        let a = &self.cabin.allowances;
        non_negative("cabin.allowances.galley_length", a.galley_length)?;
        non_negative("cabin.allowances.toilet_length", a.toilet_length)?;
        non_negative("cabin.allowances.cross_aisle_length", a.cross_aisle_length)?;
        non_negative("cabin.allowances.divider_thickness", a.divider_thickness)?;
        non_negative("cabin.allowances.aft_bulkhead_thickness", a.aft_bulkhead_thickness)?;

        let c = &self.cabin;
        positive("cabin.floor_depth", c.floor_depth)?;
        non_negative("cabin.seat_height", c.seat_height)?;
        non_negative("cabin.seat_depth", c.seat_depth)?;
        non_negative("cabin.armrest_width", c.armrest_width)?;
        non_negative("cabin.seat_clearance", c.seat_clearance)?;
        non_negative("cabin.min_aisle_width", c.min_aisle_width)?;

        let t = &self.tank;
        positive("tank.lh2_density", t.lh2_density)?;
        fraction("tank.usable_volume_fraction", t.usable_volume_fraction)?;
        non_negative("tank.structural_fraction", t.structural_fraction)?;
        non_negative("tank.wall_clearance", t.wall_clearance)?;
        non_negative("tank.gap", t.gap)?;

        non_negative("mass.passenger_mass", self.mass.passenger_mass)?;

        let g = &self.cargo;
        positive("cargo.container_depth", g.container_depth)?;
        positive("cargo.container_height", g.container_height)?;
        positive("cargo.container_base", g.container_base)?;
        if !(g.container_width.is_finite() && g.container_width >= g.container_base) {
            return Err(invalid(
                "cargo.container_width",
                g.container_width,
                "must not be narrower than the container base",
            ));
        }
        non_negative("cargo.spacing", g.spacing)?;
        non_negative("cargo.nosebox_end_fraction", g.nosebox_end_fraction)?;
        non_negative("cargo.container_tare_mass", g.container_tare_mass)?;
        non_negative("cargo.cargo_density", g.cargo_density)?;
        Ok(())
    }
}

fn invalid(field: &'static str, value: f64, rule: &str) -> RetrofitError {
    RetrofitError::InvalidConfig {
        field,
        details: format!("{} {}", value, rule),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), RetrofitError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), RetrofitError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must not be negative"))
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), RetrofitError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, "must be in [0, 1]"))
    }
}

/// Fixed fuselage dimensions [m]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuselageConfig {
    pub nose_length: f64,
    pub tail_length: f64,
    pub skin_thickness: f64,
    /// The cabin starts right behind the cockpit
    pub cockpit_length: f64,
    /// Aft limit of the tank bay, as a fraction of fuselage length
    pub aft_tank_limit: f64,
    /// Inner diameter at the tail tip relative to the cylindrical section
    pub tailcone_end_ratio: f64,
}

impl Default for FuselageConfig {
    fn default() -> Self {
        Self {
            nose_length: 5.44,
            tail_length: 13.47,
            skin_thickness: 0.1,
            cockpit_length: 4.0,
            aft_tank_limit: 0.85,
            tailcone_end_ratio: 0.3,
        }
    }
}

/// Longitudinal space taken by cabin monuments [m]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinAllowances {
    pub galley_length: f64,
    pub toilet_length: f64,
    pub cross_aisle_length: f64,
    pub divider_thickness: f64,
    pub aft_bulkhead_thickness: f64,
}

impl CabinAllowances {
    /// No monuments: consumed cabin length equals the seating length
    pub fn none() -> Self {
        Self {
            galley_length: 0.0,
            toilet_length: 0.0,
            cross_aisle_length: 0.0,
            divider_thickness: 0.0,
            aft_bulkhead_thickness: 0.0,
        }
    }

    /// Forward galley/toilet block, cross aisle and the forward divider
    pub fn forward_length(&self) -> f64 {
        self.galley_length.max(self.toilet_length) + self.cross_aisle_length + self.divider_thickness
    }

    /// Aft divider, toilets, cross aisle, galley and pressure bulkhead
    pub fn aft_length(&self) -> f64 {
        self.divider_thickness
            + self.toilet_length
            + self.cross_aisle_length
            + self.galley_length
            + self.aft_bulkhead_thickness
    }
}

impl Default for CabinAllowances {
    fn default() -> Self {
        Self {
            galley_length: 0.76,
            toilet_length: 0.91,
            cross_aisle_length: 1.0,
            divider_thickness: 0.05,
            aft_bulkhead_thickness: 0.1,
        }
    }
}

/// Cabin cross-section and seat geometry [m]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinConfig {
    pub allowances: CabinAllowances,
    /// Depth of the cabin floor below the crown of the inner skin
    pub floor_depth: f64,
    pub seat_height: f64,
    pub seat_depth: f64,
    pub armrest_width: f64,
    pub seat_clearance: f64,
    pub min_aisle_width: f64,
}

impl Default for CabinConfig {
    fn default() -> Self {
        Self {
            allowances: CabinAllowances::default(),
            floor_depth: 2.2,
            seat_height: 1.0,
            seat_depth: 0.5,
            armrest_width: 0.05,
            seat_clearance: 0.05,
            min_aisle_width: 0.5,
        }
    }
}

/// Hydrogen tank constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Liquid hydrogen density [kg/m3]
    pub lh2_density: f64,
    /// Share of the tank volume that can hold liquid (ullage, insulation)
    pub usable_volume_fraction: f64,
    /// Tank structure mass per kg of LH2 capacity
    pub structural_fraction: f64,
    /// Radial clearance between tank and inner skin [m]
    pub wall_clearance: f64,
    /// Longitudinal gap around each tank [m]
    pub gap: f64,
    pub max_tanks: u32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            lh2_density: 70.85,
            usable_volume_fraction: 0.92,
            structural_fraction: 0.9,
            wall_clearance: 0.1,
            gap: 0.1,
            max_tanks: 2,
        }
    }
}

/// Payload masses [kg]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassConfig {
    pub passenger_mass: f64,
}

impl Default for MassConfig {
    fn default() -> Self {
        Self {
            passenger_mass: 90.0,
        }
    }
}

/// Underfloor cargo holds and LD3-45 containers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CargoConfig {
    /// Container length along the fuselage [m]
    pub container_depth: f64,
    /// Width at the top of the container [m]
    pub container_width: f64,
    /// Width at the floor, below the cut corners [m]
    pub container_base: f64,
    pub container_height: f64,
    /// Longitudinal gap in front of each container [m]
    pub spacing: f64,
    /// End of the nose equipment bay, as a fraction of the nosecone length
    pub nosebox_end_fraction: f64,
    /// Empty container [kg]
    pub container_tare_mass: f64,
    /// Density of packed cargo [kg/m3]
    pub cargo_density: f64,
}

impl CargoConfig {
    /// Box volume minus the two 45 degree corner cuts [m3]
    pub fn container_volume(&self) -> f64 {
        let cut = (self.container_width - self.container_base) / 2.0;
        self.container_depth * (self.container_width * self.container_height - cut * cut)
    }

    /// Hold length taken by one container and its gap [m]
    pub fn container_pitch(&self) -> f64 {
        self.container_depth + self.spacing
    }
}

impl Default for CargoConfig {
    fn default() -> Self {
        Self {
            container_depth: 1.534,
            container_width: 2.438,
            container_base: 1.562,
            container_height: 1.143,
            spacing: 0.1,
            nosebox_end_fraction: 1.2,
            container_tare_mass: 274.0,
            cargo_density: 161.0,
        }
    }
}
