//! Liquid hydrogen tank sizing in the space behind the cabin

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::cabin::CabinLayout;
use super::fuselage::FuselageGeometry;
use crate::config::TankConfig;
use crate::error::RuleError;

/// One capsule-shaped tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub index: u32,
    pub start_x: f64,
    pub length: f64,
    pub diameter: f64,
    /// Internal volume [m3]
    pub volume: f64,
    /// LH2 mass the tank can hold [kg]
    pub capacity: f64,
    pub fuel_mass: f64,
    pub structural_mass: f64,
    pub cg_x: f64,
}

impl Tank {
    pub fn end_x(&self) -> f64 {
        self.start_x + self.length
    }
}

/// All tanks between the aft bulkhead and the aft limit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TankSizing {
    pub tanks: Vec<Tank>,
    pub begin_x: f64,
    pub available_length: f64,
}

impl TankSizing {
    pub fn fuel_mass(&self) -> f64 {
        self.tanks.iter().map(|t| t.fuel_mass).sum()
    }

    pub fn structural_mass(&self) -> f64 {
        self.tanks.iter().map(|t| t.structural_mass).sum()
    }

    pub fn capacity(&self) -> f64 {
        self.tanks.iter().map(|t| t.capacity).sum()
    }

    /// Length of the first tank, 0 when there are none
    pub fn tank_length(&self) -> f64 {
        self.tanks.first().map(|t| t.length).unwrap_or(0.0)
    }
}

/// Cylinder with hemispherical caps
pub fn capsule_volume(length: f64, diameter: f64) -> f64 {
    let r = diameter / 2.0;
    PI * r * r * (length - diameter).max(0.0) + 4.0 / 3.0 * PI * r * r * r
}

/// Split the remaining fuselage length evenly between `count` tanks
pub fn tank_sizing(
    fuselage: &FuselageGeometry,
    layout: &CabinLayout,
    count: u32,
    fill_fraction: f64,
    config: &TankConfig,
) -> Result<TankSizing, RuleError> {
    if count > config.max_tanks {
        return Err(RuleError::InvalidTankCount {
            requested: count,
            max: config.max_tanks,
        });
    }
    if !(0.0..=1.0).contains(&fill_fraction) {
        return Err(RuleError::OutOfRange {
            quantity: "tank.fill_fraction",
            value: fill_fraction,
        });
    }

    let begin_x = layout.aft_bulkhead_x;
    let available_length = fuselage.aft_limit_x - begin_x;
    if count == 0 {
        return Ok(TankSizing {
            tanks: Vec::new(),
            begin_x,
            available_length,
        });
    }
    if available_length <= 0.0 {
        return Err(RuleError::InsufficientTankSpace {
            available: available_length,
        });
    }

    let bay = available_length / f64::from(count);
    let length = bay - config.gap;
    if length <= 0.0 {
        return Err(RuleError::InsufficientTankSpace {
            available: available_length,
        });
    }

    let mut tanks = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start_x = begin_x + f64::from(i) * bay + config.gap / 2.0;
        let end_x = start_x + length;
        let section = fuselage
            .inner_diameter_at(start_x)
            .min(fuselage.inner_diameter_at(end_x));
        let diameter = (section - 2.0 * config.wall_clearance).min(length);
        if diameter <= 0.0 {
            return Err(RuleError::InsufficientTankSpace {
                available: available_length,
            });
        }
        let volume = capsule_volume(length, diameter);
        let capacity = volume * config.usable_volume_fraction * config.lh2_density;
        tanks.push(Tank {
            index: i,
            start_x,
            length,
            diameter,
            volume,
            capacity,
            fuel_mass: capacity * fill_fraction,
            structural_mass: capacity * config.structural_fraction,
            cg_x: start_x + length / 2.0,
        });
    }

    Ok(TankSizing {
        tanks,
        begin_x,
        available_length,
    })
}
