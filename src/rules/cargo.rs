//! Underfloor cargo holds in front of and behind the wing box

use serde::{Deserialize, Serialize};

use super::cabin::CabinLayout;
use super::fuselage::FuselageGeometry;
use super::mac::WingStation;
use super::mass::{Component, ComponentKind};
use super::require_positive;
use crate::config::CargoConfig;
use crate::error::RuleError;

/// One hold and the container positions it offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoHold {
    pub name: String,
    /// Front of the first container [m from nose]
    pub start_x: f64,
    /// Floor length between the hold boundaries, never negative
    pub length: f64,
    pub capacity: u32,
}

impl CargoHold {
    /// Container `i` sits one pitch behind container `i - 1`
    pub fn container_x(&self, index: u32, cargo: &CargoConfig) -> f64 {
        self.start_x + f64::from(index) * cargo.container_pitch()
    }
}

/// Both holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoHolds {
    pub forward: CargoHold,
    pub aft: CargoHold,
    /// Volume of one container [m3]
    pub container_volume: f64,
}

impl CargoHolds {
    pub fn capacity(&self) -> u32 {
        self.forward.capacity.saturating_add(self.aft.capacity)
    }
}

fn hold(name: &str, begin: f64, end: f64, cargo: &CargoConfig) -> CargoHold {
    let length = (end - begin).max(0.0);
    // whole containers only
    let capacity = (length / cargo.container_pitch()).floor() as u32;
    CargoHold {
        name: name.to_string(),
        start_x: begin + cargo.spacing,
        length,
        capacity,
    }
}

/// Forward hold runs from the nose equipment bay to the wing box; the aft hold
/// from the wing box to the cabin's aft bulkhead or the tailcone, whichever
/// comes first.
pub fn cargo_holds(
    fuselage: &FuselageGeometry,
    wing: &WingStation,
    layout: &CabinLayout,
    cargo: &CargoConfig,
) -> Result<CargoHolds, RuleError> {
    require_positive("cargo.container_pitch", cargo.container_pitch())?;
    let nosebox_end_x = cargo.nosebox_end_fraction * fuselage.nose_length;
    let aft_end_x = layout.aft_bulkhead_x.min(fuselage.tailcone_start_x());

    Ok(CargoHolds {
        forward: hold("forward", nosebox_end_x, wing.wingbox_start_x, cargo),
        aft: hold("aft", wing.wingbox_end_x, aft_end_x, cargo),
        container_volume: cargo.container_volume(),
    })
}

/// Loaded containers, from the front of each hold
///
/// `load_fraction` of each hold's positions carry a packed container; the rest
/// stay empty and add no mass. Every loaded container yields a tare component
/// and a cargo component at its midpoint.
pub fn cargo_components(
    holds: &CargoHolds,
    load_fraction: f64,
    cargo: &CargoConfig,
) -> Result<Vec<Component>, RuleError> {
    if !(0.0..=1.0).contains(&load_fraction) {
        return Err(RuleError::OutOfRange {
            quantity: "cargo.load_fraction",
            value: load_fraction,
        });
    }
    let payload = cargo.cargo_density * holds.container_volume;

    let mut components = Vec::new();
    for hold in [&holds.forward, &holds.aft] {
        let loaded = (load_fraction * f64::from(hold.capacity)).floor() as u32;
        for i in 0..loaded {
            let x = hold.container_x(i, cargo) + cargo.container_depth / 2.0;
            components.push(Component {
                name: format!("{} container {}", hold.name, i + 1),
                kind: ComponentKind::CargoContainer,
                x,
                length: cargo.container_depth,
                mass: cargo.container_tare_mass,
            });
            components.push(Component {
                name: format!("{} container {} cargo", hold.name, i + 1),
                kind: ComponentKind::Cargo,
                x,
                length: cargo.container_depth,
                mass: payload,
            });
        }
    }
    Ok(components)
}
