//! Mass components and centre-of-gravity aggregation

use serde::{Deserialize, Serialize};

use super::cabin::CabinLayout;
use super::fuselage::FuselageGeometry;
use super::mac::WingStation;
use super::tank::TankSizing;
use crate::config::{CabinConfig, MassConfig};
use crate::error::RuleError;
use crate::seating::SeatingConfig;

/// Where a fixed item sits, relative to the airframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "at", rename_all = "snake_case")]
pub enum Station {
    /// Fixed x from the nose [m]
    Absolute { x: f64 },
    /// Fraction of the fuselage length
    Fuselage { fraction: f64 },
    /// Fraction of the nosecone length
    Nosecone { fraction: f64 },
    /// Fraction of the wing box, from its forward end
    WingBox { fraction: f64 },
    /// Distance behind the wing box start [m]
    WingBoxOffset { offset: f64 },
}

impl Station {
    pub fn resolve(&self, fuselage: &FuselageGeometry, wing: &WingStation) -> f64 {
        match *self {
            Station::Absolute { x } => x,
            Station::Fuselage { fraction } => fraction * fuselage.length,
            Station::Nosecone { fraction } => fraction * fuselage.nose_length,
            Station::WingBox { fraction } => {
                wing.wingbox_start_x + fraction * (wing.wingbox_end_x - wing.wingbox_start_x)
            }
            Station::WingBoxOffset { offset } => wing.wingbox_start_x + offset,
        }
    }
}

/// A structural or system mass with a station, before resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassItem {
    pub name: String,
    /// [kg]
    pub mass: f64,
    pub station: Station,
}

impl MassItem {
    pub fn new(name: impl Into<String>, mass: f64, station: Station) -> Self {
        Self {
            name: name.into(),
            mass,
            station,
        }
    }

    /// Empty-aircraft items of the A320 baseline (class II estimates)
    pub fn a320_defaults() -> Vec<MassItem> {
        use Station::*;
        vec![
            MassItem::new("main wing", 8801.0, WingBox { fraction: 0.5 }),
            MassItem::new("fuselage", 8938.0, Fuselage { fraction: 0.45 }),
            MassItem::new("horizontal tail", 625.0, Fuselage { fraction: 0.93 }),
            MassItem::new("vertical tail", 463.0, Fuselage { fraction: 0.9 }),
            MassItem::new("main landing gear", 1933.75, WingBox { fraction: 0.5 }),
            MassItem::new("nose landing gear", 341.25, Nosecone { fraction: 1.02 }),
            MassItem::new("bleed air system", 249.0, WingBox { fraction: 0.5 }),
            MassItem::new("fuel system", 299.0, WingBox { fraction: 0.5 }),
            MassItem::new("hydraulics", 866.0, WingBox { fraction: 0.5 }),
            MassItem::new("air conditioning", 664.0, WingBox { fraction: 0.5 }),
            MassItem::new("apu", 223.0, Fuselage { fraction: 0.975 }),
            MassItem::new("avionics and electrics", 2849.0, Nosecone { fraction: 0.65 }),
            MassItem::new("engines", 6621.0, WingBoxOffset { offset: 1.3 }),
            MassItem::new("pylons", 907.0, WingBoxOffset { offset: 2.6 }),
            MassItem::new("flight crew", 300.0, Absolute { x: 2.75 }),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Fixed,
    Seats,
    Passengers,
    TankStructure,
    Fuel,
    /// Empty cargo container
    CargoContainer,
    /// Packed cargo inside a container
    Cargo,
}

/// A mass at a resolved longitudinal station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    pub x: f64,
    pub length: f64,
    pub mass: f64,
}

impl Component {
    pub fn moment(&self) -> f64 {
        self.mass * self.x
    }
}

/// Aggregated mass and c.g. of the whole aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub total_mass: f64,
    pub cg_x: f64,
    pub moment: f64,
    pub component_count: usize,
    /// Passengers and packed cargo
    pub payload_mass: f64,
    pub fuel_mass: f64,
    pub operating_empty_mass: f64,
}

/// Resolve each fixed item's station against the current airframe
pub fn fixed_components(
    fuselage: &FuselageGeometry,
    wing: &WingStation,
    items: &[MassItem],
) -> Result<Vec<Component>, RuleError> {
    items
        .iter()
        .map(|item| {
            if !item.mass.is_finite() || item.mass < 0.0 {
                return Err(RuleError::OutOfRange {
                    quantity: "mass item",
                    value: item.mass,
                });
            }
            Ok(Component {
                name: item.name.clone(),
                kind: ComponentKind::Fixed,
                x: item.station.resolve(fuselage, wing),
                length: 0.0,
                mass: item.mass,
            })
        })
        .collect()
}

/// Seats and passengers of every row, at the middle of the seat cushion
pub fn seat_components(
    layout: &CabinLayout,
    seating: &SeatingConfig,
    cabin: &CabinConfig,
    mass: &MassConfig,
) -> Result<Vec<Component>, RuleError> {
    let mut components = Vec::with_capacity(layout.rows.len() * 2);
    for row in &layout.rows {
        let class = seating.classes.get(row.class_index).ok_or_else(|| {
            RuleError::InvalidGeometry(format!(
                "row {} refers to missing class '{}'",
                row.row, row.class
            ))
        })?;
        let seats = f64::from(row.seats);
        let x = row.x + cabin.seat_depth / 2.0;
        components.push(Component {
            name: format!("{} row {} seats", row.class, row.row + 1),
            kind: ComponentKind::Seats,
            x,
            length: class.pitch,
            mass: seats * class.seat_mass,
        });
        components.push(Component {
            name: format!("{} row {} passengers", row.class, row.row + 1),
            kind: ComponentKind::Passengers,
            x,
            length: class.pitch,
            mass: seats * mass.passenger_mass,
        });
    }
    Ok(components)
}

/// Structure and fuel of every tank, at the tank midpoint
pub fn tank_components(sizing: &TankSizing) -> Vec<Component> {
    sizing
        .tanks
        .iter()
        .flat_map(|tank| {
            [
                Component {
                    name: format!("tank {} structure", tank.index + 1),
                    kind: ComponentKind::TankStructure,
                    x: tank.cg_x,
                    length: tank.length,
                    mass: tank.structural_mass,
                },
                Component {
                    name: format!("tank {} fuel", tank.index + 1),
                    kind: ComponentKind::Fuel,
                    x: tank.cg_x,
                    length: tank.length,
                    mass: tank.fuel_mass,
                },
            ]
        })
        .collect()
}

/// cg_x = Σ(m·x) / Σm over all component lists
pub fn mass_properties(lists: &[&[Component]]) -> Result<MassProperties, RuleError> {
    let mut total_mass = 0.0;
    let mut moment = 0.0;
    let mut payload_mass = 0.0;
    let mut fuel_mass = 0.0;
    let mut component_count = 0;

    for component in lists.iter().flat_map(|list| list.iter()) {
        total_mass += component.mass;
        moment += component.moment();
        component_count += 1;
        match component.kind {
            ComponentKind::Passengers | ComponentKind::Cargo => payload_mass += component.mass,
            ComponentKind::Fuel => fuel_mass += component.mass,
            _ => {}
        }
    }

    if total_mass <= 0.0 {
        return Err(RuleError::ZeroMass { total: total_mass });
    }

    Ok(MassProperties {
        total_mass,
        cg_x: moment / total_mass,
        moment,
        component_count,
        payload_mass,
        fuel_mass,
        operating_empty_mass: total_mass - payload_mass - fuel_mass,
    })
}
