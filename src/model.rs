//! Aircraft model: the fixed graph of the hydrogen retrofit
//!
//! All nodes are wired once in [`AircraftModel::new`]; afterwards only input
//! values change. Typed accessors return owned clones for the consumer.

use std::collections::BTreeMap;

use tracing::{info, instrument};

use crate::config::ModelConfig;
use crate::engine::Engine;
use crate::error::{RetrofitError, RuleError};
use crate::event_log::EventLog;
use crate::graph::{GraphBuilder, NodeKind};
use crate::rules::{
    cabin, cargo, fuselage, mac, mass, tank, AisleWidth, CabinLayout, CargoHolds, CgMarker,
    Component, FuselageGeometry, MassItem, MassProperties, MeanAerodynamicChord, Planform,
    TankSizing, WingStation,
};
use crate::seating::SeatingConfig;
use crate::value::Value;

/// Node ids of the aircraft graph
pub mod ids {
    // inputs
    pub const FUSELAGE_LENGTH: &str = "fuselage.length";
    pub const FUSELAGE_OUTER_DIAMETER: &str = "fuselage.outer_diameter";
    pub const CABIN_SEATING: &str = "cabin.seating";
    pub const TANK_COUNT: &str = "tank.count";
    pub const TANK_FILL_FRACTION: &str = "tank.fill_fraction";
    pub const WING_PLANFORM: &str = "wing.planform";
    pub const WING_POSITION_FRACTION: &str = "wing.position_fraction";
    pub const MASS_FIXED_ITEMS: &str = "mass.fixed_items";
    pub const CARGO_LOAD_FRACTION: &str = "cargo.load_fraction";

    // derived
    pub const FUSELAGE_GEOMETRY: &str = "fuselage.geometry";
    pub const CABIN_LAYOUT: &str = "cabin.layout";
    pub const CABIN_AISLE_WIDTHS: &str = "cabin.aisle_widths";
    pub const CABIN_PASSENGERS: &str = "cabin.passengers";
    pub const TANK_SIZING: &str = "tank.sizing";
    pub const CARGO_HOLDS: &str = "cargo.holds";
    pub const WING_MAC: &str = "wing.mac";
    pub const WING_ROOT_STATION: &str = "wing.root_station";
    pub const WING_LEMAC_X: &str = "wing.lemac_x";
    pub const MASS_FIXED_COMPONENTS: &str = "mass.fixed_components";
    pub const MASS_SEAT_COMPONENTS: &str = "mass.seat_components";
    pub const MASS_TANK_COMPONENTS: &str = "mass.tank_components";
    pub const MASS_CARGO_COMPONENTS: &str = "mass.cargo_components";
    pub const MASS_PROPERTIES: &str = "mass.properties";
    pub const CG_PERCENT_MAC: &str = "cg.percent_mac";
    pub const CG_MARKER: &str = "cg.marker";

    pub const INPUTS: [&str; 9] = [
        FUSELAGE_LENGTH,
        FUSELAGE_OUTER_DIAMETER,
        CABIN_SEATING,
        TANK_COUNT,
        TANK_FILL_FRACTION,
        WING_PLANFORM,
        WING_POSITION_FRACTION,
        MASS_FIXED_ITEMS,
        CARGO_LOAD_FRACTION,
    ];
}

/// Initial input values
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInputs {
    pub fuselage_length: f64,
    pub outer_diameter: f64,
    pub seating: SeatingConfig,
    pub tank_count: u32,
    pub fill_fraction: f64,
    pub planform: Planform,
    pub wing_position_fraction: f64,
    pub fixed_items: Vec<MassItem>,
    /// Share of the hold positions carrying a loaded container
    pub cargo_load_fraction: f64,
}

impl Default for ModelInputs {
    /// A320 with one hydrogen tank behind the cabin and full cargo holds
    fn default() -> Self {
        Self {
            fuselage_length: 37.57,
            outer_diameter: 4.14,
            seating: SeatingConfig::a320(),
            tank_count: 1,
            fill_fraction: 1.0,
            planform: Planform::a320(),
            wing_position_fraction: 0.32579,
            fixed_items: MassItem::a320_defaults(),
            cargo_load_fraction: 1.0,
        }
    }
}

/// One owned instance of the retrofit graph
pub struct AircraftModel {
    engine: Engine,
    config: ModelConfig,
}

impl AircraftModel {
    /// Baseline inputs with the given constants
    pub fn new(config: ModelConfig) -> Result<Self, RetrofitError> {
        Self::with_inputs(ModelInputs::default(), config)
    }

    /// Baseline inputs and default constants
    pub fn baseline() -> Result<Self, RetrofitError> {
        Self::new(ModelConfig::default())
    }

    #[instrument(skip_all)]
    pub fn with_inputs(inputs: ModelInputs, config: ModelConfig) -> Result<Self, RetrofitError> {
        Self::build(inputs, config, EventLog::new())
    }

    /// Like [`AircraftModel::with_inputs`], recording into `events`
    pub fn with_event_log(
        inputs: ModelInputs,
        config: ModelConfig,
        events: EventLog,
    ) -> Result<Self, RetrofitError> {
        Self::build(inputs, config, events)
    }

    fn build(inputs: ModelInputs, config: ModelConfig, events: EventLog) -> Result<Self, RetrofitError> {
        config.validate()?;
        validate_seating(&inputs.seating)?;
        let fuselage_cfg = config.fuselage.clone();
        let cabin_cfg = config.cabin.clone();
        let aisle_cfg = config.cabin.clone();
        let tank_cfg = config.tank.clone();
        let seat_cabin_cfg = config.cabin.clone();
        let mass_cfg = config.mass.clone();
        let holds_cfg = config.cargo.clone();
        let cargo_cfg = config.cargo.clone();

        let engine = GraphBuilder::new()
            .input(ids::FUSELAGE_LENGTH, inputs.fuselage_length)
            .input(ids::FUSELAGE_OUTER_DIAMETER, inputs.outer_diameter)
            .input(ids::CABIN_SEATING, inputs.seating)
            .input(ids::TANK_COUNT, inputs.tank_count)
            .input(ids::TANK_FILL_FRACTION, inputs.fill_fraction)
            .input(ids::WING_PLANFORM, inputs.planform)
            .input(ids::WING_POSITION_FRACTION, inputs.wing_position_fraction)
            .input(ids::MASS_FIXED_ITEMS, inputs.fixed_items)
            .input(ids::CARGO_LOAD_FRACTION, inputs.cargo_load_fraction)
            // geometry
            .derived(
                ids::FUSELAGE_GEOMETRY,
                &[ids::FUSELAGE_LENGTH, ids::FUSELAGE_OUTER_DIAMETER],
                move |a| {
                    fuselage::fuselage_geometry(*a.as_scalar(0)?, *a.as_scalar(1)?, &fuselage_cfg)
                        .map(Value::Fuselage)
                },
            )
            // cabin
            .derived(
                ids::CABIN_LAYOUT,
                &[ids::FUSELAGE_GEOMETRY, ids::CABIN_SEATING],
                move |a| {
                    cabin::cabin_layout(a.as_fuselage(0)?, a.as_seating(1)?, &cabin_cfg)
                        .map(Value::CabinLayout)
                },
            )
            .derived(
                ids::CABIN_AISLE_WIDTHS,
                &[ids::FUSELAGE_GEOMETRY, ids::CABIN_SEATING],
                move |a| {
                    cabin::aisle_widths(a.as_fuselage(0)?, a.as_seating(1)?, &aisle_cfg)
                        .map(Value::AisleWidths)
                },
            )
            .derived(ids::CABIN_PASSENGERS, &[ids::CABIN_SEATING], |a| {
                Ok(Value::Count(a.as_seating(0)?.passengers()))
            })
            // tanks
            .derived(
                ids::TANK_SIZING,
                &[
                    ids::FUSELAGE_GEOMETRY,
                    ids::CABIN_LAYOUT,
                    ids::TANK_COUNT,
                    ids::TANK_FILL_FRACTION,
                ],
                move |a| {
                    tank::tank_sizing(
                        a.as_fuselage(0)?,
                        a.as_cabin_layout(1)?,
                        *a.as_count(2)?,
                        *a.as_scalar(3)?,
                        &tank_cfg,
                    )
                    .map(Value::Tanks)
                },
            )
            // wing
            .derived(ids::WING_MAC, &[ids::WING_PLANFORM], |a| {
                mac::mean_aerodynamic_chord(a.as_planform(0)?).map(Value::Mac)
            })
            .derived(
                ids::WING_ROOT_STATION,
                &[ids::FUSELAGE_GEOMETRY, ids::WING_POSITION_FRACTION, ids::WING_PLANFORM],
                |a| {
                    mac::wing_root_station(a.as_fuselage(0)?, *a.as_scalar(1)?, a.as_planform(2)?)
                        .map(Value::WingStation)
                },
            )
            .derived(ids::WING_LEMAC_X, &[ids::WING_ROOT_STATION, ids::WING_MAC], |a| {
                Ok(Value::Scalar(mac::lemac_x(a.as_wing_station(0)?, a.as_mac(1)?)))
            })
            // cargo
            .derived(
                ids::CARGO_HOLDS,
                &[ids::FUSELAGE_GEOMETRY, ids::WING_ROOT_STATION, ids::CABIN_LAYOUT],
                move |a| {
                    cargo::cargo_holds(
                        a.as_fuselage(0)?,
                        a.as_wing_station(1)?,
                        a.as_cabin_layout(2)?,
                        &holds_cfg,
                    )
                    .map(Value::CargoHolds)
                },
            )
            // masses
            .derived(
                ids::MASS_FIXED_COMPONENTS,
                &[ids::FUSELAGE_GEOMETRY, ids::WING_ROOT_STATION, ids::MASS_FIXED_ITEMS],
                |a| {
                    mass::fixed_components(a.as_fuselage(0)?, a.as_wing_station(1)?, a.as_mass_items(2)?)
                        .map(Value::Components)
                },
            )
            .derived(
                ids::MASS_SEAT_COMPONENTS,
                &[ids::CABIN_LAYOUT, ids::CABIN_SEATING],
                move |a| {
                    mass::seat_components(a.as_cabin_layout(0)?, a.as_seating(1)?, &seat_cabin_cfg, &mass_cfg)
                        .map(Value::Components)
                },
            )
            .derived(ids::MASS_TANK_COMPONENTS, &[ids::TANK_SIZING], |a| {
                Ok(Value::Components(mass::tank_components(a.as_tanks(0)?)))
            })
            .derived(
                ids::MASS_CARGO_COMPONENTS,
                &[ids::CARGO_HOLDS, ids::CARGO_LOAD_FRACTION],
                move |a| {
                    cargo::cargo_components(a.as_cargo_holds(0)?, *a.as_scalar(1)?, &cargo_cfg)
                        .map(Value::Components)
                },
            )
            .derived(
                ids::MASS_PROPERTIES,
                &[
                    ids::MASS_FIXED_COMPONENTS,
                    ids::MASS_SEAT_COMPONENTS,
                    ids::MASS_TANK_COMPONENTS,
                    ids::MASS_CARGO_COMPONENTS,
                ],
                |a| {
                    mass::mass_properties(&[
                        a.as_components(0)?.as_slice(),
                        a.as_components(1)?.as_slice(),
                        a.as_components(2)?.as_slice(),
                        a.as_components(3)?.as_slice(),
                    ])
                    .map(Value::MassProperties)
                },
            )
            // c.g. relative to the wing
            .derived(
                ids::CG_PERCENT_MAC,
                &[ids::MASS_PROPERTIES, ids::WING_LEMAC_X, ids::WING_MAC],
                |a| {
                    Ok(Value::Scalar(mac::percent_mac(
                        a.as_mass_properties(0)?.cg_x,
                        *a.as_scalar(1)?,
                        a.as_mac(2)?,
                    )))
                },
            )
            .derived(
                ids::CG_MARKER,
                &[
                    ids::CG_PERCENT_MAC,
                    ids::MASS_PROPERTIES,
                    ids::WING_LEMAC_X,
                    ids::WING_MAC,
                    ids::WING_PLANFORM,
                ],
                |a| {
                    Ok(Value::CgMarker(mac::cg_marker(
                        *a.as_scalar(0)?,
                        a.as_mass_properties(1)?,
                        *a.as_scalar(2)?,
                        a.as_mac(3)?,
                        a.as_planform(4)?,
                    )))
                },
            )
            .event_log(events)
            .build()?;

        info!(nodes = engine.len(), "aircraft model wired");
        Ok(Self { engine, config })
    }

    // ═══════════════════════════════════════════
    // INPUTS
    // ═══════════════════════════════════════════

    pub fn set_fuselage_length(&mut self, length: f64) -> Result<(), RetrofitError> {
        require_positive(ids::FUSELAGE_LENGTH, length)?;
        self.engine.set_input(ids::FUSELAGE_LENGTH, length)
    }

    pub fn set_outer_diameter(&mut self, diameter: f64) -> Result<(), RetrofitError> {
        require_positive(ids::FUSELAGE_OUTER_DIAMETER, diameter)?;
        self.engine.set_input(ids::FUSELAGE_OUTER_DIAMETER, diameter)
    }

    pub fn set_seating(&mut self, seating: SeatingConfig) -> Result<(), RetrofitError> {
        validate_seating(&seating)?;
        self.engine.set_input(ids::CABIN_SEATING, seating)
    }

    /// Tank counts above the configured maximum surface from `tank.sizing`
    pub fn set_tank_count(&mut self, count: u32) -> Result<(), RetrofitError> {
        self.engine.set_input(ids::TANK_COUNT, count)
    }

    pub fn set_tank_fill_fraction(&mut self, fraction: f64) -> Result<(), RetrofitError> {
        require_fraction(ids::TANK_FILL_FRACTION, fraction)?;
        self.engine.set_input(ids::TANK_FILL_FRACTION, fraction)
    }

    /// Planform errors surface as `InvalidGeometry` on every node that reads it
    pub fn set_planform(&mut self, planform: Planform) -> Result<(), RetrofitError> {
        self.engine.set_input(ids::WING_PLANFORM, planform)
    }

    pub fn set_wing_position_fraction(&mut self, fraction: f64) -> Result<(), RetrofitError> {
        require_fraction(ids::WING_POSITION_FRACTION, fraction)?;
        self.engine.set_input(ids::WING_POSITION_FRACTION, fraction)
    }

    pub fn set_fixed_items(&mut self, items: Vec<MassItem>) -> Result<(), RetrofitError> {
        self.engine.set_input(ids::MASS_FIXED_ITEMS, items)
    }

    pub fn set_cargo_load_fraction(&mut self, fraction: f64) -> Result<(), RetrofitError> {
        require_fraction(ids::CARGO_LOAD_FRACTION, fraction)?;
        self.engine.set_input(ids::CARGO_LOAD_FRACTION, fraction)
    }

    /// Set any input by id, with the same checks as the typed setters
    pub fn set_input(&mut self, id: &str, value: Value) -> Result<(), RetrofitError> {
        check_input(id, &value)?;
        self.engine.set_input(id, value)
    }

    /// Apply several inputs; nothing is applied if any of them is rejected
    pub fn apply_inputs(&mut self, inputs: BTreeMap<String, Value>) -> Result<(), RetrofitError> {
        for (id, value) in &inputs {
            if self.engine.kind(id)? != NodeKind::Input {
                return Err(RetrofitError::NotAnInput { id: id.clone() });
            }
            let current = self.engine.node(id)?.cached();
            if let Some(current) = current {
                if !current.same_kind(value) {
                    return Err(RetrofitError::InputType {
                        id: id.clone(),
                        expected: current.kind_name(),
                        found: value.kind_name(),
                    });
                }
            }
            check_input(id, value)?;
        }
        for (id, value) in inputs {
            self.engine.set_input(&id, value)?;
        }
        Ok(())
    }

    /// Current input values, sorted by id
    pub fn inputs(&self) -> BTreeMap<String, Value> {
        self.engine
            .input_ids()
            .filter_map(|id| {
                let value = self.engine.node(id).ok()?.cached()?.clone();
                Some((id.to_string(), value))
            })
            .collect()
    }

    // ═══════════════════════════════════════════
    // OUTPUTS
    // ═══════════════════════════════════════════

    pub fn get(&mut self, id: &str) -> Result<Value, RetrofitError> {
        self.engine.get(id)
    }

    pub fn fuselage(&mut self) -> Result<FuselageGeometry, RetrofitError> {
        self.typed(ids::FUSELAGE_GEOMETRY, Value::as_fuselage)
    }

    pub fn cabin_layout(&mut self) -> Result<CabinLayout, RetrofitError> {
        self.typed(ids::CABIN_LAYOUT, Value::as_cabin_layout)
    }

    pub fn aisle_widths(&mut self) -> Result<Vec<AisleWidth>, RetrofitError> {
        self.typed(ids::CABIN_AISLE_WIDTHS, Value::as_aisle_widths)
    }

    pub fn passengers(&mut self) -> Result<u32, RetrofitError> {
        self.typed(ids::CABIN_PASSENGERS, Value::as_count)
    }

    pub fn tanks(&mut self) -> Result<TankSizing, RetrofitError> {
        self.typed(ids::TANK_SIZING, Value::as_tanks)
    }

    pub fn cargo_holds(&mut self) -> Result<CargoHolds, RetrofitError> {
        self.typed(ids::CARGO_HOLDS, Value::as_cargo_holds)
    }

    pub fn mac(&mut self) -> Result<MeanAerodynamicChord, RetrofitError> {
        self.typed(ids::WING_MAC, Value::as_mac)
    }

    pub fn wing_station(&mut self) -> Result<WingStation, RetrofitError> {
        self.typed(ids::WING_ROOT_STATION, Value::as_wing_station)
    }

    pub fn lemac_x(&mut self) -> Result<f64, RetrofitError> {
        self.typed(ids::WING_LEMAC_X, Value::as_scalar)
    }

    /// Fixed, seat, tank and cargo components, in that order
    pub fn components(&mut self) -> Result<Vec<Component>, RetrofitError> {
        let mut all = self.typed(ids::MASS_FIXED_COMPONENTS, Value::as_components)?;
        all.extend(self.typed(ids::MASS_SEAT_COMPONENTS, Value::as_components)?);
        all.extend(self.typed(ids::MASS_TANK_COMPONENTS, Value::as_components)?);
        all.extend(self.typed(ids::MASS_CARGO_COMPONENTS, Value::as_components)?);
        Ok(all)
    }

    pub fn mass_properties(&mut self) -> Result<MassProperties, RetrofitError> {
        self.typed(ids::MASS_PROPERTIES, Value::as_mass_properties)
    }

    pub fn cg_x(&mut self) -> Result<f64, RetrofitError> {
        Ok(self.mass_properties()?.cg_x)
    }

    pub fn cg_percent_mac(&mut self) -> Result<f64, RetrofitError> {
        self.typed(ids::CG_PERCENT_MAC, Value::as_scalar)
    }

    pub fn cg_marker(&mut self) -> Result<CgMarker, RetrofitError> {
        self.typed(ids::CG_MARKER, Value::as_cg_marker)
    }

    fn typed<T: Clone>(
        &mut self,
        id: &str,
        extract: fn(&Value) -> Result<&T, RuleError>,
    ) -> Result<T, RetrofitError> {
        let value = self.engine.evaluate(id)?;
        extract(value)
            .cloned()
            .map_err(|source| RetrofitError::RuleEvaluation {
                node: id.to_string(),
                source,
            })
    }

    // ═══════════════════════════════════════════
    // ACCESS
    // ═══════════════════════════════════════════

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn events(&self) -> &EventLog {
        self.engine.events()
    }
}

impl std::fmt::Debug for AircraftModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AircraftModel")
            .field("engine", &self.engine)
            .finish()
    }
}

fn require_positive(id: &str, value: f64) -> Result<(), RetrofitError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RetrofitError::InvalidInput {
            id: id.to_string(),
            details: format!("{} must be a positive number", value),
        })
    }
}

fn require_fraction(id: &str, value: f64) -> Result<(), RetrofitError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RetrofitError::InvalidInput {
            id: id.to_string(),
            details: format!("{} is outside [0, 1]", value),
        })
    }
}

fn validate_seating(seating: &SeatingConfig) -> Result<(), RetrofitError> {
    seating.validate().map_err(|details| RetrofitError::InvalidInput {
        id: ids::CABIN_SEATING.to_string(),
        details,
    })
}

/// Range checks shared by the typed setters, `set_input` and model loading
pub(crate) fn check_input(id: &str, value: &Value) -> Result<(), RetrofitError> {
    match (id, value) {
        (ids::FUSELAGE_LENGTH | ids::FUSELAGE_OUTER_DIAMETER, Value::Scalar(v)) => {
            require_positive(id, *v)
        }
        (
            ids::TANK_FILL_FRACTION | ids::WING_POSITION_FRACTION | ids::CARGO_LOAD_FRACTION,
            Value::Scalar(v),
        ) => {
            require_fraction(id, *v)
        }
        (ids::CABIN_SEATING, Value::Seating(s)) => validate_seating(s),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_evaluates_every_node() {
        let mut model = AircraftModel::baseline().unwrap();
        let ids: Vec<String> = model.engine().node_ids().map(str::to_string).collect();
        assert_eq!(ids.len(), 25);
        for id in ids {
            model.get(&id).unwrap_or_else(|e| panic!("{id}: {e}"));
        }
    }

    #[test]
    fn baseline_cg_is_near_the_wing() {
        let mut model = AircraftModel::baseline().unwrap();
        let pct = model.cg_percent_mac().unwrap();
        assert!(pct > -50.0 && pct < 100.0, "cg at {pct:.1} % MAC");
        assert_eq!(model.passengers().unwrap(), 120);
        assert_eq!(model.tanks().unwrap().tanks.len(), 1);
    }

    #[test]
    fn setters_validate_before_touching_the_graph() {
        let mut model = AircraftModel::baseline().unwrap();
        let version = model.engine().version(ids::FUSELAGE_LENGTH).unwrap();
        assert!(matches!(
            model.set_fuselage_length(-3.0),
            Err(RetrofitError::InvalidInput { .. })
        ));
        assert!(model.set_tank_fill_fraction(1.2).is_err());
        assert!(model.set_wing_position_fraction(-0.1).is_err());
        assert_eq!(model.engine().version(ids::FUSELAGE_LENGTH).unwrap(), version);
    }

    #[test]
    fn apply_inputs_is_all_or_nothing() {
        let mut model = AircraftModel::baseline().unwrap();
        let before = model.inputs();
        let mut batch = BTreeMap::new();
        batch.insert(ids::FUSELAGE_LENGTH.to_string(), Value::Scalar(40.0));
        batch.insert(ids::TANK_COUNT.to_string(), Value::Scalar(2.0));
        assert!(matches!(
            model.apply_inputs(batch),
            Err(RetrofitError::InputType { .. })
        ));
        assert_eq!(model.inputs(), before);
    }

    #[test]
    fn apply_inputs_rejects_derived_ids() {
        let mut model = AircraftModel::baseline().unwrap();
        let mut batch = BTreeMap::new();
        batch.insert(ids::CG_PERCENT_MAC.to_string(), Value::Scalar(25.0));
        assert!(matches!(
            model.apply_inputs(batch),
            Err(RetrofitError::NotAnInput { .. })
        ));
    }

    #[test]
    fn inputs_snapshot_lists_every_input() {
        let model = AircraftModel::baseline().unwrap();
        let inputs = model.inputs();
        assert_eq!(inputs.len(), ids::INPUTS.len());
        for id in ids::INPUTS {
            assert!(inputs.contains_key(id));
        }
        assert_eq!(inputs[ids::TANK_COUNT], Value::Count(1));
    }

    #[test]
    fn baseline_carries_full_cargo_holds() {
        let mut model = AircraftModel::baseline().unwrap();
        let holds = model.cargo_holds().unwrap();
        assert_eq!(holds.capacity(), 6);
        let props = model.mass_properties().unwrap();
        let cargo = holds.container_volume * model.config().cargo.cargo_density * 6.0;
        let passengers = 120.0 * model.config().mass.passenger_mass;
        assert!((props.payload_mass - passengers - cargo).abs() < 1e-6);
    }

    #[test]
    fn emptying_the_holds_moves_only_cargo_dependents() {
        let mut model = AircraftModel::baseline().unwrap();
        let loaded = model.mass_properties().unwrap();
        let holds_runs = model.engine().invocations(ids::CARGO_HOLDS).unwrap();

        model.set_cargo_load_fraction(0.0).unwrap();
        let empty = model.mass_properties().unwrap();
        assert!(empty.total_mass < loaded.total_mass);
        assert_eq!(model.get(ids::MASS_CARGO_COMPONENTS).unwrap(), Value::Components(Vec::new()));
        assert_eq!(model.engine().invocations(ids::CARGO_HOLDS).unwrap(), holds_runs);
        assert!(model.set_cargo_load_fraction(1.5).is_err());
    }

    #[test]
    fn invalid_config_is_rejected_at_build() {
        let mut config = ModelConfig::default();
        config.tank.gap = -0.1;
        assert!(matches!(
            AircraftModel::new(config),
            Err(RetrofitError::InvalidConfig { field: "tank.gap", .. })
        ));
    }

    #[test]
    fn too_many_tanks_only_breaks_tank_outputs() {
        let mut model = AircraftModel::baseline().unwrap();
        model.set_tank_count(3).unwrap();
        let err = model.tanks().unwrap_err();
        assert!(matches!(
            err.rule_error(),
            Some(RuleError::InvalidTankCount { requested: 3, .. })
        ));
        assert!(model.cabin_layout().is_ok());
        assert!(model.mac().is_ok());
        assert!(model.cg_x().is_err());
    }
}
