//! Evaluation summary and its output formats (v0.1)

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::RetrofitError;
use crate::model::{ids, AircraftModel};
use crate::rules::{
    AisleWidth, CabinLayout, CargoHolds, CgMarker, FuselageGeometry, MassProperties,
    MeanAerodynamicChord, TankSizing,
};

/// Output format enum
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable lines (default)
    #[default]
    Text,

    /// Pretty-printed JSON
    Json,
}

/// Value of one output node, or why it could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok(T),
    Failed { node: String, error: String },
}

impl<T> Outcome<T> {
    fn from_result(result: Result<T, RetrofitError>) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Failed {
                node: e.node().unwrap_or_default().to_string(),
                error: e.to_string(),
            },
        }
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Outcome::Ok(v) => Some(v),
            Outcome::Failed { .. } => None,
        }
    }

    fn failure(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Snapshot of every output a consumer reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub fuselage: Outcome<FuselageGeometry>,
    pub cabin: Outcome<CabinLayout>,
    pub aisles: Outcome<Vec<AisleWidth>>,
    pub passengers: Outcome<u32>,
    pub tanks: Outcome<TankSizing>,
    pub cargo: Outcome<CargoHolds>,
    pub mac: Outcome<MeanAerodynamicChord>,
    pub lemac_x: Outcome<f64>,
    pub mass: Outcome<MassProperties>,
    pub cg_percent_mac: Outcome<f64>,
    pub cg_marker: Outcome<CgMarker>,
}

impl Summary {
    /// Evaluate every output; failures are kept per output
    pub fn collect(model: &mut AircraftModel) -> Self {
        Self {
            fuselage: Outcome::from_result(model.fuselage()),
            cabin: Outcome::from_result(model.cabin_layout()),
            aisles: Outcome::from_result(model.aisle_widths()),
            passengers: Outcome::from_result(model.passengers()),
            tanks: Outcome::from_result(model.tanks()),
            cargo: Outcome::from_result(model.cargo_holds()),
            mac: Outcome::from_result(model.mac()),
            lemac_x: Outcome::from_result(model.lemac_x()),
            mass: Outcome::from_result(model.mass_properties()),
            cg_percent_mac: Outcome::from_result(model.cg_percent_mac()),
            cg_marker: Outcome::from_result(model.cg_marker()),
        }
    }

    /// Error messages, one per failed output
    pub fn failures(&self) -> Vec<&str> {
        [
            self.fuselage.failure(),
            self.cabin.failure(),
            self.aisles.failure(),
            self.passengers.failure(),
            self.tanks.failure(),
            self.cargo.failure(),
            self.mac.failure(),
            self.lemac_x.failure(),
            self.mass.failure(),
            self.cg_percent_mac.failure(),
            self.cg_marker.failure(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, RetrofitError> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let rows = [
            (
                ids::FUSELAGE_GEOMETRY,
                describe(&self.fuselage, |f| {
                    format!("length {:.2} m, inner diameter {:.2} m", f.length, f.inner_diameter)
                }),
            ),
            (
                ids::CABIN_LAYOUT,
                describe(&self.cabin, |c| {
                    format!(
                        "{} rows, {:.2} of {:.2} m used",
                        c.rows.len(),
                        c.consumed_length,
                        c.available_length
                    )
                }),
            ),
            (
                ids::CABIN_AISLE_WIDTHS,
                describe(&self.aisles, |a| {
                    a.iter()
                        .map(|w| format!("{} {:.3} m", w.class, w.width))
                        .collect::<Vec<_>>()
                        .join(", ")
                }),
            ),
            (ids::CABIN_PASSENGERS, describe(&self.passengers, u32::to_string)),
            (
                ids::TANK_SIZING,
                describe(&self.tanks, |t| {
                    format!(
                        "{} tank(s), length {:.3} m, LH2 {:.1} kg",
                        t.tanks.len(),
                        t.tank_length(),
                        t.fuel_mass()
                    )
                }),
            ),
            (
                ids::CARGO_HOLDS,
                describe(&self.cargo, |h| {
                    format!(
                        "{} forward + {} aft containers, {:.2} m3 each",
                        h.forward.capacity, h.aft.capacity, h.container_volume
                    )
                }),
            ),
            (
                ids::WING_MAC,
                describe(&self.mac, |m| format!("{:.3} m at y = {:.3} m", m.length, m.y)),
            ),
            (ids::WING_LEMAC_X, describe(&self.lemac_x, |x| format!("{:.3} m", x))),
            (
                ids::MASS_PROPERTIES,
                describe(&self.mass, |m| {
                    format!("{:.1} kg, c.g. at x = {:.3} m", m.total_mass, m.cg_x)
                }),
            ),
            (
                ids::CG_PERCENT_MAC,
                describe(&self.cg_percent_mac, |p| format!("{:.2} % MAC", p)),
            ),
        ];

        let mut out = String::new();
        for (id, text) in rows {
            let _ = writeln!(out, "{:<24} {}", id, text);
        }
        out
    }
}

fn describe<T>(outcome: &Outcome<T>, show: impl FnOnce(&T) -> String) -> String {
    match outcome {
        Outcome::Ok(v) => show(v),
        Outcome::Failed { error, .. } => format!("FAILED ({})", error),
    }
}
