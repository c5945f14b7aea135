//! Derivation rules
//!
//! Each rule is a pure function from dependency values to one output value.
//! The model wires them into the graph as closures that capture the relevant
//! slice of [`crate::config::ModelConfig`].

pub mod cabin;
pub mod cargo;
pub mod fuselage;
pub mod mac;
pub mod mass;
pub mod tank;

pub use cabin::{AisleWidth, CabinLayout, ClassBlock, RowPlacement};
pub use cargo::{CargoHold, CargoHolds};
pub use fuselage::FuselageGeometry;
pub use mac::{CgMarker, MeanAerodynamicChord, Planform, WingStation};
pub use mass::{Component, ComponentKind, MassItem, MassProperties, Station};
pub use tank::{Tank, TankSizing};

use crate::error::RuleError;

/// Reject NaN, infinities and values `<= 0`
pub(crate) fn require_positive(quantity: &'static str, value: f64) -> Result<f64, RuleError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RuleError::OutOfRange { quantity, value })
    }
}
