//! Typed values held by attribute nodes
//!
//! Every node stores one `Value`. Input nodes keep the variant they were created
//! with; rules read their arguments through [`Args`], which checks variants and
//! arity instead of panicking.

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::rules::cabin::{AisleWidth, CabinLayout};
use crate::rules::cargo::CargoHolds;
use crate::rules::fuselage::FuselageGeometry;
use crate::rules::mac::{CgMarker, MeanAerodynamicChord, Planform, WingStation};
use crate::rules::mass::{Component, MassItem, MassProperties};
use crate::rules::tank::TankSizing;
use crate::seating::SeatingConfig;

/// Scalar, vector or geometry descriptor stored in a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Scalar(f64),
    Count(u32),
    Seating(SeatingConfig),
    Planform(Planform),
    MassItems(Vec<MassItem>),
    Fuselage(FuselageGeometry),
    CabinLayout(CabinLayout),
    AisleWidths(Vec<AisleWidth>),
    Tanks(TankSizing),
    CargoHolds(CargoHolds),
    WingStation(WingStation),
    Components(Vec<Component>),
    MassProperties(MassProperties),
    Mac(MeanAerodynamicChord),
    CgMarker(CgMarker),
}

impl Value {
    /// Variant name, used in type errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Count(_) => "count",
            Value::Seating(_) => "seating",
            Value::Planform(_) => "planform",
            Value::MassItems(_) => "mass_items",
            Value::Fuselage(_) => "fuselage",
            Value::CabinLayout(_) => "cabin_layout",
            Value::AisleWidths(_) => "aisle_widths",
            Value::Tanks(_) => "tanks",
            Value::CargoHolds(_) => "cargo_holds",
            Value::WingStation(_) => "wing_station",
            Value::Components(_) => "components",
            Value::MassProperties(_) => "mass_properties",
            Value::Mac(_) => "mac",
            Value::CgMarker(_) => "cg_marker",
        }
    }

    /// True when both values are the same variant
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Parse user text into the same variant as `self`
    ///
    /// Scalars and counts take plain numbers; structured variants take the JSON
    /// of their payload (e.g. a planform object).
    pub fn parse_like(&self, text: &str) -> Result<Value, String> {
        let text = text.trim();
        let parsed = match self {
            Value::Scalar(_) => Value::Scalar(
                text.parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number", text))?,
            ),
            Value::Count(_) => Value::Count(
                text.parse::<u32>()
                    .map_err(|_| format!("'{}' is not a non-negative integer", text))?,
            ),
            Value::Seating(_) => Value::Seating(from_json(text)?),
            Value::Planform(_) => Value::Planform(from_json(text)?),
            Value::MassItems(_) => Value::MassItems(from_json(text)?),
            other => return Err(format!("{} values cannot be entered", other.kind_name())),
        };
        Ok(parsed)
    }
}

fn from_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Count(v)
    }
}

impl From<SeatingConfig> for Value {
    fn from(v: SeatingConfig) -> Self {
        Value::Seating(v)
    }
}

impl From<Planform> for Value {
    fn from(v: Planform) -> Self {
        Value::Planform(v)
    }
}

impl From<Vec<MassItem>> for Value {
    fn from(v: Vec<MassItem>) -> Self {
        Value::MassItems(v)
    }
}

/// Generates a typed accessor on `Value` and on `Args`
macro_rules! accessors {
    ($($fn_name:ident => $variant:ident : $ty:ty, $label:literal;)*) => {
        impl Value {
            $(
                pub fn $fn_name(&self) -> Result<&$ty, RuleError> {
                    match self {
                        Value::$variant(v) => Ok(v),
                        other => Err(RuleError::TypeMismatch {
                            expected: $label,
                            found: other.kind_name(),
                        }),
                    }
                }
            )*
        }

        impl<'a> Args<'a> {
            $(
                pub fn $fn_name(&self, index: usize) -> Result<&'a $ty, RuleError> {
                    self.get(index)?.$fn_name()
                }
            )*
        }
    };
}

accessors! {
    as_scalar => Scalar: f64, "scalar";
    as_count => Count: u32, "count";
    as_seating => Seating: SeatingConfig, "seating";
    as_planform => Planform: Planform, "planform";
    as_mass_items => MassItems: Vec<MassItem>, "mass_items";
    as_fuselage => Fuselage: FuselageGeometry, "fuselage";
    as_cabin_layout => CabinLayout: CabinLayout, "cabin_layout";
    as_aisle_widths => AisleWidths: Vec<AisleWidth>, "aisle_widths";
    as_tanks => Tanks: TankSizing, "tanks";
    as_cargo_holds => CargoHolds: CargoHolds, "cargo_holds";
    as_wing_station => WingStation: WingStation, "wing_station";
    as_components => Components: Vec<Component>, "components";
    as_mass_properties => MassProperties: MassProperties, "mass_properties";
    as_mac => Mac: MeanAerodynamicChord, "mac";
    as_cg_marker => CgMarker: CgMarker, "cg_marker";
}

/// Dependency values handed to a rule, in declaration order
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [&'a Value],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [&'a Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&'a Value, RuleError> {
        self.values.get(index).copied().ok_or(RuleError::Arity {
            expected: index + 1,
            found: self.values.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_rejects_wrong_variant() {
        let v = Value::Count(2);
        assert_eq!(v.as_count().unwrap(), &2);
        assert_eq!(
            v.as_scalar().unwrap_err(),
            RuleError::TypeMismatch {
                expected: "scalar",
                found: "count"
            }
        );
    }

    #[test]
    fn args_report_arity() {
        let a = Value::Scalar(1.0);
        let refs = [&a];
        let args = Args::new(&refs);
        assert_eq!(*args.as_scalar(0).unwrap(), 1.0);
        assert_eq!(
            args.get(2).unwrap_err(),
            RuleError::Arity {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn parse_like_keeps_variant() {
        assert_eq!(Value::Scalar(1.0).parse_like(" 30 ").unwrap(), Value::Scalar(30.0));
        assert_eq!(Value::Count(1).parse_like("2").unwrap(), Value::Count(2));
        assert!(Value::Count(1).parse_like("-1").is_err());
        assert!(Value::Scalar(1.0).parse_like("abc").is_err());
    }

    #[test]
    fn parse_like_structured_json() {
        let template = Value::Planform(Planform::a320());
        let json = serde_json::to_string(&Planform::a320()).unwrap();
        assert_eq!(template.parse_like(&json).unwrap(), template);
    }

    #[test]
    fn serializes_externally_tagged() {
        let json = serde_json::to_value(Value::Scalar(30.0)).unwrap();
        assert_eq!(json, serde_json::json!({"scalar": 30.0}));
        let back: Value = serde_json::from_value(serde_json::json!({"count": 2})).unwrap();
        assert_eq!(back, Value::Count(2));
    }

    #[test]
    fn same_kind_compares_variants_only() {
        assert!(Value::Scalar(1.0).same_kind(&Value::Scalar(2.0)));
        assert!(!Value::Scalar(1.0).same_kind(&Value::Count(1)));
    }
}
