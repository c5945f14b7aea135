//! Property-based tests for the engine and the aircraft rules
//!
//! Coverage targets:
//! - Seating text parsing (seating.rs)
//! - Recompute locality (engine.rs)
//! - Mass balance bounds (rules/mass.rs)

use proptest::prelude::*;

use h2retrofit::model::ids;
use h2retrofit::{AircraftModel, SeatingClass, SeatingConfig, Value};

// =============================================================================
// Seating text parsing
// =============================================================================

mod seating_parsing {
    use super::*;

    prop_compose! {
        fn arb_class()(
            name in r"[a-z][a-z0-9_]{0,10}",
            rows in 1u32..40,
            seats in 1u32..10,
            pitch_cm in 60u32..120,
        ) -> SeatingClass {
            SeatingClass::new(name, rows, seats, f64::from(pitch_cm) / 100.0)
        }
    }

    proptest! {
        /// Property: parsing arbitrary text never panics
        #[test]
        fn test_parse_never_panics(text in "(?s).{0,200}") {
            let _ = SeatingConfig::parse(&text);
        }

        /// Property: rendered seating parses back to the same classes
        #[test]
        fn test_rendered_text_parses_back(class in arb_class()) {
            let seating = SeatingConfig::new(vec![class]);
            let parsed = SeatingConfig::parse(&seating.to_text()).unwrap();
            prop_assert_eq!(parsed, seating);
        }
    }
}

// =============================================================================
// Engine locality on the aircraft graph
// =============================================================================

mod locality {
    use super::*;

    fn evaluate_everything(model: &mut AircraftModel) {
        let ids: Vec<String> = model.engine().node_ids().map(str::to_string).collect();
        for id in ids {
            let _ = model.get(&id);
        }
    }

    fn arb_change() -> impl Strategy<Value = (&'static str, f64)> {
        prop_oneof![
            (30.0f64..45.0).prop_map(|v| (ids::FUSELAGE_LENGTH, v)),
            (3.5f64..4.5).prop_map(|v| (ids::FUSELAGE_OUTER_DIAMETER, v)),
            (0.0f64..1.0).prop_map(|v| (ids::TANK_FILL_FRACTION, v)),
            (0.2f64..0.5).prop_map(|v| (ids::WING_POSITION_FRACTION, v)),
            (0.0f64..1.0).prop_map(|v| (ids::CARGO_LOAD_FRACTION, v)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: only nodes downstream of the changed input run their rule
        #[test]
        fn test_recompute_stays_downstream((id, value) in arb_change()) {
            let mut model = AircraftModel::baseline().unwrap();
            evaluate_everything(&mut model);
            model.events().clear();

            model.set_input(id, Value::Scalar(value)).unwrap();
            evaluate_everything(&mut model);

            let downstream: Vec<String> = model
                .engine()
                .downstream(id)
                .unwrap()
                .into_iter()
                .map(str::to_string)
                .collect();
            for node in model.events().recomputed_nodes() {
                prop_assert!(downstream.contains(&node), "{} recomputed after {} changed", node, id);
            }
        }

        /// Property: a second pass over unchanged inputs runs no rule at all
        #[test]
        fn test_second_pass_is_free((id, value) in arb_change()) {
            let mut model = AircraftModel::baseline().unwrap();
            model.set_input(id, Value::Scalar(value)).unwrap();
            evaluate_everything(&mut model);
            // failed nodes stay dirty and would run again
            let failed = model.engine().node_ids().any(|n| model.engine().is_dirty(n).unwrap());
            prop_assume!(!failed);

            let runs = model.engine().total_invocations();
            evaluate_everything(&mut model);
            prop_assert_eq!(model.engine().total_invocations(), runs);
        }
    }
}

// =============================================================================
// Mass balance
// =============================================================================

mod mass_balance {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: the c.g. lies between the foremost and aftmost component
        #[test]
        fn test_cg_within_component_span(
            length in 30.0f64..45.0,
            rows in 10u32..30,
            tanks in 0u32..3,
        ) {
            let mut model = AircraftModel::baseline().unwrap();
            model.set_fuselage_length(length).unwrap();
            model
                .set_seating(SeatingConfig::new(vec![SeatingClass::new("economy", rows, 6, 0.76)]))
                .unwrap();
            model.set_tank_count(tanks).unwrap();

            if let (Ok(components), Ok(cg)) = (model.components(), model.cg_x()) {
                let fore = components.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
                let aft = components.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(cg >= fore - 1e-9 && cg <= aft + 1e-9);
                let total: f64 = components.iter().map(|c| c.mass).sum();
                prop_assert!((model.mass_properties().unwrap().total_mass - total).abs() < 1e-6);
            }
        }
    }
}
